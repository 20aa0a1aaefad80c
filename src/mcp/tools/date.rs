// src/mcp/tools/date.rs
// Date tool

use super::to_json;
use chrono::{Local, NaiveDate};
use serde_json::json;

/// Today's date in the process-local timezone
pub fn today() -> Result<String, String> {
    to_json(&json!({ "today": format_date(Local::now().date_naive()) }))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
