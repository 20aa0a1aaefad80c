// src/mcp/tools/mod.rs
// Tool bodies shared by the MCP router and the CLI dispatcher

pub mod date;
pub mod file;
pub mod log;
pub mod pr;
pub mod resource;

use serde::Serialize;

/// Serialize a tool result as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Treat blank optional strings as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_is_pretty() {
        let out = to_json(&json!({"today": "2025-01-01"})).unwrap();
        assert_eq!(out, "{\n  \"today\": \"2025-01-01\"\n}");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("".into())), None);
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }
}
