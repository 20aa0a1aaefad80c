// src/cli/tool.rs
// Direct tool execution from CLI

use super::serve::setup_services;
use anyhow::{Context, Result};
use dci_mcp::config::EnvConfig;
use dci_mcp::mcp::dispatch::call_tool;

/// Execute a tool directly from the command line
pub async fn run_tool(name: String, args: String, config: &EnvConfig) -> Result<()> {
    let services = setup_services(config)?;
    let args: serde_json::Value =
        serde_json::from_str(&args).context("Tool arguments must be a JSON object")?;

    match call_tool(&services, &name, args).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e),
    }
}
