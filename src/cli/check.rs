// src/cli/check.rs
// Read-only configuration check

use anyhow::Result;
use dci_mcp::config::EnvConfig;

pub fn run_check(config: &EnvConfig) -> Result<()> {
    let validation = config.validate();

    println!("DCI_CS_URL: {}", config.dci_cs_url);
    println!("Auth mode:  {}", config.credentials.mode());
    println!();
    println!("{}", validation.report());

    if !validation.is_valid() {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
