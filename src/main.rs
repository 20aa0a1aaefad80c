// src/main.rs
// dci-mcp - MCP server for the DCI (Distributed CI) reporting API

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ServeArgs, Transport};
use dci_mcp::config::EnvConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    dci_mcp::config::load_dotenv();
    let config = EnvConfig::load();

    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::from_env()));

    // stdout carries the MCP stream, so logs go to stderr
    let default_level = match &command {
        Commands::Serve(args) if args.transport == Transport::Stdio => Level::WARN,
        Commands::Serve(_) | Commands::Tool { .. } | Commands::Check => Level::INFO,
    };
    let log_level = config.tracing_level().unwrap_or(default_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match command {
        Commands::Serve(args) => cli::run_mcp_server(args, &config).await?,
        Commands::Tool { name, args } => cli::run_tool(name, args, &config).await?,
        Commands::Check => cli::run_check(&config)?,
    }

    Ok(())
}
