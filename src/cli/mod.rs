// src/cli/mod.rs
// CLI module for dci-mcp commands

use clap::{Parser, Subcommand, ValueEnum};

pub mod check;
pub mod serve;
pub mod tool;

pub use check::run_check;
pub use serve::run_mcp_server;
pub use tool::run_tool;

#[derive(Parser)]
#[command(name = "dci-mcp")]
#[command(about = "MCP server for the DCI (Distributed CI) reporting API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (default)
    Serve(ServeArgs),

    /// Execute a tool directly and print its JSON result
    Tool {
        /// Tool name (e.g. list_dci_jobs, today)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"job_id": "..."}')
        #[arg(index = 2, default_value = "{}")]
        args: String,
    },

    /// Validate configuration and show the active auth mode
    Check,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// MCP over stdin/stdout
    Stdio,
    /// MCP over streamable HTTP at /mcp
    Http,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Transport to serve on
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Bind address for the HTTP transport
    #[arg(long, env = "MCP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP transport
    #[arg(long, env = "MCP_PORT", default_value_t = 8000)]
    pub port: u16,
}

impl ServeArgs {
    /// Serve arguments when no subcommand is given: defaults plus environment
    pub fn from_env() -> Self {
        Self::parse_from(["dci-mcp"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_command() {
        let cli = Cli::parse_from(["dci-mcp", "tool", "list_job_files", r#"{"job_id":"j1"}"#]);
        match cli.command {
            Some(Commands::Tool { name, args }) => {
                assert_eq!(name, "list_job_files");
                assert!(args.contains("j1"));
            }
            _ => panic!("expected tool command"),
        }
    }

    #[test]
    fn test_tool_args_default_to_empty_object() {
        let cli = Cli::parse_from(["dci-mcp", "tool", "today"]);
        assert!(matches!(cli.command, Some(Commands::Tool { args, .. }) if args == "{}"));
    }

    #[test]
    fn test_parse_http_serve() {
        let cli = Cli::parse_from(["dci-mcp", "serve", "--transport", "http", "--port", "9000"]);
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.transport, Transport::Http);
                assert_eq!(args.port, 9000);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["dci-mcp"]);
        assert!(cli.command.is_none());
    }
}
