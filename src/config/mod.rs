// src/config/mod.rs
// Configuration and shared constants

pub mod env;

pub use env::{ConfigValidation, DciCredentials, EnvConfig};

/// Public DCI control server
pub const DEFAULT_DCI_CS_URL: &str = "https://api.distributed-ci.io";

/// Placeholder value shipped in sample .env files
pub const PLACEHOLDER_API_KEY: &str = "your-dci-api-key";

/// Load .env files. The current directory's file is read first so it wins over
/// `~/.dci-mcp/.env`; neither overrides variables already in the environment.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".dci-mcp/.env"));
    }
}
