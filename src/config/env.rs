// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use super::{DEFAULT_DCI_CS_URL, PLACEHOLDER_API_KEY};
use tracing::{debug, info, warn};

/// DCI credentials loaded from environment variables
#[derive(Clone, Default)]
pub struct DciCredentials {
    /// API key (DCI_API_KEY)
    pub api_key: Option<String>,
    /// User login (DCI_USER_ID)
    pub user_id: Option<String>,
    /// User password (DCI_USER_SECRET)
    pub user_secret: Option<String>,
}

impl DciCredentials {
    /// Load credentials from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read_key = |name: &str| lookup(name).filter(|k| !k.trim().is_empty());

        let creds = Self {
            api_key: read_key("DCI_API_KEY").filter(|k| k != PLACEHOLDER_API_KEY),
            user_id: read_key("DCI_USER_ID"),
            user_secret: read_key("DCI_USER_SECRET"),
        };
        creds.log_status();
        creds
    }

    /// Login/password pair, only when both halves are present
    pub fn login(&self) -> Option<(&str, &str)> {
        match (&self.user_id, &self.user_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Check if any usable authentication is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() || self.login().is_some()
    }

    /// Name of the auth mode that will be used (never the secret itself)
    pub fn mode(&self) -> &'static str {
        if self.api_key.is_some() {
            "api-key"
        } else if self.login().is_some() {
            "user-id/secret"
        } else {
            "anonymous"
        }
    }

    fn log_status(&self) {
        if self.is_configured() {
            debug!(mode = self.mode(), "DCI credentials loaded");
        } else {
            warn!("DCI authentication not configured - requests will be anonymous");
        }
    }
}

// Secrets stay out of logs and panics
impl std::fmt::Debug for DciCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DciCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("user_secret", &self.user_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Control server base URL (DCI_CS_URL)
    pub dci_cs_url: String,
    /// Authentication
    pub credentials: DciCredentials,
    /// Log level override (DCI_MCP_LOG)
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading environment configuration");

        let dci_cs_url = lookup("DCI_CS_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_DCI_CS_URL.to_string());

        Self {
            dci_cs_url,
            credentials: DciCredentials::from_lookup(&lookup),
            log_level: lookup("DCI_MCP_LOG").filter(|s| !s.trim().is_empty()),
        }
    }

    /// Parsed DCI_MCP_LOG level; unknown values are ignored (and reported by `validate`)
    pub fn tracing_level(&self) -> Option<tracing::Level> {
        self.log_level.as_deref().and_then(|l| l.trim().parse().ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        let creds = &self.credentials;
        if creds.api_key.is_none() && creds.user_id.is_some() != creds.user_secret.is_some() {
            validation.add_warning(
                "Only one of DCI_USER_ID / DCI_USER_SECRET is set; requests will be anonymous.",
            );
        } else if !creds.is_configured() {
            validation.add_warning(
                "DCI authentication not configured. Set either DCI_API_KEY or DCI_USER_ID+DCI_USER_SECRET.",
            );
        }

        match url::Url::parse(&self.dci_cs_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => validation.add_error(format!(
                "DCI_CS_URL must use http or https, got '{}'",
                parsed.scheme()
            )),
            Err(e) => validation.add_error(format!(
                "DCI_CS_URL '{}' is not a valid URL: {}",
                self.dci_cs_url, e
            )),
        }

        if let Some(ref level) = self.log_level
            && level.parse::<tracing::Level>().is_err()
        {
            validation.add_warning(format!(
                "Unknown DCI_MCP_LOG '{}'. Valid options: error, warn, info, debug, trace",
                level
            ));
        }

        validation
    }
}
