// src/http.rs
// Shared HTTP client for DCI API calls

use std::time::Duration;

/// Default request timeout for API calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Extended timeout for file downloads
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client with appropriate defaults.
///
/// Created once at startup and handed to the DCI client. Uses connection
/// pooling internally. Per-request timeouts override the default for downloads.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(10)
        .user_agent(concat!("dci-mcp/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_shared_client() {
        let client = create_shared_client();
        drop(client);
    }

    #[test]
    fn test_timeout_values() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert_eq!(DOWNLOAD_TIMEOUT, Duration::from_secs(60));
        assert!(CONNECT_TIMEOUT < DEFAULT_TIMEOUT);
    }
}
