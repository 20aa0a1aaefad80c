// src/lib.rs
// dci-mcp - DCI (Distributed CI) reporting API exposed as MCP tools

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod dci;
pub mod error;
pub mod http;
pub mod mcp;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{DciError, Result};
