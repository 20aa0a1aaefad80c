// src/dci/mod.rs
// DCI control server collaborator: connection context, resource catalogue and client seam

pub mod client;

use crate::config::EnvConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::path::Path;

pub use client::HttpDciApi;

/// Remote resource types exposed by the DCI API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Component,
    File,
    Job,
    Pipeline,
    Team,
    Topic,
    Product,
    RemoteCi,
    JobResult,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Component,
        Resource::File,
        Resource::Job,
        Resource::Pipeline,
        Resource::Team,
        Resource::Topic,
        Resource::Product,
        Resource::RemoteCi,
        Resource::JobResult,
    ];

    /// URL segment and the key holding the collection in list responses
    pub fn collection(self) -> &'static str {
        match self {
            Resource::Component => "components",
            Resource::File => "files",
            Resource::Job => "jobs",
            Resource::Pipeline => "pipelines",
            Resource::Team => "teams",
            Resource::Topic => "topics",
            Resource::Product => "products",
            Resource::RemoteCi => "remotecis",
            Resource::JobResult => "results",
        }
    }

    /// Singular form, used in tool names and argument names
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Component => "component",
            Resource::File => "file",
            Resource::Job => "job",
            Resource::Pipeline => "pipeline",
            Resource::Team => "team",
            Resource::Topic => "topic",
            Resource::Product => "product",
            Resource::RemoteCi => "remoteci",
            Resource::JobResult => "result",
        }
    }

    /// Capitalized label for human-readable messages
    pub fn label(self) -> &'static str {
        match self {
            Resource::Component => "Component",
            Resource::File => "File",
            Resource::Job => "Job",
            Resource::Pipeline => "Pipeline",
            Resource::Team => "Team",
            Resource::Topic => "Topic",
            Resource::Product => "Product",
            Resource::RemoteCi => "RemoteCI",
            Resource::JobResult => "Result",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// How a request authenticates against the control server
#[derive(Clone)]
pub enum Credentials {
    ApiKey(String),
    Login { user_id: String, secret: String },
    Anonymous,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Credentials::Login { user_id, .. } => {
                write!(f, "Login {{ user_id: {:?}, secret: <redacted> }}", user_id)
            }
            Credentials::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Connection context handed to every remote call. Immutable once built.
#[derive(Debug, Clone)]
pub struct DciContext {
    base_url: String,
    credentials: Credentials,
}

impl DciContext {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credentials,
        }
    }

    /// Build the context from loaded configuration. An API key takes precedence
    /// over a login/password pair.
    pub fn from_config(config: &EnvConfig) -> Self {
        let creds = &config.credentials;
        let credentials = if let Some(key) = &creds.api_key {
            Credentials::ApiKey(key.clone())
        } else if let Some((user_id, secret)) = creds.login() {
            Credentials::Login {
                user_id: user_id.to_string(),
                secret: secret.to_string(),
            }
        } else {
            Credentials::Anonymous
        };
        Self::new(config.dci_cs_url.clone(), credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root of the v1 REST API
    pub fn api_root(&self) -> String {
        format!("{}/api/v1", self.base_url)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// A response from the collaborator before normalization.
///
/// `Encoded` bodies still need JSON decoding; `Record` values are already
/// structured. Services only ever see the output of [`Payload::decode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Record(Value),
    Encoded(String),
}

impl Payload {
    pub fn decode(self) -> Result<Value> {
        match self {
            Payload::Record(value) => Ok(value),
            Payload::Encoded(body) => Ok(serde_json::from_str(&body)?),
        }
    }

    /// Body as text, for endpoints that serve plain text
    pub fn into_text(self) -> Result<String> {
        match self {
            Payload::Record(Value::String(text)) => Ok(text),
            Payload::Record(value) => Ok(serde_json::to_string(&value)?),
            Payload::Encoded(body) => Ok(body),
        }
    }
}

/// Raw file content as served by the API
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Textual representation; binary bodies are decoded lossily
    pub fn into_text(self) -> String {
        match self {
            FileContent::Text(text) => text,
            FileContent::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            },
        }
    }
}

/// Which filter grammar a listing uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Simple `field:op:value` filter, optional
    Where(Option<String>),
    /// Advanced query grammar, e.g. `and(ilike(name,x),contains(tags,y))`
    Query(String),
}

/// Parameters for a collection listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub limit: u32,
    pub offset: u32,
    pub sort: Option<String>,
    pub selector: Selector,
}

impl ListParams {
    /// URL query pairs in the order the API documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        match &self.selector {
            Selector::Where(Some(filter)) => pairs.push(("where", filter.clone())),
            Selector::Where(None) => {}
            Selector::Query(query) => pairs.push(("query", query.clone())),
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}

/// Client seam for the DCI API. One implementation talks HTTP; tests script their own.
#[async_trait]
pub trait DciApi: Send + Sync {
    /// Fetch one record by id
    async fn get(&self, ctx: &DciContext, resource: Resource, id: &str) -> Result<Payload>;

    /// List a collection using either filter grammar
    async fn list(&self, ctx: &DciContext, resource: Resource, params: &ListParams) -> Result<Payload>;

    /// List a collection nested under one record, e.g. `/jobs/{id}/files`
    async fn list_nested(
        &self,
        ctx: &DciContext,
        resource: Resource,
        id: &str,
        collection: &str,
    ) -> Result<Payload>;

    /// Fetch the content of a file
    async fn content(&self, ctx: &DciContext, file_id: &str) -> Result<FileContent>;

    /// Stream a job file to `target`, returning the number of bytes written
    async fn download(
        &self,
        ctx: &DciContext,
        job_id: &str,
        file_id: &str,
        target: &Path,
    ) -> Result<u64>;
}
