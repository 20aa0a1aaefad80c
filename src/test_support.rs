// src/test_support.rs
// Shared test utilities: a scripted DCI collaborator

use crate::dci::{DciApi, DciContext, FileContent, ListParams, Payload, Resource};
use crate::error::{DciError, Result};
use crate::services::DciServices;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// FakeDciApi
// ============================================================================

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(Resource, String),
    List(Resource, ListParams),
    Nested(Resource, String, String),
    Content(String),
    Download {
        job_id: String,
        file_id: String,
        target: PathBuf,
    },
}

#[derive(Clone)]
enum Reply {
    Payload(Payload),
    Content(FileContent),
    Bytes(Vec<u8>),
    Status(u16),
}

/// In-memory collaborator. Unscripted calls fail with a 404.
#[derive(Default)]
pub struct FakeDciApi {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDciApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, key: String, reply: Reply) {
        self.replies.lock().unwrap().insert(key, reply);
    }

    pub fn on_get(&self, resource: Resource, id: &str, payload: Payload) {
        self.script(format!("get:{}:{}", resource.collection(), id), Reply::Payload(payload));
    }

    pub fn on_list(&self, resource: Resource, payload: Payload) {
        self.script(format!("list:{}", resource.collection()), Reply::Payload(payload));
    }

    pub fn on_nested(&self, resource: Resource, id: &str, collection: &str, payload: Payload) {
        self.script(
            format!("nested:{}:{}:{}", resource.collection(), id, collection),
            Reply::Payload(payload),
        );
    }

    pub fn on_content(&self, file_id: &str, content: FileContent) {
        self.script(format!("content:{}", file_id), Reply::Content(content));
    }

    pub fn on_download(&self, file_id: &str, bytes: &[u8]) {
        self.script(format!("download:{}", file_id), Reply::Bytes(bytes.to_vec()));
    }

    /// Make every list call for `resource` fail with `status`
    pub fn fail_list(&self, resource: Resource, status: u16) {
        self.script(format!("list:{}", resource.collection()), Reply::Status(status));
    }

    pub fn fail_get(&self, resource: Resource, id: &str, status: u16) {
        self.script(format!("get:{}:{}", resource.collection(), id), Reply::Status(status));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Parameters of every list call, in order
    pub fn list_params(&self) -> Vec<ListParams> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(_, params) => Some(params),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn reply(&self, key: &str) -> Result<Reply> {
        match self.replies.lock().unwrap().get(key).cloned() {
            Some(Reply::Status(status)) => Err(DciError::Status {
                status,
                body: format!("scripted failure for {}", key),
            }),
            Some(reply) => Ok(reply),
            None => Err(DciError::Status {
                status: 404,
                body: format!("nothing scripted for {}", key),
            }),
        }
    }

    fn payload(&self, key: &str) -> Result<Payload> {
        match self.reply(key)? {
            Reply::Payload(p) => Ok(p),
            _ => Err(DciError::InvalidInput(format!("{} is not a payload reply", key))),
        }
    }
}

#[async_trait]
impl DciApi for FakeDciApi {
    async fn get(&self, _ctx: &DciContext, resource: Resource, id: &str) -> Result<Payload> {
        self.record(Call::Get(resource, id.to_string()));
        self.payload(&format!("get:{}:{}", resource.collection(), id))
    }

    async fn list(&self, _ctx: &DciContext, resource: Resource, params: &ListParams) -> Result<Payload> {
        self.record(Call::List(resource, params.clone()));
        self.payload(&format!("list:{}", resource.collection()))
    }

    async fn list_nested(
        &self,
        _ctx: &DciContext,
        resource: Resource,
        id: &str,
        collection: &str,
    ) -> Result<Payload> {
        self.record(Call::Nested(resource, id.to_string(), collection.to_string()));
        self.payload(&format!("nested:{}:{}:{}", resource.collection(), id, collection))
    }

    async fn content(&self, _ctx: &DciContext, file_id: &str) -> Result<FileContent> {
        self.record(Call::Content(file_id.to_string()));
        match self.reply(&format!("content:{}", file_id))? {
            Reply::Content(c) => Ok(c),
            _ => Err(DciError::InvalidInput("not a content reply".into())),
        }
    }

    async fn download(
        &self,
        _ctx: &DciContext,
        job_id: &str,
        file_id: &str,
        target: &Path,
    ) -> Result<u64> {
        self.record(Call::Download {
            job_id: job_id.to_string(),
            file_id: file_id.to_string(),
            target: target.to_path_buf(),
        });
        match self.reply(&format!("download:{}", file_id))? {
            Reply::Bytes(bytes) => {
                tokio::fs::write(target, &bytes).await?;
                Ok(bytes.len() as u64)
            }
            _ => Err(DciError::InvalidInput("not a download reply".into())),
        }
    }
}

pub fn test_context() -> Arc<DciContext> {
    Arc::new(DciContext::new(
        "https://dci.test",
        crate::dci::Credentials::ApiKey("test-key".into()),
    ))
}

/// Service bundle wired to a fresh fake collaborator
pub fn fake_services() -> (Arc<FakeDciApi>, DciServices) {
    let api = Arc::new(FakeDciApi::new());
    let services = DciServices::new(api.clone(), test_context());
    (api, services)
}

/// Wrap a JSON value as a body that still needs decoding
pub fn encoded(value: Value) -> Payload {
    Payload::Encoded(value.to_string())
}
