// src/services/mod.rs
// Resource services: the failure boundary between DCI calls and tools

pub mod file;
pub mod log;
pub mod pr;

pub use file::FileService;
pub use log::JobLogService;
pub use pr::PrFinder;

use crate::dci::{DciApi, DciContext, ListParams, Payload, Resource, Selector};
use crate::error::{DciError, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Page size used when a caller gives none
pub const DEFAULT_LIMIT: u32 = 50;

/// Offset used when a caller gives none
pub const DEFAULT_OFFSET: u32 = 0;

/// Limit/offset pair with defaults filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT),
            offset: offset.unwrap_or(DEFAULT_OFFSET),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Structured failure returned by query-style operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Short error token
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl ErrorEnvelope {
    fn for_query(resource: Resource, err: &DciError) -> Self {
        Self {
            error: err.to_string(),
            message: format!("Failed to list {}.", resource.collection()),
        }
    }
}

/// Service for one resource type.
///
/// Every method is a failure boundary: `get_by_id` yields `None`, `list` and
/// `list_related` yield an empty vector, `query` yields an [`ErrorEnvelope`].
#[derive(Clone)]
pub struct ResourceService {
    resource: Resource,
    api: Arc<dyn DciApi>,
    ctx: Arc<DciContext>,
}

impl ResourceService {
    pub fn new(resource: Resource, api: Arc<dyn DciApi>, ctx: Arc<DciContext>) -> Self {
        Self { resource, api, ctx }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Fetch one record, decoded
    pub async fn get_by_id(&self, id: &str) -> Option<Value> {
        match self.fetch_record(id).await {
            Ok(record) => Some(record),
            Err(e) if e.is_not_found() => {
                debug!(resource = %self.resource, id = %id, "Record not found");
                None
            }
            Err(e) => {
                warn!(resource = %self.resource, id = %id, error = %e, "Failed to get record");
                None
            }
        }
    }

    async fn fetch_record(&self, id: &str) -> Result<Value> {
        check_id(self.resource, id)?;
        self.api.get(&self.ctx, self.resource, id).await?.decode()
    }

    /// List with the advanced query grammar, returning the decoded response body
    pub async fn query(
        &self,
        query: &str,
        limit: Option<u32>,
        offset: Option<u32>,
        sort: Option<String>,
    ) -> std::result::Result<Value, ErrorEnvelope> {
        let page = Pagination::new(limit, offset);
        let params = ListParams {
            limit: page.limit,
            offset: page.offset,
            sort,
            selector: Selector::Query(query.to_string()),
        };
        let result = self
            .api
            .list(&self.ctx, self.resource, &params)
            .await
            .and_then(Payload::decode);
        result.map_err(|e| {
            error!(
                resource = %self.resource,
                query = %query,
                error = ?e,
                "Query failed"
            );
            ErrorEnvelope::for_query(self.resource, &e)
        })
    }

    /// List with the simple `where` grammar, unwrapped to the collection
    pub async fn list(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        filter: Option<String>,
        sort: Option<String>,
    ) -> Vec<Value> {
        let page = Pagination::new(limit, offset);
        let params = ListParams {
            limit: page.limit,
            offset: page.offset,
            sort,
            selector: Selector::Where(filter),
        };
        match self.api.list(&self.ctx, self.resource, &params).await {
            Ok(payload) => unwrap_collection(payload, self.resource.collection()),
            Err(e) => {
                warn!(resource = %self.resource, error = %e, "Failed to list records");
                Vec::new()
            }
        }
    }

    /// List a collection nested under one record. The collection key is the
    /// last path segment, so `components/jobs` unwraps `jobs`.
    pub async fn list_related(&self, id: &str, collection: &str) -> Vec<Value> {
        let key = collection.rsplit('/').next().unwrap_or(collection);
        match self.fetch_nested(id, collection).await {
            Ok(payload) => unwrap_collection(payload, key),
            Err(e) => {
                warn!(
                    resource = %self.resource,
                    id = %id,
                    collection = %collection,
                    error = %e,
                    "Failed to list related records"
                );
                Vec::new()
            }
        }
    }

    async fn fetch_nested(&self, id: &str, collection: &str) -> Result<Payload> {
        check_id(self.resource, id)?;
        self.api
            .list_nested(&self.ctx, self.resource, id, collection)
            .await
    }
}

/// Blank ids never reach the API; they would address the collection itself.
pub(crate) fn check_id(resource: Resource, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(DciError::InvalidInput(format!("blank {} id", resource)));
    }
    Ok(())
}

/// Pull the named collection out of a list response. Structured arrays pass
/// through; any other shape is treated as empty.
fn unwrap_collection(payload: Payload, key: &str) -> Vec<Value> {
    if let Payload::Record(Value::Array(items)) = payload {
        return items;
    }
    match payload.decode() {
        Ok(Value::Object(mut body)) => match body.remove(key) {
            Some(Value::Array(items)) => items,
            _ => {
                debug!(key = %key, "List response missing collection key");
                Vec::new()
            }
        },
        Ok(_) => {
            debug!(key = %key, "Unexpected list response shape");
            Vec::new()
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Undecodable list response");
            Vec::new()
        }
    }
}

/// One service per resource type, sharing the collaborator and context
#[derive(Clone)]
pub struct DciServices {
    components: ResourceService,
    files: FileService,
    jobs: ResourceService,
    pipelines: ResourceService,
    teams: ResourceService,
    topics: ResourceService,
    products: ResourceService,
    remotecis: ResourceService,
    results: ResourceService,
}

impl DciServices {
    pub fn new(api: Arc<dyn DciApi>, ctx: Arc<DciContext>) -> Self {
        let service = |resource| ResourceService::new(resource, api.clone(), ctx.clone());
        Self {
            components: service(Resource::Component),
            files: FileService::new(service(Resource::File)),
            jobs: service(Resource::Job),
            pipelines: service(Resource::Pipeline),
            teams: service(Resource::Team),
            topics: service(Resource::Topic),
            products: service(Resource::Product),
            remotecis: service(Resource::RemoteCi),
            results: service(Resource::JobResult),
        }
    }

    pub fn service(&self, resource: Resource) -> &ResourceService {
        match resource {
            Resource::Component => &self.components,
            Resource::File => &*self.files,
            Resource::Job => &self.jobs,
            Resource::Pipeline => &self.pipelines,
            Resource::Team => &self.teams,
            Resource::Topic => &self.topics,
            Resource::Product => &self.products,
            Resource::RemoteCi => &self.remotecis,
            Resource::JobResult => &self.results,
        }
    }

    pub fn files(&self) -> &FileService {
        &self.files
    }

    pub fn jobs(&self) -> &ResourceService {
        &self.jobs
    }

    pub fn pr_finder(&self) -> PrFinder<'_> {
        PrFinder::new(&self.jobs)
    }

    pub fn job_logs(&self) -> JobLogService<'_> {
        JobLogService::new(&self.jobs)
    }
}
