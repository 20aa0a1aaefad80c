// src/mcp/tools/resource.rs
// Generic get/query/list tools and nested listings

use super::{non_empty, to_json};
use crate::dci::Resource;
use crate::services::{DciServices, Pagination};
use serde_json::{Map, Value, json};

/// Resources exposed through get/query/list tools. Job results are only
/// reachable through their job.
pub const TOOL_RESOURCES: [Resource; 8] = [
    Resource::Component,
    Resource::File,
    Resource::Job,
    Resource::Pipeline,
    Resource::Team,
    Resource::Topic,
    Resource::Product,
    Resource::RemoteCi,
];

pub fn get_tool_name(resource: Resource) -> String {
    format!("get_dci_{}", resource.singular())
}

pub fn query_tool_name(resource: Resource) -> String {
    format!("query_dci_{}", resource.collection())
}

pub fn list_tool_name(resource: Resource) -> String {
    format!("list_dci_{}", resource.collection())
}

/// Fetch one record
pub async fn get_record(
    services: &DciServices,
    resource: Resource,
    id: String,
) -> Result<String, String> {
    match services.service(resource).get_by_id(&id).await {
        Some(record) => to_json(&record),
        None => to_json(&json!({ "error": format!("{} {} not found", resource.label(), id) })),
    }
}

/// Run a query-language listing, optionally projecting each record
pub async fn query_records(
    services: &DciServices,
    resource: Resource,
    query: String,
    limit: Option<u32>,
    offset: Option<u32>,
    sort: Option<String>,
    fields: Option<Vec<String>>,
) -> Result<String, String> {
    let result = services
        .service(resource)
        .query(&query, limit, offset, non_empty(sort))
        .await;
    match result {
        Ok(mut body) => {
            if let Some(fields) = fields {
                project_records(&mut body, resource.collection(), &fields);
            }
            to_json(&body)
        }
        Err(envelope) => to_json(&envelope),
    }
}

/// Reduce each record under `key` to `fields`; an empty list clears the records
fn project_records(body: &mut Value, key: &str, fields: &[String]) {
    let Some(Value::Array(records)) = body.get_mut(key) else {
        return;
    };
    if fields.is_empty() {
        records.clear();
        return;
    }
    for record in records.iter_mut() {
        if let Value::Object(map) = record {
            let kept: Map<String, Value> = fields
                .iter()
                .filter_map(|f| map.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            *map = kept;
        }
    }
}

/// Simple-filter listing with the effective pagination echoed back
pub async fn list_records(
    services: &DciServices,
    resource: Resource,
    limit: Option<u32>,
    offset: Option<u32>,
    filter: Option<String>,
    sort: Option<String>,
) -> Result<String, String> {
    let page = Pagination::new(limit, offset);
    let records = services
        .service(resource)
        .list(limit, offset, non_empty(filter), non_empty(sort))
        .await;

    let mut out = Map::new();
    out.insert("count".into(), json!(records.len()));
    out.insert(resource.collection().into(), Value::Array(records));
    out.insert("limit".into(), json!(page.limit));
    out.insert("offset".into(), json!(page.offset));
    to_json(&out)
}

/// Collection nested under a parent record, e.g. a job's files
pub async fn list_related(
    services: &DciServices,
    parent: Resource,
    id: String,
    collection: &str,
) -> Result<String, String> {
    let id_key = format!("{}_id", parent.singular());
    let key = collection.rsplit('/').next().unwrap_or(collection);
    let records = services.service(parent).list_related(&id, collection).await;

    let mut out = Map::new();
    out.insert(id_key, Value::String(id));
    out.insert("count".into(), json!(records.len()));
    out.insert(key.into(), Value::Array(records));
    to_json(&out)
}
