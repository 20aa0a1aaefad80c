// src/mcp/requests.rs
// MCP tool request types

use rmcp::schemars;
use serde::Deserialize;

// ============================================================================
// Shared listing requests
// ============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct QueryRequest {
    #[schemars(
        description = "Query in the DCI query language, e.g. and(ilike(name,ocp),contains(tags,ga))"
    )]
    pub query: String,
    #[schemars(description = "Maximum number of records to return (default: 50)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of records to skip (default: 0)")]
    pub offset: Option<u32>,
    #[schemars(description = "Sort criteria, e.g. -created_at")]
    pub sort: Option<String>,
    #[schemars(
        description = "Fields to keep in each record. Omit for full records; an empty list returns only the count in _meta"
    )]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListRequest {
    #[schemars(description = "Maximum number of records to return (default: 50)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of records to skip (default: 0)")]
    pub offset: Option<u32>,
    #[serde(rename = "where")]
    #[schemars(description = "Filter criteria, e.g. name:like:ocp")]
    pub filter: Option<String>,
    #[schemars(description = "Sort criteria, e.g. -created_at")]
    pub sort: Option<String>,
}

// ============================================================================
// Single-record requests
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComponentIdRequest {
    #[schemars(description = "Component ID")]
    pub component_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FileIdRequest {
    #[schemars(description = "File ID")]
    pub file_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct JobIdRequest {
    #[schemars(description = "Job ID")]
    pub job_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PipelineIdRequest {
    #[schemars(description = "Pipeline ID")]
    pub pipeline_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TeamIdRequest {
    #[schemars(description = "Team ID")]
    pub team_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TopicIdRequest {
    #[schemars(description = "Topic ID")]
    pub topic_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductIdRequest {
    #[schemars(description = "Product ID")]
    pub product_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoteciIdRequest {
    #[schemars(description = "Remote CI ID")]
    pub remoteci_id: String,
}

// ============================================================================
// File transfer
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DownloadFileRequest {
    #[schemars(description = "ID of the job the file belongs to")]
    pub job_id: String,
    #[schemars(description = "File ID")]
    pub file_id: String,
    #[schemars(description = "Local path to write the file to; parent directories are created")]
    pub output_path: String,
}

// ============================================================================
// Pull requests
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PrJobsRequest {
    #[schemars(description = "Pull request URL, e.g. https://github.com/org/repo/pull/123")]
    pub pr_url: String,
    #[schemars(description = "Job name fragment to match (optional)")]
    pub job_name: Option<String>,
    #[schemars(description = "Maximum number of jobs to return (default: 50)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of jobs to skip (default: 0)")]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindPrJobsRequest {
    #[schemars(description = "Pull request number")]
    pub pr_number: String,
    #[schemars(description = "Number of recent jobs to scan (default: 50)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct JobNameRequest {
    #[schemars(description = "Job name fragment, matched case-insensitively")]
    pub job_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DiagnoseRequest {
    #[schemars(description = "Pull request number")]
    pub pr_number: String,
    #[schemars(description = "Job name fragment, matched case-insensitively")]
    pub job_name: String,
}
