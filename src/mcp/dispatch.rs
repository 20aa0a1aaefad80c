// src/mcp/dispatch.rs
// Tool execution by name, outside the MCP protocol

use super::requests::{
    DiagnoseRequest, DownloadFileRequest, FileIdRequest, FindPrJobsRequest, JobIdRequest,
    JobNameRequest, ListRequest, PipelineIdRequest, PrJobsRequest, ProductIdRequest,
    QueryRequest, TopicIdRequest,
};
use super::tools::{self, resource};
use crate::dci::Resource;
use crate::services::DciServices;
use serde::de::DeserializeOwned;
use serde_json::Value;

fn parse<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    // A bare `null` means no arguments
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

fn resource_tool(name: &str) -> Option<(&'static str, Resource)> {
    resource::TOOL_RESOURCES.into_iter().find_map(|r| {
        if name == resource::get_tool_name(r) {
            Some(("get", r))
        } else if name == resource::query_tool_name(r) {
            Some(("query", r))
        } else if name == resource::list_tool_name(r) {
            Some(("list", r))
        } else {
            None
        }
    })
}

/// Run one tool with JSON arguments, returning the same text the MCP tool returns
pub async fn call_tool(services: &DciServices, name: &str, args: Value) -> Result<String, String> {
    match name {
        "today" => tools::date::today(),
        "list_job_files" => {
            let req: JobIdRequest = parse(args)?;
            resource::list_related(services, Resource::Job, req.job_id, "files").await
        }
        "list_job_results" => {
            let req: JobIdRequest = parse(args)?;
            resource::list_related(services, Resource::Job, req.job_id, "results").await
        }
        "get_pipeline_jobs" => {
            let req: PipelineIdRequest = parse(args)?;
            resource::list_related(services, Resource::Pipeline, req.pipeline_id, "jobs").await
        }
        "get_product_teams" => {
            let req: ProductIdRequest = parse(args)?;
            resource::list_related(services, Resource::Product, req.product_id, "teams").await
        }
        "get_topic_components" => {
            let req: TopicIdRequest = parse(args)?;
            resource::list_related(services, Resource::Topic, req.topic_id, "components").await
        }
        "get_topic_jobs_from_components" => {
            let req: TopicIdRequest = parse(args)?;
            resource::list_related(services, Resource::Topic, req.topic_id, "components/jobs").await
        }
        "get_dci_job_logs" => {
            let req: JobIdRequest = parse(args)?;
            tools::log::job_logs(services, req.job_id).await
        }
        "get_dci_job_artifacts" => {
            let req: JobIdRequest = parse(args)?;
            tools::log::job_artifacts(services, req.job_id).await
        }
        "download_dci_file" => {
            let req: DownloadFileRequest = parse(args)?;
            tools::file::download_file(services, req.job_id, req.file_id, req.output_path).await
        }
        "get_file_content" => {
            let req: FileIdRequest = parse(args)?;
            tools::file::file_content(services, req.file_id).await
        }
        "get_latest_dci_job_for_pr" => {
            let req: PrJobsRequest = parse(args)?;
            tools::pr::latest_jobs_for_pr(services, req.pr_url, req.job_name, req.limit, req.offset)
                .await
        }
        "get_pr_by_job_id" => {
            let req: JobIdRequest = parse(args)?;
            tools::pr::pr_by_job_id(services, req.job_id).await
        }
        "find_pr_jobs" => {
            let req: FindPrJobsRequest = parse(args)?;
            tools::pr::find_pr_jobs(services, req.pr_number, req.limit).await
        }
        "get_recent_job_status" => {
            let req: JobNameRequest = parse(args)?;
            tools::pr::recent_job_status(services, req.job_name).await
        }
        "diagnose_pr_failures" => {
            let req: DiagnoseRequest = parse(args)?;
            tools::pr::diagnose_pr_failures(services, req.pr_number, req.job_name).await
        }
        other => match resource_tool(other) {
            Some(("get", r)) => {
                let key = format!("{}_id", r.singular());
                let id = args
                    .get(&key)
                    .and_then(Value::as_str)
                    .ok_or_else(|| format!("Invalid arguments: missing field `{}`", key))?
                    .to_string();
                resource::get_record(services, r, id).await
            }
            Some(("query", r)) => {
                let req: QueryRequest = parse(args)?;
                resource::query_records(
                    services, r, req.query, req.limit, req.offset, req.sort, req.fields,
                )
                .await
            }
            Some((_, r)) => {
                let req: ListRequest = parse(args)?;
                resource::list_records(services, r, req.limit, req.offset, req.filter, req.sort)
                    .await
            }
            None => Err(format!("Unknown tool: {}", other)),
        },
    }
}

/// Every tool name `call_tool` understands
pub fn tool_names() -> Vec<String> {
    let mut names: Vec<String> = [
        "today",
        "list_job_files",
        "list_job_results",
        "get_pipeline_jobs",
        "get_product_teams",
        "get_topic_components",
        "get_topic_jobs_from_components",
        "get_dci_job_logs",
        "get_dci_job_artifacts",
        "download_dci_file",
        "get_file_content",
        "get_latest_dci_job_for_pr",
        "get_pr_by_job_id",
        "find_pr_jobs",
        "get_recent_job_status",
        "diagnose_pr_failures",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for r in resource::TOOL_RESOURCES {
        names.push(resource::get_tool_name(r));
        names.push(resource::query_tool_name(r));
        names.push(resource::list_tool_name(r));
    }
    names
}
