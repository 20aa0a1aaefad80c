// src/mcp/tools/file.rs
// File download and content tools

use super::to_json;
use crate::services::DciServices;
use serde_json::json;
use std::path::Path;

pub async fn download_file(
    services: &DciServices,
    job_id: String,
    file_id: String,
    output_path: String,
) -> Result<String, String> {
    if services
        .files()
        .download(&job_id, &file_id, Path::new(&output_path))
        .await
    {
        to_json(&json!({
            "success": true,
            "file_id": file_id,
            "output_path": output_path,
            "content": "File downloaded successfully",
        }))
    } else {
        to_json(&json!({
            "success": false,
            "file_id": file_id,
            "error": "Failed to download file",
        }))
    }
}

pub async fn file_content(services: &DciServices, file_id: String) -> Result<String, String> {
    match services.files().get_content(&file_id).await {
        Some(content) => to_json(&json!({
            "file_id": file_id,
            "content_length": content.chars().count(),
            "content": content,
        })),
        None => to_json(&json!({
            "file_id": file_id,
            "error": format!("Could not retrieve content for file {}", file_id),
        })),
    }
}
