// src/services/file.rs
// File service: resource operations plus download and content retrieval

use super::{ResourceService, check_id};
use crate::dci::{FileContent, Resource};
use crate::error::{DciError, Result};
use std::ops::Deref;
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone)]
pub struct FileService {
    inner: ResourceService,
}

impl FileService {
    pub fn new(inner: ResourceService) -> Self {
        Self { inner }
    }

    /// Download a job file to `output_path`, creating parent directories.
    /// Returns `true` only when the transfer completed. Directories created
    /// before a failed transfer are left in place.
    pub async fn download(&self, job_id: &str, file_id: &str, output_path: &Path) -> bool {
        match self.try_download(job_id, file_id, output_path).await {
            Ok(bytes) => {
                info!(
                    job_id = %job_id,
                    file_id = %file_id,
                    path = %output_path.display(),
                    bytes,
                    "File downloaded"
                );
                true
            }
            Err(e) => {
                warn!(
                    job_id = %job_id,
                    file_id = %file_id,
                    path = %output_path.display(),
                    error = %e,
                    "Failed to download file"
                );
                false
            }
        }
    }

    async fn try_download(&self, job_id: &str, file_id: &str, output_path: &Path) -> Result<u64> {
        check_id(Resource::File, file_id)?;
        if output_path.as_os_str().is_empty() {
            return Err(DciError::InvalidInput("blank output path".into()));
        }
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        self.inner
            .api
            .download(&self.inner.ctx, job_id, file_id, output_path)
            .await
    }

    /// File content as text, or `None` on any failure
    pub async fn get_content(&self, file_id: &str) -> Option<String> {
        match self.fetch_content(file_id).await {
            Ok(content) => Some(content.into_text()),
            Err(e) => {
                warn!(file_id = %file_id, error = %e, "Failed to get file content");
                None
            }
        }
    }

    async fn fetch_content(&self, file_id: &str) -> Result<FileContent> {
        check_id(Resource::File, file_id)?;
        self.inner.api.content(&self.inner.ctx, file_id).await
    }
}

impl Deref for FileService {
    type Target = ResourceService;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
