// src/dci/client.rs
// reqwest-backed DCI API client

use super::{Credentials, DciApi, DciContext, FileContent, ListParams, Payload, Resource};
use crate::error::{DciError, Result};
use crate::http::DOWNLOAD_TIMEOUT;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Longest error body kept in a `DciError::Status`
const MAX_ERROR_BODY: usize = 500;

/// HTTP implementation of [`DciApi`] talking to the v1 REST API
#[derive(Clone)]
pub struct HttpDciApi {
    client: Client,
}

impl HttpDciApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn request(&self, ctx: &DciContext, url: &str) -> RequestBuilder {
        let builder = self.client.get(url).header(ACCEPT, "application/json");
        match ctx.credentials() {
            Credentials::ApiKey(key) => builder.bearer_auth(key),
            Credentials::Login { user_id, secret } => builder.basic_auth(user_id, Some(secret)),
            Credentials::Anonymous => builder,
        }
    }

    async fn fetch(&self, ctx: &DciContext, url: &str, params: &[(&str, String)]) -> Result<Payload> {
        debug!(url = %url, "DCI request");
        let resp = self.request(ctx, url).query(params).send().await?;
        let resp = check_status(resp).await?;
        Ok(Payload::Encoded(resp.text().await?))
    }
}

fn record_url(ctx: &DciContext, resource: Resource, id: &str) -> String {
    format!(
        "{}/{}/{}",
        ctx.api_root(),
        resource.collection(),
        urlencoding::encode(id)
    )
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    Err(DciError::Status {
        status: status.as_u16(),
        body,
    })
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.starts_with("text/")
        || mime.ends_with("json")
        || mime.ends_with("xml")
        || mime.ends_with("yaml")
}

#[async_trait]
impl DciApi for HttpDciApi {
    async fn get(&self, ctx: &DciContext, resource: Resource, id: &str) -> Result<Payload> {
        self.fetch(ctx, &record_url(ctx, resource, id), &[]).await
    }

    async fn list(&self, ctx: &DciContext, resource: Resource, params: &ListParams) -> Result<Payload> {
        let url = format!("{}/{}", ctx.api_root(), resource.collection());
        self.fetch(ctx, &url, &params.query_pairs()).await
    }

    async fn list_nested(
        &self,
        ctx: &DciContext,
        resource: Resource,
        id: &str,
        collection: &str,
    ) -> Result<Payload> {
        let url = format!("{}/{}", record_url(ctx, resource, id), collection);
        self.fetch(ctx, &url, &[]).await
    }

    async fn content(&self, ctx: &DciContext, file_id: &str) -> Result<FileContent> {
        let url = format!("{}/content", record_url(ctx, Resource::File, file_id));
        debug!(url = %url, "DCI file content request");
        let resp = self.request(ctx, &url).send().await?;
        let resp = check_status(resp).await?;

        let textual = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_textual);
        let bytes = resp.bytes().await?.to_vec();

        if textual {
            return Ok(FileContent::Text(String::from_utf8_lossy(&bytes).into_owned()));
        }
        match String::from_utf8(bytes) {
            Ok(text) => Ok(FileContent::Text(text)),
            Err(e) => Ok(FileContent::Binary(e.into_bytes())),
        }
    }

    async fn download(
        &self,
        ctx: &DciContext,
        job_id: &str,
        file_id: &str,
        target: &Path,
    ) -> Result<u64> {
        let url = format!("{}/content", record_url(ctx, Resource::File, file_id));
        debug!(url = %url, job_id = %job_id, target = %target.display(), "DCI file download");
        let resp = self
            .request(ctx, &url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        let mut resp = check_status(resp).await?;

        let mut file = tokio::fs::File::create(target).await?;
        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}
