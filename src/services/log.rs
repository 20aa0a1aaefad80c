// src/services/log.rs
// Job logs and artifacts

use super::{ResourceService, check_id};
use crate::dci::Resource;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Job sub-resources that may serve a console log, tried in order
pub const LOG_ENDPOINTS: [&str; 4] = ["logs", "artifacts/logs", "output", "console"];

/// Logs of one job, or why there are none
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobLogs {
    pub build_id: String,
    pub job_name: String,
    pub logs: Option<String>,
    pub artifacts_url: Option<String>,
    pub log_url_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobLogs {
    fn missing(job_id: &str, job_name: &str, error: String) -> Self {
        Self {
            build_id: job_id.to_string(),
            job_name: job_name.to_string(),
            logs: None,
            artifacts_url: None,
            log_url_used: None,
            error: Some(error),
        }
    }
}

/// Log and artifact retrieval for jobs
pub struct JobLogService<'a> {
    jobs: &'a ResourceService,
}

impl<'a> JobLogService<'a> {
    pub fn new(jobs: &'a ResourceService) -> Self {
        Self { jobs }
    }

    /// First non-empty log among [`LOG_ENDPOINTS`]
    pub async fn job_logs(&self, job_id: &str) -> JobLogs {
        let Some(record) = self.jobs.get_by_id(job_id).await else {
            return JobLogs::missing(job_id, "unknown", format!("Job {} not found", job_id));
        };
        let job = record.get("job").unwrap_or(&record);
        let job_name = job.get("name").and_then(Value::as_str).unwrap_or("unknown");

        for endpoint in LOG_ENDPOINTS {
            match self.fetch_text(job_id, endpoint).await {
                Ok(text) if !text.is_empty() => {
                    return JobLogs {
                        build_id: job_id.to_string(),
                        job_name: job_name.to_string(),
                        logs: Some(text),
                        artifacts_url: Some(self.job_url(job_id, "artifacts")),
                        log_url_used: Some(self.job_url(job_id, endpoint)),
                        error: None,
                    };
                }
                Ok(_) => debug!(job_id = %job_id, endpoint, "Empty log endpoint"),
                Err(e) => debug!(job_id = %job_id, endpoint, error = %e, "Log endpoint unavailable"),
            }
        }

        warn!(job_id = %job_id, "No logs found");
        JobLogs::missing(job_id, job_name, "No logs found for this job".to_string())
    }

    /// Decoded artifact listing of a job, or a message saying why it failed
    pub async fn job_artifacts(&self, job_id: &str) -> std::result::Result<Value, String> {
        match self.fetch_artifacts(job_id).await {
            Ok(artifacts) => Ok(artifacts),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Failed to get artifacts");
                Err(format!("Failed to get artifacts: {}", e))
            }
        }
    }

    async fn fetch_text(&self, job_id: &str, endpoint: &str) -> Result<String> {
        check_id(Resource::Job, job_id)?;
        self.jobs
            .api
            .list_nested(&self.jobs.ctx, Resource::Job, job_id, endpoint)
            .await?
            .into_text()
    }

    async fn fetch_artifacts(&self, job_id: &str) -> Result<Value> {
        check_id(Resource::Job, job_id)?;
        self.jobs
            .api
            .list_nested(&self.jobs.ctx, Resource::Job, job_id, "artifacts")
            .await?
            .decode()
    }

    fn job_url(&self, job_id: &str, endpoint: &str) -> String {
        format!(
            "{}/jobs/{}/{}",
            self.jobs.ctx.api_root(),
            urlencoding::encode(job_id),
            endpoint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dci::Payload;
    use crate::test_support::{Call, encoded, fake_services};
    use serde_json::json;

    #[tokio::test]
    async fn test_logs_from_first_endpoint() {
        let (api, services) = fake_services();
        api.on_get(Resource::Job, "j1", encoded(json!({"job": {"id": "j1", "name": "e2e"}})));
        api.on_nested(Resource::Job, "j1", "logs", Payload::Encoded("TASK [deploy]\nok\n".into()));

        let logs = services.job_logs().job_logs("j1").await;
        assert_eq!(logs.job_name, "e2e");
        assert_eq!(logs.logs.as_deref(), Some("TASK [deploy]\nok\n"));
        assert_eq!(
            logs.log_url_used.as_deref(),
            Some("https://dci.test/api/v1/jobs/j1/logs")
        );
        assert!(logs.error.is_none());
    }

    #[tokio::test]
    async fn test_logs_fall_back_in_order() {
        let (api, services) = fake_services();
        api.on_get(Resource::Job, "j1", encoded(json!({"job": {"id": "j1"}})));
        api.on_nested(Resource::Job, "j1", "artifacts/logs", Payload::Encoded(String::new()));
        api.on_nested(Resource::Job, "j1", "output", Payload::Encoded("console text".into()));

        let logs = services.job_logs().job_logs("j1").await;
        assert_eq!(logs.job_name, "unknown");
        assert_eq!(logs.logs.as_deref(), Some("console text"));
        assert!(logs.log_url_used.unwrap().ends_with("/jobs/j1/output"));

        let tried: Vec<Call> = api
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Nested(..)))
            .collect();
        assert_eq!(tried.len(), 3);
    }

    #[tokio::test]
    async fn test_logs_missing_everywhere() {
        let (api, services) = fake_services();
        api.on_get(Resource::Job, "j1", encoded(json!({"job": {"name": "nightly"}})));

        let logs = services.job_logs().job_logs("j1").await;
        assert_eq!(logs.error.as_deref(), Some("No logs found for this job"));
        assert_eq!(logs.job_name, "nightly");
        assert!(logs.logs.is_none());
    }

    #[tokio::test]
    async fn test_logs_for_unknown_job() {
        let (api, services) = fake_services();
        api.fail_get(Resource::Job, "j9", 500);

        let logs = services.job_logs().job_logs("j9").await;
        assert_eq!(logs.error.as_deref(), Some("Job j9 not found"));
        assert_eq!(logs.job_name, "unknown");
        assert_eq!(api.calls(), vec![Call::Get(Resource::Job, "j9".into())]);
    }

    #[tokio::test]
    async fn test_artifacts() {
        let (api, services) = fake_services();
        api.on_nested(Resource::Job, "j1", "artifacts", encoded(json!({"artifacts": [{"name": "junit.xml"}]})));

        let artifacts = services.job_logs().job_artifacts("j1").await.unwrap();
        assert_eq!(artifacts["artifacts"][0]["name"], "junit.xml");

        let err = services.job_logs().job_artifacts("j2").await.unwrap_err();
        assert!(err.starts_with("Failed to get artifacts: "));
        assert!(err.contains("404"));

        assert!(services.job_logs().job_artifacts("").await.is_err());
    }
}
