// src/mcp/tools/log.rs
// Job log and artifact tools

use super::to_json;
use crate::services::DciServices;
use serde_json::json;

pub async fn job_logs(services: &DciServices, job_id: String) -> Result<String, String> {
    let logs = services.job_logs().job_logs(&job_id).await;
    to_json(&logs)
}

pub async fn job_artifacts(services: &DciServices, job_id: String) -> Result<String, String> {
    match services.job_logs().job_artifacts(&job_id).await {
        Ok(artifacts) => to_json(&json!({
            "success": true,
            "job_id": job_id,
            "artifacts": artifacts,
        })),
        Err(error) => to_json(&json!({
            "success": false,
            "job_id": job_id,
            "error": error,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dci::{Payload, Resource};
    use crate::test_support::{encoded, fake_services};
    use serde_json::Value;

    fn parse(out: Result<String, String>) -> Value {
        serde_json::from_str(&out.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_job_logs_shape() {
        let (api, services) = fake_services();
        api.on_get(Resource::Job, "j1", encoded(json!({"job": {"name": "e2e"}})));
        api.on_nested(Resource::Job, "j1", "console", Payload::Encoded("done".into()));

        let out = parse(job_logs(&services, "j1".into()).await);
        assert_eq!(out["build_id"], "j1");
        assert_eq!(out["job_name"], "e2e");
        assert_eq!(out["logs"], "done");
        assert_eq!(out["artifacts_url"], "https://dci.test/api/v1/jobs/j1/artifacts");
        assert!(out.get("error").is_none());
    }

    #[tokio::test]
    async fn test_job_logs_blank_id() {
        let (_api, services) = fake_services();
        let out = parse(job_logs(&services, "".into()).await);
        assert_eq!(out["error"], "Job  not found");
        assert_eq!(out["logs"], Value::Null);
    }

    #[tokio::test]
    async fn test_job_artifacts_success_and_failure() {
        let (api, services) = fake_services();
        api.on_nested(Resource::Job, "j1", "artifacts", encoded(json!([{"name": "report.html"}])));

        let ok = parse(job_artifacts(&services, "j1".into()).await);
        assert_eq!(ok["success"], true);
        assert_eq!(ok["artifacts"][0]["name"], "report.html");

        let failed = parse(job_artifacts(&services, "j2".into()).await);
        assert_eq!(failed["success"], false);
        assert_eq!(failed["job_id"], "j2");
        assert!(failed["error"].as_str().unwrap().starts_with("Failed to get artifacts"));
    }
}
