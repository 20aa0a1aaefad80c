// src/mcp/tools/pr.rs
// Pull-request tools: PR lookups, job scans and failure diagnosis

use super::{non_empty, to_json};
use crate::dci::Resource;
use crate::services::DciServices;
use crate::services::pr::{
    FailureAnalysis, NEWEST_FIRST, PR_LOOKUP_LIMIT, PrLookup, pr_job_query, summarize_job,
};
use serde_json::{Value, json};

/// Recent jobs shown by `get_recent_job_status`
const RECENT_SHOWN: usize = 10;

/// Jobs built for a PR URL, newest first
pub async fn latest_jobs_for_pr(
    services: &DciServices,
    pr_url: String,
    job_name: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<String, String> {
    let query = pr_job_query(&pr_url, non_empty(job_name).as_deref());
    let result = services
        .service(Resource::Job)
        .query(&query, limit, offset, Some(NEWEST_FIRST.to_string()))
        .await;
    match result {
        Ok(body) => to_json(&body),
        Err(envelope) => to_json(&envelope),
    }
}

pub async fn pr_by_job_id(services: &DciServices, job_id: String) -> Result<String, String> {
    match services.pr_finder().pr_for_job(&job_id).await {
        PrLookup::JobNotFound => to_json(&json!({ "error": format!("Job {} not found", job_id) })),
        PrLookup::Found { pr_number, job } => to_json(&json!({
            "success": true,
            "job_id": job_id,
            "pr_number": pr_number,
            "job_url": job.get("url"),
            "job_name": job.get("name"),
            "job_state": job.get("state"),
            "extraction_method": "url_analysis",
        })),
        PrLookup::NoPr { job_url } => to_json(&json!({
            "success": false,
            "job_id": job_id,
            "error": "No PR information found in job URL",
            "job_url": job_url,
            "suggestions": [
                "The job might not be associated with a PR",
                "Check if the job URL contains PR information",
                "The PR might be referenced differently",
            ],
        })),
    }
}

pub async fn find_pr_jobs(
    services: &DciServices,
    pr_number: String,
    limit: Option<u32>,
) -> Result<String, String> {
    let limit = limit.unwrap_or(PR_LOOKUP_LIMIT);
    let jobs = services.pr_finder().find_pr_jobs(&pr_number, Some(limit)).await;
    let summaries: Vec<Value> = jobs.iter().map(summarize_job).collect();
    to_json(&json!({
        "success": true,
        "pr_number": pr_number,
        "total_matches": summaries.len(),
        "jobs": summaries,
    }))
}

pub async fn recent_job_status(services: &DciServices, job_name: String) -> Result<String, String> {
    let jobs = services.pr_finder().recent_jobs_named(&job_name).await;
    if jobs.is_empty() {
        return to_json(&json!({
            "success": false,
            "job_name": job_name,
            "error": "No matching jobs found",
            "recent_jobs": [],
        }));
    }
    let recent: Vec<Value> = jobs.iter().take(RECENT_SHOWN).map(summarize_job).collect();
    to_json(&json!({
        "success": true,
        "job_name": job_name,
        "recent_jobs": recent,
        "total_matches": jobs.len(),
    }))
}

pub async fn diagnose_pr_failures(
    services: &DciServices,
    pr_number: String,
    job_name: String,
) -> Result<String, String> {
    let finder = services.pr_finder();

    let Some((total_pr_jobs, matching)) = finder.pr_jobs_named(&pr_number, &job_name).await else {
        return to_json(&json!({
            "pr_number": pr_number,
            "job_name": job_name,
            "error": "No jobs found for this PR",
            "analysis": {},
            "suggestions": [
                format!("Verify PR {} exists and has CI runs", pr_number),
                "Check if the job name pattern is correct",
                "The builds might be very old and archived",
            ],
        }));
    };

    if matching.is_empty() {
        return to_json(&json!({
            "pr_number": pr_number,
            "job_name": job_name,
            "error": format!("No jobs matching '{}' found for PR {}", job_name, pr_number),
            "total_pr_jobs": total_pr_jobs,
            "analysis": {},
        }));
    }

    let analysis = FailureAnalysis::from_jobs(&matching);
    to_json(&json!({
        "pr_number": pr_number,
        "job_name": job_name,
        "recommendations": analysis.recommendations(),
        "analysis": analysis,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dci::Selector;
    use crate::test_support::{encoded, fake_services};

    fn parse(out: Result<String, String>) -> Value {
        serde_json::from_str(&out.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_latest_jobs_for_pr_query() {
        let (api, services) = fake_services();
        api.on_list(Resource::Job, encoded(json!({"jobs": [{"id": "j1"}]})));
        let url = "https://github.com/o/r/pull/3";

        let out = parse(latest_jobs_for_pr(&services, url.into(), Some("e2e".into()), Some(5), None).await);
        assert_eq!(out["jobs"][0]["id"], "j1");

        let params = &api.list_params()[0];
        assert_eq!(params.limit, 5);
        assert_eq!(params.sort.as_deref(), Some("-created_at"));
        assert_eq!(
            params.selector,
            Selector::Query(format!("and(eq(url,{url}),ilike(name,%e2e%))"))
        );
    }

    #[tokio::test]
    async fn test_latest_jobs_for_pr_without_name() {
        let (api, services) = fake_services();
        api.on_list(Resource::Job, encoded(json!({"jobs": []})));

        latest_jobs_for_pr(&services, "u".into(), Some("".into()), None, None)
            .await
            .unwrap();
        assert_eq!(api.list_params()[0].selector, Selector::Query("eq(url,u)".into()));
    }

    #[tokio::test]
    async fn test_pr_by_job_id_variants() {
        let (api, services) = fake_services();
        api.on_get(
            Resource::Job,
            "j1",
            encoded(json!({"job": {"url": "https://github.com/o/r/pull/8", "name": "e2e", "state": "success"}})),
        );

        let found = parse(pr_by_job_id(&services, "j1".into()).await);
        assert_eq!(found["pr_number"], "8");
        assert_eq!(found["job_state"], "success");

        let missing = parse(pr_by_job_id(&services, "j2".into()).await);
        assert_eq!(missing, json!({"error": "Job j2 not found"}));
    }

    #[tokio::test]
    async fn test_find_pr_jobs_summaries() {
        let (api, services) = fake_services();
        api.on_list(
            Resource::Job,
            encoded(json!({"jobs": [
                {"id": "a", "name": "e2e-pr-12", "state": "failure", "topic_id": "t"},
                {"id": "b", "name": "other"},
            ]})),
        );

        let out = parse(find_pr_jobs(&services, "12".into(), Some(30)).await);
        assert_eq!(out["success"], true);
        assert_eq!(out["total_matches"], 1);
        assert_eq!(out["jobs"][0]["id"], "a");
        assert!(out["jobs"][0].get("topic_id").is_none());
        assert_eq!(api.list_params()[0].limit, 30);
    }

    #[tokio::test]
    async fn test_find_pr_jobs_default_scan() {
        let (api, services) = fake_services();
        api.on_list(Resource::Job, encoded(json!({"jobs": []})));

        let out = parse(find_pr_jobs(&services, "12".into(), None).await);
        assert_eq!(out["total_matches"], 0);
        assert_eq!(api.list_params()[0].limit, PR_LOOKUP_LIMIT);
        assert_eq!(PR_LOOKUP_LIMIT, 50);
    }

    #[tokio::test]
    async fn test_blank_arguments_answer_in_body() {
        let (api, services) = fake_services();
        api.on_list(Resource::Job, encoded(json!({"jobs": [{"id": "a", "name": "pr-x"}]})));

        let out = parse(pr_by_job_id(&services, "".into()).await);
        assert_eq!(out, json!({"error": "Job  not found"}));

        let out = parse(find_pr_jobs(&services, "".into(), None).await);
        assert_eq!(out["total_matches"], 0);

        let out = parse(diagnose_pr_failures(&services, " ".into(), "e2e".into()).await);
        assert_eq!(out["error"], "No jobs found for this PR");
        assert!(!api.calls().iter().any(|c| matches!(c, crate::test_support::Call::Get(..))));
    }

    #[tokio::test]
    async fn test_recent_job_status() {
        let (api, services) = fake_services();
        let none = parse(recent_job_status(&services, "e2e".into()).await);
        assert_eq!(none["success"], false);
        assert_eq!(none["recent_jobs"], json!([]));

        let jobs: Vec<Value> = (0..12).map(|i| json!({"id": i, "name": "nightly-E2E"})).collect();
        api.on_list(Resource::Job, encoded(json!({ "jobs": jobs })));
        let some = parse(recent_job_status(&services, "e2e".into()).await);
        assert_eq!(some["total_matches"], 12);
        assert_eq!(some["recent_jobs"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_diagnose_pr_failures() {
        let (api, services) = fake_services();
        let no_jobs = parse(diagnose_pr_failures(&services, "4".into(), "e2e".into()).await);
        assert_eq!(no_jobs["error"], "No jobs found for this PR");

        api.on_list(
            Resource::Job,
            encoded(json!({"jobs": [
                {"id": "1", "name": "e2e-pr-4", "state": "error"},
                {"id": "2", "name": "e2e-pr-4", "state": "success"},
                {"id": "3", "name": "lint-pr-4", "state": "success"},
            ]})),
        );
        let out = parse(diagnose_pr_failures(&services, "4".into(), "e2e".into()).await);
        assert_eq!(out["analysis"]["total_jobs"], 2);
        assert_eq!(out["analysis"]["failed_jobs"], 1);
        assert_eq!(out["analysis"]["success_rate"], 50.0);
        assert_eq!(out["analysis"]["trend"], "stable");
        assert_eq!(out["recommendations"][1], "Latest job state: error");

        let unmatched = parse(diagnose_pr_failures(&services, "4".into(), "perf".into()).await);
        assert_eq!(unmatched["total_pr_jobs"], 3);
        assert_eq!(unmatched["error"], "No jobs matching 'perf' found for PR 4");
    }
}
