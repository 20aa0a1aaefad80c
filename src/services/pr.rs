// src/services/pr.rs
// Pull-request helpers: PR number extraction, job matching and failure analysis

use super::ResourceService;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Jobs scanned for PR jobs when no limit is given
pub const PR_SCAN_LIMIT: u32 = 100;

/// Default scan for the `find_pr_jobs` tool
pub const PR_LOOKUP_LIMIT: u32 = 50;

/// Jobs scanned for recent status checks
pub const RECENT_SCAN_LIMIT: u32 = 20;

/// Newest-first ordering for job scans
pub const NEWEST_FIRST: &str = "-created_at";

/// Job states counted as failures
pub const FAILED_STATES: [&str; 5] = ["failure", "error", "killed", "failed", "cancelled"];

// Ordered from most to least specific; the first match wins.
static PR_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)github\.com/[^/]+/[^/]+/pull/(\d+)",
        r"(?i)github\.com/[^/]+/[^/]+/issues/(\d+)",
        r"(?i)/pull/(\d+)",
        r"(?i)/issues/(\d+)",
        r"(?i)pr/(\d+)",
        r"(?i)PR-(\d+)",
        r"#(\d+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// PR number referenced by a URL, if any
pub fn extract_pr_number(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    PR_URL_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether a job record refers to the given PR through its URL, name or metadata
pub fn is_pr_job(job: &Value, pr_number: &str) -> bool {
    if pr_number.trim().is_empty() {
        return false;
    }
    let url = job.get("url").and_then(Value::as_str).unwrap_or("");
    if extract_pr_number(url).as_deref() == Some(pr_number) {
        return true;
    }

    let name = job.get("name").and_then(Value::as_str).unwrap_or("");
    if !name.is_empty() {
        let pattern = format!(r"(?i)(?:pr-|pull-|#){}(?:\D|$)", regex::escape(pr_number));
        if Regex::new(&pattern).is_ok_and(|re| re.is_match(name)) {
            return true;
        }
    }

    if let Some(metadata) = job.get("metadata").and_then(Value::as_object) {
        return ["pr_number", "pull_request", "pr", "issue"]
            .iter()
            .filter_map(|field| metadata.get(*field))
            .any(|v| match v {
                Value::String(s) => s == pr_number,
                Value::Number(n) => n.to_string() == pr_number,
                _ => false,
            });
    }

    false
}

/// Query matching jobs built for a PR URL, optionally narrowed by job name
pub fn pr_job_query(pr_url: &str, job_name: Option<&str>) -> String {
    let by_url = format!("eq(url,{})", pr_url);
    match job_name {
        Some(name) => format!("and({},ilike(name,%{}%))", by_url, name),
        None => by_url,
    }
}

/// Compact view of a job for listings
pub fn summarize_job(job: &Value) -> Value {
    let field = |name: &str| job.get(name).cloned().unwrap_or(Value::Null);
    serde_json::json!({
        "id": field("id"),
        "name": field("name"),
        "state": field("state"),
        "created_at": field("created_at"),
        "updated_at": field("updated_at"),
        "url": field("url"),
    })
}

fn name_contains(job: &Value, needle: &str) -> bool {
    job.get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase()))
}

fn job_state(job: &Value) -> &str {
    job.get("state").and_then(Value::as_str).unwrap_or("unknown")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    fn from_success_rate(rate: f64) -> Self {
        if rate > 50.0 {
            Trend::Improving
        } else if rate < 30.0 {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

/// State histogram and success trend over a set of jobs, newest first
#[derive(Debug, Clone, Serialize)]
pub struct FailureAnalysis {
    pub total_jobs: usize,
    pub failed_jobs: usize,
    pub success_rate: f64,
    pub jobs_by_state: BTreeMap<String, Vec<Value>>,
    pub latest_job: Option<Value>,
    pub trend: Trend,
}

impl FailureAnalysis {
    pub fn from_jobs(jobs: &[Value]) -> Self {
        let mut jobs_by_state: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for job in jobs {
            jobs_by_state
                .entry(job_state(job).to_string())
                .or_default()
                .push(job.clone());
        }

        let total_jobs = jobs.len();
        let failed_jobs = jobs
            .iter()
            .filter(|j| FAILED_STATES.contains(&job_state(j)))
            .count();
        let success_rate = if total_jobs == 0 {
            0.0
        } else {
            let raw = (total_jobs - failed_jobs) as f64 / total_jobs as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };

        Self {
            total_jobs,
            failed_jobs,
            success_rate,
            jobs_by_state,
            latest_job: jobs.first().cloned(),
            trend: Trend::from_success_rate(success_rate),
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let latest_state = self.latest_job.as_ref().map(job_state).unwrap_or("unknown");
        vec![
            format!(
                "Success rate: {}% ({}/{} successful)",
                self.success_rate,
                self.total_jobs - self.failed_jobs,
                self.total_jobs
            ),
            format!("Latest job state: {}", latest_state),
            if self.failed_jobs > 0 {
                "Check job logs for specific failure reasons".to_string()
            } else {
                "All recent jobs successful".to_string()
            },
        ]
    }
}

/// Outcome of looking up the PR behind a job
#[derive(Debug, Clone, PartialEq)]
pub enum PrLookup {
    JobNotFound,
    NoPr { job_url: String },
    Found { pr_number: String, job: Value },
}

/// Scans recent jobs for PR references
pub struct PrFinder<'a> {
    jobs: &'a ResourceService,
}

impl<'a> PrFinder<'a> {
    pub fn new(jobs: &'a ResourceService) -> Self {
        Self { jobs }
    }

    /// Recent jobs related to `pr_number`, newest first
    pub async fn find_pr_jobs(&self, pr_number: &str, limit: Option<u32>) -> Vec<Value> {
        let limit = limit.unwrap_or(PR_SCAN_LIMIT);
        self.jobs
            .list(Some(limit), None, None, Some(NEWEST_FIRST.to_string()))
            .await
            .into_iter()
            .filter(|job| is_pr_job(job, pr_number))
            .collect()
    }

    /// Recent jobs whose name contains `job_name`, case-insensitively
    pub async fn recent_jobs_named(&self, job_name: &str) -> Vec<Value> {
        self.jobs
            .list(
                Some(RECENT_SCAN_LIMIT),
                None,
                None,
                Some(NEWEST_FIRST.to_string()),
            )
            .await
            .into_iter()
            .filter(|job| name_contains(job, job_name))
            .collect()
    }

    /// PR jobs narrowed to a job name. `None` when the PR has no jobs at all;
    /// otherwise the PR job count and the matching subset.
    pub async fn pr_jobs_named(&self, pr_number: &str, job_name: &str) -> Option<(usize, Vec<Value>)> {
        let pr_jobs = self.find_pr_jobs(pr_number, None).await;
        if pr_jobs.is_empty() {
            return None;
        }
        let total = pr_jobs.len();
        let matching = pr_jobs
            .into_iter()
            .filter(|job| name_contains(job, job_name))
            .collect();
        Some((total, matching))
    }

    /// Find the PR a job was built for, from the job's URL
    pub async fn pr_for_job(&self, job_id: &str) -> PrLookup {
        let Some(record) = self.jobs.get_by_id(job_id).await else {
            return PrLookup::JobNotFound;
        };
        let job = record.get("job").cloned().unwrap_or(record);
        let job_url = job
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        match extract_pr_number(&job_url) {
            Some(pr_number) => PrLookup::Found { pr_number, job },
            None => PrLookup::NoPr { job_url },
        }
    }
}
