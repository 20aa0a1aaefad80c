// src/mcp/mod.rs
// MCP Server implementation

pub mod dispatch;
pub mod requests;
pub mod tools;

use crate::dci::{DciApi, DciContext, Resource};
use crate::services::DciServices;
use requests::{
    ComponentIdRequest, DiagnoseRequest, DownloadFileRequest, FileIdRequest, FindPrJobsRequest,
    JobIdRequest, JobNameRequest, ListRequest, PipelineIdRequest, PrJobsRequest,
    ProductIdRequest, QueryRequest, RemoteciIdRequest, TeamIdRequest, TopicIdRequest,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tools::resource::{get_record, list_records, list_related, query_records};

/// MCP Server state
#[derive(Clone)]
pub struct DciServer {
    services: DciServices,
    tool_router: ToolRouter<Self>,
}

impl DciServer {
    pub fn new(services: DciServices) -> Self {
        Self {
            services,
            tool_router: Self::tool_router(),
        }
    }

    /// Build a server over a collaborator and connection context
    pub fn with_api(api: Arc<dyn DciApi>, ctx: Arc<DciContext>) -> Self {
        Self::new(DciServices::new(api, ctx))
    }

    pub fn services(&self) -> &DciServices {
        &self.services
    }

    /// Names of every registered tool
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }

    async fn query(&self, resource: Resource, req: QueryRequest) -> Result<String, String> {
        query_records(
            &self.services,
            resource,
            req.query,
            req.limit,
            req.offset,
            req.sort,
            req.fields,
        )
        .await
    }

    async fn list(&self, resource: Resource, req: ListRequest) -> Result<String, String> {
        list_records(&self.services, resource, req.limit, req.offset, req.filter, req.sort).await
    }
}

const QUERY_HINT: &str = "Query syntax: eq(field,value), ne, gt, lt, ilike(field,%pattern%), contains(list,value), and(...), or(...).";

#[tool_router]
impl DciServer {
    #[tool(description = "Get today's date as YYYY-MM-DD.")]
    async fn today(&self) -> Result<String, String> {
        tools::date::today()
    }

    // ------------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI component by ID.")]
    async fn get_dci_component(
        &self,
        Parameters(req): Parameters<ComponentIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::Component, req.component_id).await
    }

    #[tool(description = "Query DCI components with the DCI query language. Returns the components and _meta.count, or an error envelope if the query fails.")]
    async fn query_dci_components(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::Component, req).await
    }

    #[tool(description = "List DCI components with an optional where filter and pagination.")]
    async fn list_dci_components(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::Component, req).await
    }

    // ------------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------------

    #[tool(description = "Get DCI file metadata by ID.")]
    async fn get_dci_file(
        &self,
        Parameters(req): Parameters<FileIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::File, req.file_id).await
    }

    #[tool(description = "Query DCI files with the DCI query language, e.g. and(eq(job_id,<id>),ilike(name,%junit%)).")]
    async fn query_dci_files(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::File, req).await
    }

    #[tool(description = "List DCI files with an optional where filter and pagination.")]
    async fn list_dci_files(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::File, req).await
    }

    #[tool(description = "Download a DCI job file to a local path. Parent directories are created.")]
    async fn download_dci_file(
        &self,
        Parameters(req): Parameters<DownloadFileRequest>,
    ) -> Result<String, String> {
        tools::file::download_file(&self.services, req.job_id, req.file_id, req.output_path).await
    }

    #[tool(description = "Get the content of a DCI file as text.")]
    async fn get_file_content(
        &self,
        Parameters(req): Parameters<FileIdRequest>,
    ) -> Result<String, String> {
        tools::file::file_content(&self.services, req.file_id).await
    }

    // ------------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI job by ID.")]
    async fn get_dci_job(
        &self,
        Parameters(req): Parameters<JobIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::Job, req.job_id).await
    }

    #[tool(description = "Query DCI jobs with the DCI query language, e.g. and(eq(state,failure),ilike(name,%e2e%)). Use fields to keep the response small.")]
    async fn query_dci_jobs(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::Job, req).await
    }

    #[tool(description = "List DCI jobs with an optional where filter and pagination.")]
    async fn list_dci_jobs(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::Job, req).await
    }

    #[tool(description = "List the files attached to a DCI job.")]
    async fn list_job_files(
        &self,
        Parameters(req): Parameters<JobIdRequest>,
    ) -> Result<String, String> {
        list_related(&self.services, Resource::Job, req.job_id, "files").await
    }

    #[tool(description = "List the test results of a DCI job.")]
    async fn list_job_results(
        &self,
        Parameters(req): Parameters<JobIdRequest>,
    ) -> Result<String, String> {
        list_related(&self.services, Resource::Job, req.job_id, "results").await
    }

    #[tool(description = "Get the console logs of a DCI job, trying the logs, artifacts/logs, output and console endpoints in turn.")]
    async fn get_dci_job_logs(
        &self,
        Parameters(req): Parameters<JobIdRequest>,
    ) -> Result<String, String> {
        tools::log::job_logs(&self.services, req.job_id).await
    }

    #[tool(description = "Get the artifact listing of a DCI job.")]
    async fn get_dci_job_artifacts(
        &self,
        Parameters(req): Parameters<JobIdRequest>,
    ) -> Result<String, String> {
        tools::log::job_artifacts(&self.services, req.job_id).await
    }

    // ------------------------------------------------------------------------
    // Pipelines
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI pipeline by ID.")]
    async fn get_dci_pipeline(
        &self,
        Parameters(req): Parameters<PipelineIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::Pipeline, req.pipeline_id).await
    }

    #[tool(description = "Query DCI pipelines with the DCI query language.")]
    async fn query_dci_pipelines(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::Pipeline, req).await
    }

    #[tool(description = "List DCI pipelines with an optional where filter and pagination.")]
    async fn list_dci_pipelines(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::Pipeline, req).await
    }

    #[tool(description = "List the jobs of a DCI pipeline.")]
    async fn get_pipeline_jobs(
        &self,
        Parameters(req): Parameters<PipelineIdRequest>,
    ) -> Result<String, String> {
        list_related(&self.services, Resource::Pipeline, req.pipeline_id, "jobs").await
    }

    // ------------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI team by ID.")]
    async fn get_dci_team(
        &self,
        Parameters(req): Parameters<TeamIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::Team, req.team_id).await
    }

    #[tool(description = "Query DCI teams with the DCI query language.")]
    async fn query_dci_teams(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::Team, req).await
    }

    #[tool(description = "List DCI teams with an optional where filter and pagination.")]
    async fn list_dci_teams(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::Team, req).await
    }

    // ------------------------------------------------------------------------
    // Topics
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI topic by ID.")]
    async fn get_dci_topic(
        &self,
        Parameters(req): Parameters<TopicIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::Topic, req.topic_id).await
    }

    #[tool(description = "Query DCI topics with the DCI query language, e.g. ilike(name,OCP-4.%).")]
    async fn query_dci_topics(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::Topic, req).await
    }

    #[tool(description = "List DCI topics with an optional where filter and pagination.")]
    async fn list_dci_topics(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::Topic, req).await
    }

    #[tool(description = "List the components of a DCI topic.")]
    async fn get_topic_components(
        &self,
        Parameters(req): Parameters<TopicIdRequest>,
    ) -> Result<String, String> {
        list_related(&self.services, Resource::Topic, req.topic_id, "components").await
    }

    #[tool(description = "List the jobs that ran against the components of a DCI topic.")]
    async fn get_topic_jobs_from_components(
        &self,
        Parameters(req): Parameters<TopicIdRequest>,
    ) -> Result<String, String> {
        list_related(&self.services, Resource::Topic, req.topic_id, "components/jobs").await
    }

    // ------------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI product by ID.")]
    async fn get_dci_product(
        &self,
        Parameters(req): Parameters<ProductIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::Product, req.product_id).await
    }

    #[tool(description = "Query DCI products with the DCI query language.")]
    async fn query_dci_products(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::Product, req).await
    }

    #[tool(description = "List DCI products with an optional where filter and pagination.")]
    async fn list_dci_products(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::Product, req).await
    }

    #[tool(description = "List the teams with access to a DCI product.")]
    async fn get_product_teams(
        &self,
        Parameters(req): Parameters<ProductIdRequest>,
    ) -> Result<String, String> {
        list_related(&self.services, Resource::Product, req.product_id, "teams").await
    }

    // ------------------------------------------------------------------------
    // Remote CIs
    // ------------------------------------------------------------------------

    #[tool(description = "Get a DCI remote CI by ID.")]
    async fn get_dci_remoteci(
        &self,
        Parameters(req): Parameters<RemoteciIdRequest>,
    ) -> Result<String, String> {
        get_record(&self.services, Resource::RemoteCi, req.remoteci_id).await
    }

    #[tool(description = "Query DCI remote CIs with the DCI query language.")]
    async fn query_dci_remotecis(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<String, String> {
        self.query(Resource::RemoteCi, req).await
    }

    #[tool(description = "List DCI remote CIs with an optional where filter and pagination.")]
    async fn list_dci_remotecis(
        &self,
        Parameters(req): Parameters<ListRequest>,
    ) -> Result<String, String> {
        self.list(Resource::RemoteCi, req).await
    }

    // ------------------------------------------------------------------------
    // Pull requests
    // ------------------------------------------------------------------------

    #[tool(description = "Get the latest DCI jobs for a pull request URL, optionally narrowed by job name. Newest first.")]
    async fn get_latest_dci_job_for_pr(
        &self,
        Parameters(req): Parameters<PrJobsRequest>,
    ) -> Result<String, String> {
        tools::pr::latest_jobs_for_pr(&self.services, req.pr_url, req.job_name, req.limit, req.offset)
            .await
    }

    #[tool(description = "Find the pull request number a DCI job was built for, from the job URL.")]
    async fn get_pr_by_job_id(
        &self,
        Parameters(req): Parameters<JobIdRequest>,
    ) -> Result<String, String> {
        tools::pr::pr_by_job_id(&self.services, req.job_id).await
    }

    #[tool(description = "Scan recent DCI jobs for ones related to a pull request number (URL, name or metadata).")]
    async fn find_pr_jobs(
        &self,
        Parameters(req): Parameters<FindPrJobsRequest>,
    ) -> Result<String, String> {
        tools::pr::find_pr_jobs(&self.services, req.pr_number, req.limit).await
    }

    #[tool(description = "Show the status of recent DCI jobs whose name contains a pattern.")]
    async fn get_recent_job_status(
        &self,
        Parameters(req): Parameters<JobNameRequest>,
    ) -> Result<String, String> {
        tools::pr::recent_job_status(&self.services, req.job_name).await
    }

    #[tool(description = "Analyze failures across the DCI jobs of a pull request: state histogram, success rate, trend and recommendations.")]
    async fn diagnose_pr_failures(
        &self,
        Parameters(req): Parameters<DiagnoseRequest>,
    ) -> Result<String, String> {
        tools::pr::diagnose_pr_failures(&self.services, req.pr_number, req.job_name).await
    }
}

#[tool_handler]
impl ServerHandler for DciServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "dci-mcp".into(),
                title: Some("DCI MCP Server - Distributed CI reporting tools".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Read-only access to DCI (Distributed CI): components, files, jobs, pipelines, teams, topics, products and remote CIs. {}",
                QUERY_HINT
            )),
        }
    }
}
