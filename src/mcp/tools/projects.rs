//! Project and stage tools.

use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mcp::server::OdooMcpServer;
use crate::mcp::tools::{json_result, map_odoo_error};
use crate::odoo::{RecordId, Transport};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectsParams {
    #[schemars(description = "Only return active (non-archived) projects. Default: true")]
    pub active_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectStagesParams {
    #[schemars(description = "The Odoo project ID")]
    pub project_id: RecordId,
}

#[tool_router(router = project_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn project_tools() -> ToolRouter<Self> {
        Self::project_router()
    }

    #[tool(
        description = "List projects in Odoo with id, name, manager, customer, tags and task count. Use this to find the right project_id before creating tasks."
    )]
    pub async fn odoo_list_projects(
        &self,
        Parameters(params): Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        let active_only = params.active_only.unwrap_or(true);
        debug!(active_only, "odoo_list_projects");

        let projects = self
            .client()
            .list_projects(active_only)
            .await
            .map_err(map_odoo_error)?;

        json_result(&projects)
    }

    #[tool(
        description = "Get the kanban stages (columns) of a project in board order. Use this to pick the stage_id for tasks."
    )]
    pub async fn odoo_get_project_stages(
        &self,
        Parameters(params): Parameters<GetProjectStagesParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(project_id = params.project_id, "odoo_get_project_stages");

        let stages = self
            .client()
            .project_stages(params.project_id)
            .await
            .map_err(map_odoo_error)?;

        json_result(&stages)
    }
}
