use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::mcp::server::OdooMcpServer;
use crate::mcp::tools::{check_date, json_result, map_odoo_error};
use crate::odoo::{RecordId, Transport};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateMilestoneParams {
    #[schemars(description = "The project ID")]
    pub project_id: RecordId,
    #[schemars(description = "Milestone name, e.g. \"Phase 1 - MVP\"")]
    pub name: String,
    #[schemars(description = "Optional deadline in YYYY-MM-DD format")]
    pub deadline: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListMilestonesParams {
    #[schemars(description = "The project ID")]
    pub project_id: RecordId,
}

#[tool_router(router = milestone_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn milestone_tools() -> ToolRouter<Self> {
        Self::milestone_router()
    }

    #[tool(
        description = "Create a project milestone. Milestones group tasks into phases or releases."
    )]
    pub async fn odoo_create_milestone(
        &self,
        Parameters(params): Parameters<CreateMilestoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let deadline = params.deadline.as_deref().filter(|d| !d.is_empty());
        if let Some(deadline) = deadline {
            check_date("deadline", deadline)?;
        }
        debug!(project_id = params.project_id, name = %params.name, "odoo_create_milestone");

        let id = self
            .client()
            .create_milestone(params.project_id, &params.name, deadline)
            .await
            .map_err(map_odoo_error)?;

        json_result(&json!({
            "id": id,
            "name": params.name,
            "project_id": params.project_id,
        }))
    }

    #[tool(description = "List the milestones of a project, earliest deadline first.")]
    pub async fn odoo_list_milestones(
        &self,
        Parameters(params): Parameters<ListMilestonesParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(project_id = params.project_id, "odoo_list_milestones");

        let milestones = self
            .client()
            .list_milestones(params.project_id)
            .await
            .map_err(map_odoo_error)?;

        json_result(&milestones)
    }
}
