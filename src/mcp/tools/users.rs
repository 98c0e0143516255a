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
use crate::odoo::{DEFAULT_USER_LIMIT, Transport};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchUsersParams {
    #[schemars(
        description = "Search term matched against name or email. Leave empty to list all internal users."
    )]
    pub query: Option<String>,
    #[schemars(description = "Maximum number of users to return (default: 20)")]
    pub limit: Option<usize>,
}

#[tool_router(router = user_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn user_tools() -> ToolRouter<Self> {
        Self::user_router()
    }

    #[tool(
        description = "Search internal Odoo users by name or email. Use this to find user IDs before assigning tasks."
    )]
    pub async fn odoo_search_users(
        &self,
        Parameters(params): Parameters<SearchUsersParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = params.query.unwrap_or_default();
        debug!(query = %query, "odoo_search_users");

        let users = self
            .client()
            .search_users(&query, params.limit.unwrap_or(DEFAULT_USER_LIMIT))
            .await
            .map_err(map_odoo_error)?;

        json_result(&users)
    }
}
