use rmcp::{
    ErrorData as McpError, handler::server::router::tool::ToolRouter, model::*, tool, tool_router,
};
use tracing::debug;

use crate::mcp::server::OdooMcpServer;
use crate::mcp::tools::{json_result, map_odoo_error};
use crate::odoo::Transport;

#[tool_router(router = tag_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn tag_tools() -> ToolRouter<Self> {
        Self::tag_router()
    }

    #[tool(
        description = "List all existing project tags. Useful to see which tags exist before creating tasks."
    )]
    pub async fn odoo_list_tags(&self) -> Result<CallToolResult, McpError> {
        debug!("odoo_list_tags");

        let tags = self.client().list_tags().await.map_err(map_odoo_error)?;

        json_result(&tags)
    }
}
