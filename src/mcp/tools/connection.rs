//! Connection check tool.

use rmcp::{
    ErrorData as McpError, handler::server::router::tool::ToolRouter, model::*, tool, tool_router,
};
use serde_json::json;
use tracing::debug;

use crate::mcp::server::OdooMcpServer;
use crate::mcp::tools::{json_result, map_odoo_error};
use crate::odoo::Transport;

#[tool_router(router = connection_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn connection_tools() -> ToolRouter<Self> {
        Self::connection_router()
    }

    #[tool(
        description = "Test the Odoo connection and return server version info. Call this first to verify credentials are working."
    )]
    pub async fn odoo_test_connection(&self) -> Result<CallToolResult, McpError> {
        debug!("odoo_test_connection");

        let version = self.client().version().await.map_err(map_odoo_error)?;
        let uid = self.client().uid().await.map_err(map_odoo_error)?;

        json_result(&json!({
            "status": "connected",
            "uid": uid,
            "server_version": version.server_version,
            "url": self.client().url(),
            "database": self.client().config().db(),
        }))
    }
}
