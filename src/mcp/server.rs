//! MCP server implementation
//!
//! Holds the shared Odoo client and the combined tool router of all tool
//! modules.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};

use crate::odoo::{OdooClient, Transport};

const INSTRUCTIONS: &str = "Odoo Project Management MCP server. Use these tools to create and \
manage tasks in Odoo. A typical workflow: odoo_list_projects -> odoo_get_project_stages -> \
create tasks (with parent_id for subtasks). When turning a PRD into tasks, create parent tasks \
as epics first with odoo_create_tasks_batch, then create the subtasks under them using the \
returned IDs as parent_id.";

/// MCP server exposing Odoo project management tools.
///
/// Generic over `T: Transport` so tests can run it against an in-memory
/// backend. The client is shared: authentication and schema lookups done
/// by one tool call benefit every later call.
pub struct OdooMcpServer<T: Transport> {
    client: Arc<OdooClient<T>>,
    tool_router: ToolRouter<Self>,
}

impl<T: Transport> Clone for OdooMcpServer<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            tool_router: self.tool_router.clone(),
        }
    }
}

impl<T: Transport + 'static> OdooMcpServer<T> {
    pub fn new(client: impl Into<Arc<OdooClient<T>>>) -> Self {
        Self {
            client: client.into(),
            tool_router: Self::connection_tools()
                + Self::project_tools()
                + Self::task_tools()
                + Self::user_tools()
                + Self::tag_tools()
                + Self::record_tools()
                + Self::milestone_tools(),
        }
    }

    pub fn client(&self) -> &OdooClient<T> {
        &self.client
    }

    /// Names of the registered tools, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        names
    }
}

#[tool_handler(router = self.tool_router)]
impl<T: Transport + 'static> ServerHandler for OdooMcpServer<T> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(Implementation::from_build_env())
            .with_instructions(INSTRUCTIONS.to_string())
    }
}
