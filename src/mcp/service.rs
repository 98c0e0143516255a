//! MCP stdio service
//!
//! Runs [`OdooMcpServer`] over stdin/stdout until the client disconnects.

use std::sync::Arc;

use miette::Diagnostic;
use rmcp::{ServiceExt, service::ServerInitializeError, transport::io::stdio};
use thiserror::Error;
use tracing::info;

use crate::odoo::{OdooClient, Transport};

use super::server::OdooMcpServer;

#[derive(Error, Diagnostic, Debug)]
pub enum ServeError {
    #[error("MCP initialization failed: {0}")]
    #[diagnostic(code(odoo_mcp::mcp::initialize))]
    Initialize(#[from] ServerInitializeError),

    #[error("MCP service terminated abnormally: {0}")]
    #[diagnostic(code(odoo_mcp::mcp::service))]
    Service(#[from] tokio::task::JoinError),
}

/// Serve the Odoo tools over stdio and wait for the session to end.
///
/// Stdout carries the protocol, so nothing else may write to it while this
/// runs.
pub async fn serve_stdio<T: Transport + 'static>(
    client: impl Into<Arc<OdooClient<T>>>,
) -> Result<(), ServeError> {
    let server = OdooMcpServer::new(client);
    let url = server.client().url().to_string();

    info!(url = %url, "Starting Odoo MCP server on stdio");
    let service = server.serve(stdio()).await?;

    let reason = service.waiting().await?;
    info!(?reason, "Odoo MCP server stopped");

    Ok(())
}
