//! MCP tool implementations
//!
//! Tools are grouped by entity, one `#[tool_router]` impl block of
//! [`OdooMcpServer`](super::OdooMcpServer) per module. The server adds the
//! routers together.

mod connection;
mod milestones;
mod projects;
mod records;
mod tags;
mod tasks;
mod users;


pub use milestones::{CreateMilestoneParams, ListMilestonesParams};
pub use projects::{GetProjectStagesParams, ListProjectsParams};
pub use records::{CreateRecordParams, ReadRecordsParams, SearchRecordsParams};
pub use tasks::{
    CreateTaskParams, CreateTasksBatchParams, ListTasksParams, TaskParams, UpdateTaskParams,
};
pub use users::SearchUsersParams;

use chrono::NaiveDate;
use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;
use serde_json::json;

use crate::odoo::{OdooError, Priority};

/// Map a client error to an MCP error.
///
/// Refused updates are the caller's fault; everything else is reported as
/// an internal error carrying the message.
pub(crate) fn map_odoo_error(e: OdooError) -> McpError {
    match e {
        OdooError::EmptyUpdate => McpError::invalid_params(e.to_string(), None),
        e => McpError::internal_error("odoo_error", Some(json!({"error": e.to_string()}))),
    }
}

/// Pretty-printed JSON as a single text content.
pub(crate) fn json_result<S: Serialize>(value: &S) -> Result<CallToolResult, McpError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error("serialization_error", Some(json!({"error": e.to_string()})))
    })?;

    Ok(CallToolResult::success(vec![Content::text(content)]))
}

/// Reject dates not written as `YYYY-MM-DD`.
pub(crate) fn check_date(field: &str, value: &str) -> Result<(), McpError> {
    let valid = value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(McpError::invalid_params(
            format!("{field} must be a date in YYYY-MM-DD format, got '{value}'"),
            None,
        ))
    }
}

pub(crate) fn parse_priority(value: Option<&str>) -> Result<Option<Priority>, McpError> {
    value
        .map(|p| p.parse::<Priority>())
        .transpose()
        .map_err(|message| McpError::invalid_params(message, None))
}
