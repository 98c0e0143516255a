//! Generic record access on any model, for cases the project tools do not
//! cover.

use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::mcp::server::OdooMcpServer;
use crate::mcp::tools::{json_result, map_odoo_error};
use crate::odoo::{Domain, RecordId, SearchOptions, Transport, Values};

/// Default page size of `odoo_search_records`.
const SEARCH_RECORDS_LIMIT: usize = 50;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchRecordsParams {
    #[schemars(
        description = "Model name, e.g. 'project.task', 'project.project', 'project.task.type', 'project.tags', 'res.users', 'res.partner', 'project.milestone'"
    )]
    pub model: String,
    #[schemars(
        description = "Odoo domain filter, e.g. [[\"name\", \"ilike\", \"auth\"]]. Defaults to [] (all records)."
    )]
    pub domain: Option<Value>,
    #[schemars(description = "Field names to return. Defaults to all fields.")]
    pub fields: Option<Vec<String>>,
    #[schemars(description = "Maximum number of records to return (default: 50)")]
    pub limit: Option<usize>,
    #[schemars(description = "Number of records to skip (for pagination)")]
    pub offset: Option<usize>,
    #[schemars(description = "Sort order, e.g. 'name asc' or 'create_date desc'")]
    pub order: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReadRecordsParams {
    #[schemars(description = "Model name")]
    pub model: String,
    #[schemars(description = "Record IDs to read")]
    pub ids: Vec<RecordId>,
    #[schemars(description = "Field names to return. Defaults to all fields.")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateRecordParams {
    #[schemars(description = "Model name")]
    pub model: String,
    #[schemars(description = "Field values to set, as an object of field name to value")]
    pub values: Map<String, Value>,
}

#[tool_router(router = record_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn record_tools() -> ToolRouter<Self> {
        Self::record_router()
    }

    #[tool(
        description = "Search any Odoo model with a domain filter. For advanced use cases beyond projects and tasks."
    )]
    pub async fn odoo_search_records(
        &self,
        Parameters(params): Parameters<SearchRecordsParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(model = %params.model, "odoo_search_records");

        let domain = Domain::from_terms(params.domain.unwrap_or(Value::Null))
            .map_err(|message| McpError::invalid_params(message, None))?;
        let mut options = SearchOptions::new()
            .limit(params.limit.unwrap_or(SEARCH_RECORDS_LIMIT))
            .offset(params.offset.unwrap_or(0));
        if let Some(fields) = &params.fields {
            options = options.fields(fields.as_slice());
        }
        if let Some(order) = params.order {
            options = options.order(order);
        }

        let records = self
            .client()
            .find(&params.model, &domain, &options)
            .await
            .map_err(map_odoo_error)?;

        json_result(&records)
    }

    #[tool(description = "Read records of any Odoo model by ID.")]
    pub async fn odoo_read_records(
        &self,
        Parameters(params): Parameters<ReadRecordsParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(model = %params.model, count = params.ids.len(), "odoo_read_records");

        let records = self
            .client()
            .read_by_ids(&params.model, &params.ids, params.fields.as_deref())
            .await
            .map_err(map_odoo_error)?;

        json_result(&records)
    }

    #[tool(description = "Create a record in any Odoo model. For advanced use cases.")]
    pub async fn odoo_create_record(
        &self,
        Parameters(params): Parameters<CreateRecordParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(model = %params.model, "odoo_create_record");

        if params.values.is_empty() {
            return Err(McpError::invalid_params("values must not be empty", None));
        }
        let values = Values::from_json_map(params.values);

        let id = self
            .client()
            .create(&params.model, &values)
            .await
            .map_err(map_odoo_error)?;

        json_result(&json!({"id": id, "model": params.model}))
    }
}
