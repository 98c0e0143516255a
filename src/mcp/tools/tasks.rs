//! MCP tools for task creation, listing and updates.
//!
//! Tag names are resolved (and created when missing) by the client; the
//! estimated effort is written to whichever hours field the server has.

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
use crate::mcp::tools::{check_date, json_result, map_odoo_error, parse_priority};
use crate::odoo::{DEFAULT_LIMIT, RecordId, TaskDefinition, TaskUpdate, Transport};

// =============================================================================
// Parameter Structs
// =============================================================================

/// One task definition, as accepted by both create tools.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaskParams {
    #[schemars(description = "Task title / summary")]
    pub name: String,
    #[schemars(description = "Detailed description. HTML is supported for rich formatting.")]
    pub description: Option<String>,
    #[schemars(description = "Priority: '0' = Normal (default), '1' = Important, '2' = Urgent")]
    pub priority: Option<String>,
    #[schemars(description = "Stage (kanban column) ID. Omit to use the project's default stage.")]
    pub stage_id: Option<RecordId>,
    #[schemars(
        description = "Tag names, e.g. [\"backend\", \"auth\"]. Missing tags are created automatically."
    )]
    pub tag_names: Option<Vec<String>>,
    #[schemars(description = "User IDs to assign. Use odoo_search_users to find IDs.")]
    pub user_ids: Option<Vec<RecordId>>,
    #[schemars(description = "Parent task ID, to create this task as a subtask")]
    pub parent_id: Option<RecordId>,
    #[schemars(description = "Estimated hours for the task")]
    pub planned_hours: Option<f64>,
}

impl TaskParams {
    fn into_definition(self) -> Result<TaskDefinition, McpError> {
        if self.name.trim().is_empty() {
            return Err(McpError::invalid_params("task name must not be empty", None));
        }

        Ok(TaskDefinition {
            priority: parse_priority(self.priority.as_deref())?.unwrap_or_default(),
            description: self.description,
            stage_id: self.stage_id,
            user_ids: self.user_ids.unwrap_or_default(),
            parent_id: self.parent_id,
            tag_names: self.tag_names.unwrap_or_default(),
            planned_hours: self.planned_hours,
            name: self.name,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    #[schemars(description = "The project to create the task in")]
    pub project_id: RecordId,
    #[serde(flatten)]
    pub task: TaskParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTasksBatchParams {
    #[schemars(description = "The project to create all tasks in")]
    pub project_id: RecordId,
    #[schemars(
        description = "Task definitions, created in the given order. To build a hierarchy, create the parent tasks first, then pass their returned IDs as parent_id of the subtasks in a second call."
    )]
    pub tasks: Vec<TaskParams>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    #[schemars(description = "The project ID")]
    pub project_id: RecordId,
    #[schemars(description = "Only return tasks in this stage")]
    pub stage_id: Option<RecordId>,
    #[schemars(description = "Maximum number of tasks to return (default: 100)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    #[schemars(description = "The task ID to update")]
    pub task_id: RecordId,
    #[schemars(description = "New task title")]
    pub name: Option<String>,
    #[schemars(description = "New description (HTML ok)")]
    pub description: Option<String>,
    #[schemars(description = "Priority: '0' = Normal, '1' = Important, '2' = Urgent")]
    pub priority: Option<String>,
    #[schemars(description = "Move the task to this stage")]
    pub stage_id: Option<RecordId>,
    #[schemars(description = "Replace the tags with these names (missing tags are created)")]
    pub tag_names: Option<Vec<String>>,
    #[schemars(description = "Replace the assignees with these user IDs")]
    pub user_ids: Option<Vec<RecordId>>,
    #[schemars(description = "Set or change the parent task")]
    pub parent_id: Option<RecordId>,
    #[schemars(description = "Update the estimated hours")]
    pub planned_hours: Option<f64>,
    #[schemars(description = "Deadline in YYYY-MM-DD format")]
    pub date_deadline: Option<String>,
}

// =============================================================================
// Tools
// =============================================================================

#[tool_router(router = task_router)]
impl<T: Transport + 'static> OdooMcpServer<T> {
    pub(crate) fn task_tools() -> ToolRouter<Self> {
        Self::task_router()
    }

    #[tool(
        description = "Create a single task in an Odoo project. For subtasks, set parent_id to the ID of the parent task."
    )]
    pub async fn odoo_create_task(
        &self,
        Parameters(params): Parameters<CreateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let project_id = params.project_id;
        let definition = params.task.into_definition()?;
        debug!(project_id, name = %definition.name, "odoo_create_task");

        let id = self
            .client()
            .create_task(project_id, &definition)
            .await
            .map_err(map_odoo_error)?;

        json_result(&json!({
            "id": id,
            "name": definition.name,
            "project_id": project_id,
        }))
    }

    #[tool(
        description = "Create multiple tasks in a project at once, in order. This is the primary tool for turning a PRD into actionable items: create the epics first, note their IDs, then create the subtasks with parent_id. Stops at the first failure; tasks created before it are kept."
    )]
    pub async fn odoo_create_tasks_batch(
        &self,
        Parameters(params): Parameters<CreateTasksBatchParams>,
    ) -> Result<CallToolResult, McpError> {
        let definitions = params
            .tasks
            .into_iter()
            .map(TaskParams::into_definition)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            project_id = params.project_id,
            count = definitions.len(),
            "odoo_create_tasks_batch"
        );

        let created = self
            .client()
            .create_task_batch(params.project_id, &definitions)
            .await
            .map_err(map_odoo_error)?;

        json_result(&json!({
            "created": created.len(),
            "tasks": created,
        }))
    }

    #[tool(description = "List tasks in a project, optionally filtered by stage.")]
    pub async fn odoo_list_tasks(
        &self,
        Parameters(params): Parameters<ListTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(project_id = params.project_id, stage_id = ?params.stage_id, "odoo_list_tasks");

        let tasks = self
            .client()
            .list_tasks(
                params.project_id,
                params.stage_id,
                params.limit.unwrap_or(DEFAULT_LIMIT),
            )
            .await
            .map_err(map_odoo_error)?;

        json_result(&tasks)
    }

    #[tool(
        description = "Update an existing task. Only the fields you provide are changed; others are left untouched."
    )]
    pub async fn odoo_update_task(
        &self,
        Parameters(params): Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(deadline) = params.date_deadline.as_deref() {
            check_date("date_deadline", deadline)?;
        }
        let task_id = params.task_id;
        let update = TaskUpdate {
            priority: parse_priority(params.priority.as_deref())?,
            name: params.name,
            description: params.description,
            stage_id: params.stage_id,
            tag_names: params.tag_names,
            user_ids: params.user_ids,
            parent_id: params.parent_id,
            planned_hours: params.planned_hours,
            date_deadline: params.date_deadline,
        };
        debug!(task_id, "odoo_update_task");

        let outcome = self
            .client()
            .update_task(task_id, &update)
            .await
            .map_err(map_odoo_error)?;

        json_result(&json!({
            "updated": true,
            "task_id": outcome.task_id,
            "fields_changed": outcome.fields_changed,
        }))
    }
}
