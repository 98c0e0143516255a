//! Project tasks: creation (single and batch), listing and patch updates.
//!
//! Tag names are resolved to ids before each create, and the estimated
//! effort is written to whichever hours field the server has. When it has
//! none, the effort is dropped and the rest of the task is still written.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::odoo::client::OdooClient;
use crate::odoo::error::{OdooError, OdooResult};
use crate::odoo::schema::ESTIMATED_EFFORT;
use crate::odoo::transport::Transport;
use crate::odoo::values::{Domain, LinkOp, Record, RecordId, SearchOptions, Values};

pub const TASK_MODEL: &str = "project.task";

/// Task priority as stored by Odoo (a selection of digit strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    #[serde(rename = "0", alias = "normal")]
    Normal,
    #[serde(rename = "1", alias = "important")]
    Important,
    #[serde(rename = "2", alias = "urgent")]
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "0",
            Priority::Important => "1",
            Priority::Urgent => "2",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "normal" => Ok(Priority::Normal),
            "1" | "important" => Ok(Priority::Important),
            "2" | "urgent" => Ok(Priority::Urgent),
            other => Err(format!(
                "invalid priority '{other}', expected '0' (normal), '1' (important) or '2' (urgent)"
            )),
        }
    }
}

/// A task to create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub stage_id: Option<RecordId>,
    #[serde(default)]
    pub user_ids: Vec<RecordId>,
    /// Existing task to nest under. Must already exist; batches are not
    /// reordered to satisfy parent references.
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    #[serde(default)]
    pub planned_hours: Option<f64>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Changes to an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub stage_id: Option<RecordId>,
    /// Replaces the whole tag set.
    pub tag_names: Option<Vec<String>>,
    /// Replaces the whole assignee set.
    pub user_ids: Option<Vec<RecordId>>,
    pub parent_id: Option<RecordId>,
    pub planned_hours: Option<f64>,
    /// `YYYY-MM-DD`.
    pub date_deadline: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TaskUpdate::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdateOutcome {
    pub task_id: RecordId,
    pub fields_changed: Vec<String>,
}

impl<T: Transport> OdooClient<T> {
    /// Create one task in `project_id` and return its id.
    pub async fn create_task(
        &self,
        project_id: RecordId,
        definition: &TaskDefinition,
    ) -> OdooResult<RecordId> {
        let mut values = Values::new()
            .with("name", definition.name.as_str())
            .with("project_id", project_id)
            .with("priority", definition.priority.as_str());

        if let Some(description) = definition.description.as_deref().filter(|d| !d.is_empty()) {
            values.set("description", description);
        }
        if let Some(stage_id) = definition.stage_id {
            values.set("stage_id", stage_id);
        }
        if let Some(parent_id) = definition.parent_id {
            values.set("parent_id", parent_id);
        }
        if !definition.tag_names.is_empty() {
            let tag_ids = self.resolve_or_create_tags(&definition.tag_names).await?;
            values.set("tag_ids", LinkOp::ReplaceAll(tag_ids));
        }
        if let Some(hours) = definition.planned_hours {
            if let Some(field) = self.resolve_concept(TASK_MODEL, ESTIMATED_EFFORT).await? {
                values.set(field, hours);
            }
        }
        if !definition.user_ids.is_empty() {
            values.set("user_ids", LinkOp::ReplaceAll(definition.user_ids.clone()));
        }

        self.create(TASK_MODEL, &values).await
    }

    /// Create `definitions` in order, one create per definition.
    ///
    /// Stops at the first failure. Tasks created before it stay created.
    pub async fn create_task_batch(
        &self,
        project_id: RecordId,
        definitions: &[TaskDefinition],
    ) -> OdooResult<Vec<CreatedTask>> {
        let mut created = Vec::with_capacity(definitions.len());

        for definition in definitions {
            match self.create_task(project_id, definition).await {
                Ok(id) => created.push(CreatedTask {
                    id,
                    name: definition.name.clone(),
                }),
                Err(e) => {
                    if !created.is_empty() {
                        warn!(
                            project_id,
                            created = created.len(),
                            total = definitions.len(),
                            failed = %definition.name,
                            "task batch interrupted"
                        );
                    }
                    return Err(e);
                }
            }
        }

        Ok(created)
    }

    /// Tasks of a project, optionally restricted to one stage.
    pub async fn list_tasks(
        &self,
        project_id: RecordId,
        stage_id: Option<RecordId>,
        limit: usize,
    ) -> OdooResult<Vec<Record>> {
        let mut domain = Domain::all().leaf("project_id", "=", project_id);
        if let Some(stage_id) = stage_id {
            domain = domain.leaf("stage_id", "=", stage_id);
        }

        let mut fields = vec![
            "id".to_string(),
            "name".to_string(),
            "stage_id".to_string(),
            "priority".to_string(),
            "user_ids".to_string(),
            "tag_ids".to_string(),
            "parent_id".to_string(),
            "child_ids".to_string(),
        ];
        if let Some(effort) = self.resolve_concept(TASK_MODEL, ESTIMATED_EFFORT).await? {
            fields.push(effort);
        }
        fields.push("date_deadline".to_string());

        self.find(
            TASK_MODEL,
            &domain,
            &SearchOptions::new()
                .fields(fields.as_slice())
                .limit(limit)
                .order("sequence asc, id asc"),
        )
        .await
    }

    /// Apply only the fields set in `update`.
    ///
    /// An update with nothing to write is refused with
    /// [`OdooError::EmptyUpdate`].
    pub async fn update_task(
        &self,
        task_id: RecordId,
        update: &TaskUpdate,
    ) -> OdooResult<TaskUpdateOutcome> {
        if update.is_empty() {
            return Err(OdooError::EmptyUpdate);
        }

        let mut values = Values::new();
        if let Some(name) = &update.name {
            values.set("name", name.as_str());
        }
        if let Some(description) = &update.description {
            values.set("description", description.as_str());
        }
        if let Some(priority) = update.priority {
            values.set("priority", priority.as_str());
        }
        if let Some(stage_id) = update.stage_id {
            values.set("stage_id", stage_id);
        }
        if let Some(parent_id) = update.parent_id {
            values.set("parent_id", parent_id);
        }
        if let Some(hours) = update.planned_hours {
            if let Some(field) = self.resolve_concept(TASK_MODEL, ESTIMATED_EFFORT).await? {
                values.set(field, hours);
            }
        }
        if let Some(deadline) = &update.date_deadline {
            values.set("date_deadline", deadline.as_str());
        }
        if let Some(tag_names) = &update.tag_names {
            let tag_ids = self.resolve_or_create_tags(tag_names).await?;
            values.set("tag_ids", LinkOp::ReplaceAll(tag_ids));
        }
        if let Some(user_ids) = &update.user_ids {
            values.set("user_ids", LinkOp::ReplaceAll(user_ids.clone()));
        }

        self.update(TASK_MODEL, &[task_id], &values).await?;

        Ok(TaskUpdateOutcome {
            task_id,
            fields_changed: values.keys().map(str::to_string).collect(),
        })
    }
}
