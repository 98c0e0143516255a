//! Projects and their kanban stages.

use crate::odoo::client::OdooClient;
use crate::odoo::error::OdooResult;
use crate::odoo::transport::Transport;
use crate::odoo::values::{Domain, Record, RecordId, SearchOptions};

pub const PROJECT_MODEL: &str = "project.project";
pub const STAGE_MODEL: &str = "project.task.type";

impl<T: Transport> OdooClient<T> {
    /// Projects with manager, customer, tags and task count.
    pub async fn list_projects(&self, active_only: bool) -> OdooResult<Vec<Record>> {
        let domain = if active_only {
            Domain::all().leaf("active", "=", true)
        } else {
            Domain::all()
        };

        self.find(
            PROJECT_MODEL,
            &domain,
            &SearchOptions::new()
                .fields(&["id", "name", "user_id", "partner_id", "tag_ids", "task_count"])
                .order("name asc"),
        )
        .await
    }

    /// Stages (kanban columns) attached to a project, in board order.
    pub async fn project_stages(&self, project_id: RecordId) -> OdooResult<Vec<Record>> {
        self.find(
            STAGE_MODEL,
            &Domain::all().leaf("project_ids", "in", vec![project_id]),
            &SearchOptions::new()
                .fields(&["id", "name", "sequence", "fold"])
                .order("sequence asc"),
        )
        .await
    }
}
