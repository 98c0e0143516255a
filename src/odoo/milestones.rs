//! Project milestones.

use crate::odoo::client::OdooClient;
use crate::odoo::error::OdooResult;
use crate::odoo::transport::Transport;
use crate::odoo::values::{Domain, Record, RecordId, SearchOptions, Values};

pub const MILESTONE_MODEL: &str = "project.milestone";

impl<T: Transport> OdooClient<T> {
    pub async fn create_milestone(
        &self,
        project_id: RecordId,
        name: &str,
        deadline: Option<&str>,
    ) -> OdooResult<RecordId> {
        let mut values = Values::new()
            .with("name", name)
            .with("project_id", project_id);
        if let Some(deadline) = deadline.filter(|d| !d.is_empty()) {
            values.set("deadline", deadline);
        }

        self.create(MILESTONE_MODEL, &values).await
    }

    /// Milestones of a project, earliest deadline first.
    pub async fn list_milestones(&self, project_id: RecordId) -> OdooResult<Vec<Record>> {
        self.find(
            MILESTONE_MODEL,
            &Domain::all().leaf("project_id", "=", project_id),
            &SearchOptions::new()
                .fields(&["id", "name", "deadline", "is_reached"])
                .order("deadline asc, id asc"),
        )
        .await
    }
}
