//! Per-model field discovery and cross-version field name resolution.
//!
//! Odoo renames fields between releases (`planned_hours` became
//! `allocated_hours` in 17.0). The available field names of a model are
//! fetched once per session with `fields_get` and consulted to pick the
//! name that exists on the connected server.
//!
//! Entries are never evicted: the server schema is assumed stable for the
//! lifetime of the process.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Map, Value, json};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::odoo::error::{OdooError, OdooResult};
use crate::odoo::session::RemoteSession;
use crate::odoo::transport::Transport;

pub type FieldSet = Arc<HashSet<String>>;

/// A logical attribute and the physical names it has had, in priority
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConcept {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

/// Estimated effort on a task.
pub const ESTIMATED_EFFORT: FieldConcept = FieldConcept {
    name: "estimated effort",
    candidates: &["planned_hours", "allocated_hours"],
};

#[derive(Default)]
pub struct SchemaCache {
    entries: DashMap<String, Arc<OnceCell<FieldSet>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names available on `model`.
    ///
    /// The first query per model issues one `fields_get` call; concurrent
    /// first queries share it. A failed fetch leaves no entry behind.
    pub async fn fields_of<T: Transport>(
        &self,
        session: &RemoteSession<T>,
        model: &str,
    ) -> OdooResult<FieldSet> {
        // Clone the cell out so no map guard is held across the await.
        let cell = Arc::clone(self.entries.entry(model.to_string()).or_default().value());

        let fields = cell
            .get_or_try_init(|| fetch_fields(session, model))
            .await?;
        Ok(Arc::clone(fields))
    }

    /// First of `candidates` present on `model`, or `None` when the server
    /// has none of them.
    pub async fn resolve_field<T: Transport>(
        &self,
        session: &RemoteSession<T>,
        model: &str,
        candidates: &[&str],
    ) -> OdooResult<Option<String>> {
        let fields = self.fields_of(session, model).await?;
        Ok(candidates
            .iter()
            .find(|candidate| fields.contains(**candidate))
            .map(|candidate| candidate.to_string()))
    }

    /// Models whose schema has been loaded.
    pub fn cached_models(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect()
    }
}

async fn fetch_fields<T: Transport>(
    session: &RemoteSession<T>,
    model: &str,
) -> OdooResult<FieldSet> {
    let mut kwargs = Map::new();
    kwargs.insert("attributes".to_string(), json!(["type"]));

    let result = session.execute(model, "fields_get", vec![], kwargs).await?;
    let Value::Object(fields) = result else {
        return Err(OdooError::invalid_response(format!(
            "fields_get on {model} did not return an object"
        )));
    };

    debug!(model, count = fields.len(), "loaded model fields");
    Ok(Arc::new(fields.into_iter().map(|(name, _)| name).collect()))
}
