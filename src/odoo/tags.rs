//! Project tags: listing and name-to-id resolution.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::odoo::client::OdooClient;
use crate::odoo::error::OdooResult;
use crate::odoo::transport::Transport;
use crate::odoo::values::{DEFAULT_LIMIT, Domain, Record, RecordId, SearchOptions, Values};

pub const TAG_MODEL: &str = "project.tags";

impl<T: Transport> OdooClient<T> {
    /// All project tags, by name.
    pub async fn list_tags(&self) -> OdooResult<Vec<Record>> {
        self.find(
            TAG_MODEL,
            &Domain::all(),
            &SearchOptions::new()
                .fields(&["id", "name", "color"])
                .order("name asc"),
        )
        .await
    }

    /// Map tag names to ids, creating tags that do not exist yet.
    ///
    /// One lookup fetches the existing tags whose name is in `names`; the
    /// server matches exactly, results are compared case-insensitively.
    /// A name without a match is created with the caller's casing, and later
    /// names in the same call that differ only in case reuse that id. The
    /// output has one id per input name, in input order.
    pub async fn resolve_or_create_tags(&self, names: &[String]) -> OdooResult<Vec<RecordId>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let existing = self
            .find(
                TAG_MODEL,
                &Domain::all().leaf("name", "in", names.to_vec()),
                &SearchOptions::new()
                    .fields(&["id", "name"])
                    .limit(names.len().max(DEFAULT_LIMIT)),
            )
            .await?;

        let mut by_name: HashMap<String, RecordId> = existing
            .iter()
            .filter_map(|tag| {
                let name = tag.get("name").and_then(Value::as_str)?;
                let id = tag.get("id").and_then(Value::as_i64)?;
                Some((name.to_lowercase(), id))
            })
            .collect();

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let key = name.to_lowercase();
            if let Some(id) = by_name.get(&key) {
                ids.push(*id);
                continue;
            }
            let id = self
                .create(TAG_MODEL, &Values::new().with("name", name.as_str()))
                .await?;
            debug!(tag = %name, id, "created tag");
            by_name.insert(key, id);
            ids.push(id);
        }

        Ok(ids)
    }
}
