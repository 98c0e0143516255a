//! Generic record operations.
//!
//! Each operation is a single `execute_kw` call. Failures are returned as
//! they come; nothing here retries.

use serde_json::{Map, Value, json};

use crate::odoo::client::OdooClient;
use crate::odoo::error::{OdooError, OdooResult};
use crate::odoo::transport::Transport;
use crate::odoo::values::{Domain, Record, RecordId, SearchOptions, Values};

impl<T: Transport> OdooClient<T> {
    /// Search and read in one call (`search_read`).
    pub async fn find(
        &self,
        model: &str,
        domain: &Domain,
        options: &SearchOptions,
    ) -> OdooResult<Vec<Record>> {
        let result = self
            .session()
            .execute(
                model,
                "search_read",
                vec![domain.to_wire()],
                options.to_kwargs(),
            )
            .await?;
        into_records(result)
    }

    /// Create one record and return its id.
    pub async fn create(&self, model: &str, values: &Values) -> OdooResult<RecordId> {
        let result = self
            .session()
            .execute(model, "create", vec![values.to_wire()], Map::new())
            .await?;
        into_id(result)
    }

    /// Write the same values to every id in `ids`.
    ///
    /// An empty `values` is refused before anything is sent.
    pub async fn update(&self, model: &str, ids: &[RecordId], values: &Values) -> OdooResult<bool> {
        if values.is_empty() {
            return Err(OdooError::EmptyUpdate);
        }

        let result = self
            .session()
            .execute(model, "write", vec![json!(ids), values.to_wire()], Map::new())
            .await?;
        into_flag(result)
    }

    pub async fn delete(&self, model: &str, ids: &[RecordId]) -> OdooResult<bool> {
        let result = self
            .session()
            .execute(model, "unlink", vec![json!(ids)], Map::new())
            .await?;
        into_flag(result)
    }

    /// Read records by id. Order follows the server response.
    pub async fn read_by_ids(
        &self,
        model: &str,
        ids: &[RecordId],
        fields: Option<&[String]>,
    ) -> OdooResult<Vec<Record>> {
        let mut kwargs = Map::new();
        if let Some(fields) = fields.filter(|f| !f.is_empty()) {
            kwargs.insert("fields".to_string(), json!(fields));
        }

        let result = self
            .session()
            .execute(model, "read", vec![json!(ids)], kwargs)
            .await?;
        into_records(result)
    }
}

fn into_records(result: Value) -> OdooResult<Vec<Record>> {
    let Value::Array(items) = result else {
        return Err(OdooError::invalid_response("expected a list of records"));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(OdooError::invalid_response(format!(
                "expected a record, got {other}"
            ))),
        })
        .collect()
}

fn into_id(result: Value) -> OdooResult<RecordId> {
    // `create` called with a single dict returns an int; some versions wrap
    // it in a one-element list.
    let id = match &result {
        Value::Number(n) => n.as_i64(),
        Value::Array(items) if items.len() == 1 => items[0].as_i64(),
        _ => None,
    };
    id.ok_or_else(|| OdooError::invalid_response(format!("expected a record id, got {result}")))
}

fn into_flag(result: Value) -> OdooResult<bool> {
    match result {
        Value::Bool(flag) => Ok(flag),
        // Methods returning None on the server side arrive as null.
        Value::Null => Ok(true),
        other => Err(OdooError::invalid_response(format!(
            "expected a boolean, got {other}"
        ))),
    }
}
