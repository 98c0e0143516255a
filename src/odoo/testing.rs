//! In-memory Odoo backend for tests.
//!
//! Implements [`Transport`] with enough of the server behaviour to exercise
//! the client: authentication, `fields_get`, `search_read` with prefix
//! domains and ordering, `create`/`write`/`unlink`/`read`, x2many command
//! decoding, and rejection of unknown fields. Every call is recorded.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::odoo::error::{OdooError, OdooResult};
use crate::odoo::transport::Transport;
use crate::odoo::values::Record;

pub const FAKE_UID: i64 = 2;
pub const FAKE_DB: &str = "acme";
pub const FAKE_API_KEY: &str = "secret-key";

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub service: String,
    pub method: String,
    pub model: Option<String>,
    pub model_method: Option<String>,
    pub args: Vec<Value>,
}

#[derive(Default)]
struct ModelState {
    fields: Vec<String>,
    records: Vec<Record>,
}

#[derive(Default)]
struct State {
    models: HashMap<String, ModelState>,
    next_id: i64,
    rejected_logins: usize,
    failing_creates: Vec<(String, String)>,
    calls: Vec<RecordedCall>,
}

pub struct FakeOdoo {
    state: Mutex<State>,
}

impl Default for FakeOdoo {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeOdoo {
    /// Backend with the project models of a recent server (`allocated_hours`).
    pub fn new() -> Self {
        let fake = Self {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
        };
        fake.with_fields(
            "project.project",
            &["id", "name", "active", "user_id", "partner_id", "tag_ids", "task_count"],
        )
        .with_fields(
            "project.task.type",
            &["id", "name", "sequence", "fold", "project_ids"],
        )
        .with_fields(
            "project.task",
            &[
                "id",
                "name",
                "project_id",
                "priority",
                "description",
                "stage_id",
                "parent_id",
                "child_ids",
                "user_ids",
                "tag_ids",
                "allocated_hours",
                "date_deadline",
                "sequence",
            ],
        )
        .with_fields("project.tags", &["id", "name", "color"])
        .with_fields("res.users", &["id", "name", "email", "share"])
        .with_fields(
            "project.milestone",
            &["id", "name", "project_id", "deadline", "is_reached"],
        )
    }

    /// Replace the field list of `model`.
    pub fn with_fields(self, model: &str, fields: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.models.entry(model.to_string()).or_default().fields =
                fields.iter().map(|f| f.to_string()).collect();
        }
        self
    }

    /// Seed a record. Uses the `id` in `record` when present.
    pub fn with_record(self, model: &str, record: Value) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let Value::Object(mut record) = record else {
                panic!("seed record must be an object");
            };
            let id = match record.get("id").and_then(Value::as_i64) {
                Some(id) => id,
                None => {
                    state.next_id += 1;
                    state.next_id
                }
            };
            record.insert("id".to_string(), json!(id));
            state
                .models
                .entry(model.to_string())
                .or_default()
                .records
                .push(record);
        }
        self
    }

    /// Answer `false` to the next `count` authentication attempts.
    pub fn rejecting_logins(self, count: usize) -> Self {
        self.state.lock().unwrap().rejected_logins = count;
        self
    }

    /// Fail any `create` on `model` whose `name` equals `name`.
    pub fn failing_create(self, model: &str, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_creates
            .push((model.to_string(), name.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of `execute_kw` calls running `method` on `model`.
    pub fn count(&self, model: &str, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.model.as_deref() == Some(model) && c.model_method.as_deref() == Some(method))
            .count()
    }

    /// Number of calls to a `common` service method.
    pub fn count_common(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.service == "common" && c.method == method)
            .count()
    }

    pub fn records(&self, model: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .models
            .get(model)
            .map(|m| m.records.clone())
            .unwrap_or_default()
    }

    pub fn record(&self, model: &str, id: i64) -> Option<Record> {
        self.records(model)
            .into_iter()
            .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
    }
}

#[async_trait]
impl Transport for FakeOdoo {
    async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> OdooResult<Value> {
        let mut state = self.state.lock().unwrap();

        let (model, model_method) = if service == "object" && method == "execute_kw" {
            (
                args.get(3).and_then(Value::as_str).map(str::to_string),
                args.get(4).and_then(Value::as_str).map(str::to_string),
            )
        } else {
            (None, None)
        };
        state.calls.push(RecordedCall {
            service: service.to_string(),
            method: method.to_string(),
            model,
            model_method,
            args: args.clone(),
        });

        match (service, method) {
            ("common", "version") => Ok(json!({
                "server_version": "17.0",
                "server_version_info": [17, 0, 0, "final", 0, ""],
                "server_serie": "17.0",
                "protocol_version": 1
            })),
            ("common", "authenticate") => {
                if state.rejected_logins > 0 {
                    state.rejected_logins -= 1;
                    return Ok(json!(false));
                }
                let valid = args.first() == Some(&json!(FAKE_DB))
                    && args.get(2) == Some(&json!(FAKE_API_KEY));
                Ok(if valid { json!(FAKE_UID) } else { json!(false) })
            }
            ("object", "execute_kw") => state.execute_kw(args),
            _ => Err(remote(format!("unknown method {service}.{method}"))),
        }
    }
}

impl State {
    fn execute_kw(&mut self, args: Vec<Value>) -> OdooResult<Value> {
        let mut args = args.into_iter();
        let db = args.next().unwrap_or(Value::Null);
        let uid = args.next().unwrap_or(Value::Null);
        let key = args.next().unwrap_or(Value::Null);
        let model = args.next().and_then(|v| v.as_str().map(str::to_string));
        let method = args.next().and_then(|v| v.as_str().map(str::to_string));
        let params = match args.next() {
            Some(Value::Array(params)) => params,
            _ => Vec::new(),
        };
        let kwargs = match args.next() {
            Some(Value::Object(kwargs)) => kwargs,
            _ => Map::new(),
        };

        if db != json!(FAKE_DB) || uid != json!(FAKE_UID) || key != json!(FAKE_API_KEY) {
            return Err(remote("Access Denied"));
        }
        let model = model.ok_or_else(|| remote("missing model"))?;
        let method = method.ok_or_else(|| remote("missing method"))?;

        let next_id = &mut self.next_id;
        let failing_creates = &self.failing_creates;
        let state = self
            .models
            .get_mut(&model)
            .ok_or_else(|| remote(format!("Object {model} doesn't exist")))?;

        match method.as_str() {
            "fields_get" => Ok(Value::Object(
                state
                    .fields
                    .iter()
                    .map(|f| (f.clone(), json!({"type": "char"})))
                    .collect(),
            )),
            "search_read" => {
                let domain = params.first().cloned().unwrap_or(json!([]));
                let terms = domain.as_array().cloned().unwrap_or_default();
                let fields = requested_fields(&kwargs);
                state.check_fields(&model, fields.as_deref())?;

                let mut matched: Vec<&Record> = state
                    .records
                    .iter()
                    .filter(|r| domain_matches(&terms, r))
                    .collect();
                if let Some(order) = kwargs.get("order").and_then(Value::as_str) {
                    sort_records(&mut matched, order);
                }

                let offset = kwargs.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
                let limit = kwargs
                    .get("limit")
                    .and_then(Value::as_u64)
                    .map(|l| l as usize)
                    .unwrap_or(usize::MAX);

                Ok(Value::Array(
                    matched
                        .into_iter()
                        .skip(offset)
                        .take(limit)
                        .map(|r| Value::Object(project(r, fields.as_deref())))
                        .collect(),
                ))
            }
            "read" => {
                let ids = ids_of(params.first());
                let fields = requested_fields(&kwargs);
                state.check_fields(&model, fields.as_deref())?;
                Ok(Value::Array(
                    state
                        .records
                        .iter()
                        .filter(|r| r.get("id").and_then(Value::as_i64).is_some_and(|id| ids.contains(&id)))
                        .map(|r| Value::Object(project(r, fields.as_deref())))
                        .collect(),
                ))
            }
            "create" => {
                let Some(Value::Object(values)) = params.into_iter().next() else {
                    return Err(remote("create expects a dict"));
                };
                state.check_fields(&model, Some(values.keys().cloned().collect::<Vec<_>>().as_slice()))?;
                let name = values.get("name").and_then(Value::as_str).unwrap_or_default();
                if failing_creates.iter().any(|(m, n)| *m == model && n == name) {
                    return Err(remote(format!("cannot create {name}")));
                }

                *next_id += 1;
                let id = *next_id;
                let mut record = Record::new();
                record.insert("id".to_string(), json!(id));
                apply_values(&mut record, values);
                state.records.push(record);
                Ok(json!(id))
            }
            "write" => {
                let mut params = params.into_iter();
                let ids = ids_of(params.next().as_ref());
                let Some(Value::Object(values)) = params.next() else {
                    return Err(remote("write expects a dict"));
                };
                state.check_fields(&model, Some(values.keys().cloned().collect::<Vec<_>>().as_slice()))?;
                for id in &ids {
                    if !state.records.iter().any(|r| r.get("id") == Some(&json!(id))) {
                        return Err(remote(format!("Record {model}({id}) does not exist")));
                    }
                }
                for record in state
                    .records
                    .iter_mut()
                    .filter(|r| r.get("id").and_then(Value::as_i64).is_some_and(|id| ids.contains(&id)))
                {
                    apply_values(record, values.clone());
                }
                Ok(json!(true))
            }
            "unlink" => {
                let ids = ids_of(params.first());
                let before = state.records.len();
                state
                    .records
                    .retain(|r| !r.get("id").and_then(Value::as_i64).is_some_and(|id| ids.contains(&id)));
                if before - state.records.len() != ids.len() {
                    return Err(remote("Record does not exist or has been deleted"));
                }
                Ok(json!(true))
            }
            other => Err(remote(format!("method {other} not supported on {model}"))),
        }
    }
}

impl ModelState {
    fn check_fields(&self, model: &str, fields: Option<&[String]>) -> OdooResult<()> {
        for field in fields.unwrap_or_default() {
            if !self.fields.contains(field) {
                return Err(remote(format!("Invalid field '{field}' on model '{model}'")));
            }
        }
        Ok(())
    }
}

fn remote(message: impl Into<String>) -> OdooError {
    OdooError::Remote {
        code: 200,
        message: message.into(),
    }
}

fn requested_fields(kwargs: &Map<String, Value>) -> Option<Vec<String>> {
    kwargs.get("fields").and_then(Value::as_array).map(|fields| {
        fields
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn ids_of(value: Option<&Value>) -> Vec<i64> {
    match value {
        Some(Value::Array(ids)) => ids.iter().filter_map(Value::as_i64).collect(),
        Some(Value::Number(n)) => n.as_i64().into_iter().collect(),
        _ => Vec::new(),
    }
}

fn project(record: &Record, fields: Option<&[String]>) -> Record {
    match fields {
        None => record.clone(),
        Some(fields) => {
            let mut out = Record::new();
            out.insert("id".to_string(), record.get("id").cloned().unwrap_or(Value::Null));
            for field in fields {
                out.insert(
                    field.clone(),
                    record.get(field).cloned().unwrap_or(Value::Bool(false)),
                );
            }
            out
        }
    }
}

/// Store values, decoding x2many command lists into plain id lists.
fn apply_values(record: &mut Record, values: Map<String, Value>) {
    for (field, value) in values {
        let is_commands = value
            .as_array()
            .and_then(|items| items.first())
            .is_some_and(Value::is_array);

        if !is_commands {
            record.insert(field, value);
            continue;
        }

        let mut ids = ids_of(record.get(&field));
        for command in value.as_array().into_iter().flatten() {
            let parts = command.as_array().cloned().unwrap_or_default();
            let code = parts.first().and_then(Value::as_i64);
            let target = parts.get(1).and_then(Value::as_i64);
            match (code, target) {
                (Some(6), _) => ids = ids_of(parts.get(2)),
                (Some(4), Some(id)) if !ids.contains(&id) => ids.push(id),
                (Some(3), Some(id)) => ids.retain(|existing| *existing != id),
                (Some(5), _) => ids.clear(),
                _ => {}
            }
        }
        record.insert(field, json!(ids));
    }
}

fn domain_matches(terms: &[Value], record: &Record) -> bool {
    let mut pos = 0;
    let mut result = true;
    while pos < terms.len() {
        let matched = eval_term(terms, &mut pos, record);
        result = result && matched;
    }
    result
}

fn eval_term(terms: &[Value], pos: &mut usize, record: &Record) -> bool {
    let term = &terms[*pos];
    *pos += 1;
    match term.as_str() {
        Some("&") => {
            let left = eval_term(terms, pos, record);
            let right = eval_term(terms, pos, record);
            left && right
        }
        Some("|") => {
            let left = eval_term(terms, pos, record);
            let right = eval_term(terms, pos, record);
            left || right
        }
        Some("!") => !eval_term(terms, pos, record),
        _ => leaf_matches(term, record),
    }
}

fn leaf_matches(leaf: &Value, record: &Record) -> bool {
    let Some([field, operator, expected]) = leaf.as_array().map(Vec::as_slice).and_then(|s| {
        <&[Value; 3]>::try_from(s).ok()
    }) else {
        return false;
    };
    let field = field.as_str().unwrap_or_default();
    let actual = record.get(field).cloned().unwrap_or(Value::Bool(false));

    match operator.as_str().unwrap_or_default() {
        "=" => value_eq(&actual, expected),
        "!=" => !value_eq(&actual, expected),
        "in" => {
            let candidates = expected.as_array().cloned().unwrap_or_default();
            match &actual {
                Value::Array(items) => items.iter().any(|item| candidates.contains(item)),
                scalar => candidates.contains(scalar),
            }
        }
        "ilike" => {
            let needle = expected.as_str().unwrap_or_default().to_lowercase();
            actual
                .as_str()
                .is_some_and(|hay| hay.to_lowercase().contains(&needle))
        }
        _ => false,
    }
}

fn value_eq(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) if !expected.is_array() => items.contains(expected),
        _ => actual == expected,
    }
}

fn sort_records(records: &mut [&Record], order: &str) {
    let clauses: Vec<(String, bool)> = order
        .split(',')
        .filter_map(|clause| {
            let mut parts = clause.split_whitespace();
            let field = parts.next()?.to_string();
            let descending = parts.next().is_some_and(|dir| dir.eq_ignore_ascii_case("desc"));
            Some((field, descending))
        })
        .collect();

    records.sort_by(|a, b| {
        clauses.iter().fold(Ordering::Equal, |acc, (field, descending)| {
            acc.then_with(|| {
                let ordering = compare_values(a.get(field), b.get(field));
                if *descending { ordering.reverse() } else { ordering }
            })
        })
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or_default()
            .partial_cmp(&y.as_f64().unwrap_or_default())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::String(_)), _) | (Some(Value::Number(_)), _) => Ordering::Less,
        (_, Some(Value::String(_))) | (_, Some(Value::Number(_))) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Client wired to `fake` with credentials the fake accepts.
pub fn fake_client(fake: FakeOdoo) -> crate::odoo::OdooClient<FakeOdoo> {
    let config = crate::config::ConnectionConfig::new(
        "https://acme.odoo.com",
        FAKE_DB,
        "bot@acme.com",
        FAKE_API_KEY,
    )
    .expect("valid test config");
    crate::odoo::OdooClient::new(config, fake)
}
