//! Typed record values, relational link operations and search domains.
//!
//! Field values are kept as tagged variants until they are handed to the
//! session, where [`Values::to_wire`] produces the JSON Odoo expects. The
//! compact x2many command encoding only exists at that boundary.

use serde_json::{Map, Value, json};

/// Numeric database identifier of an Odoo record.
pub type RecordId = i64;

/// A record as returned by `search_read` / `read`.
pub type Record = Map<String, Value>;

/// Operation on a many2many / one2many field.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOp {
    /// Replace the whole set with these ids.
    ReplaceAll(Vec<RecordId>),
    /// Link these ids, keeping existing ones.
    Add(Vec<RecordId>),
    /// Unlink these ids without deleting the records.
    Remove(Vec<RecordId>),
    /// Unlink everything.
    Clear,
}

impl LinkOp {
    pub fn to_wire(&self) -> Value {
        match self {
            LinkOp::ReplaceAll(ids) => json!([[6, 0, ids]]),
            LinkOp::Add(ids) => Value::Array(ids.iter().map(|id| json!([4, id, 0])).collect()),
            LinkOp::Remove(ids) => Value::Array(ids.iter().map(|id| json!([3, id, 0])).collect()),
            LinkOp::Clear => json!([[5, 0, 0]]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Unset the field. Odoo spells this `false`.
    Null,
    Links(LinkOp),
    /// Arbitrary JSON passed through untouched.
    Raw(Value),
}

impl FieldValue {
    pub fn to_wire(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => json!(i),
            FieldValue::Float(f) => json!(f),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Null => Value::Bool(false),
            FieldValue::Links(op) => op.to_wire(),
            FieldValue::Raw(v) => v.clone(),
        }
    }

    /// Classify a caller-supplied JSON value.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n
                    .as_f64()
                    .map(FieldValue::Float)
                    .unwrap_or(FieldValue::Raw(Value::Number(n))),
            },
            other => FieldValue::Raw(other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<LinkOp> for FieldValue {
    fn from(op: LinkOp) -> Self {
        FieldValue::Links(op)
    }
}

/// Field name to value map that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: Vec<(String, FieldValue)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, replacing an existing value in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_wire(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_wire()))
            .collect();
        Value::Object(map)
    }

    pub fn from_json_map(map: Map<String, Value>) -> Self {
        let mut values = Values::new();
        for (name, value) in map {
            values.set(name, FieldValue::from_json(value));
        }
        values
    }
}

/// A search filter in Odoo's prefix notation.
///
/// Leaves are `[field, operator, value]` triples; the strings `"&"`, `"|"`
/// and `"!"` combine the terms that follow them. Terms with no explicit
/// operator are ANDed together by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    terms: Vec<Value>,
}

impl Domain {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Wrap a caller-supplied domain. Must be a JSON array (or null).
    pub fn from_terms(terms: Value) -> Result<Self, String> {
        match terms {
            Value::Null => Ok(Self::all()),
            Value::Array(terms) => Ok(Self { terms }),
            other => Err(format!("domain must be a list, got {other}")),
        }
    }

    pub fn leaf(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.terms.push(json!([field, operator, value.into()]));
        self
    }

    pub fn and(mut self) -> Self {
        self.terms.push(json!("&"));
        self
    }

    pub fn or(mut self) -> Self {
        self.terms.push(json!("|"));
        self
    }

    pub fn not(mut self) -> Self {
        self.terms.push(json!("!"));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn to_wire(&self) -> Value {
        Value::Array(self.terms.clone())
    }
}

/// Default page size for searches.
pub const DEFAULT_LIMIT: usize = 100;

/// Projection and pagination for [`find`](crate::odoo::OdooClient::find).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub fields: Option<Vec<String>>,
    pub limit: usize,
    pub offset: usize,
    /// Passed through verbatim, e.g. `"sequence asc, id asc"`.
    pub order: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fields: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            order: None,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.fields = Some(fields.iter().map(|f| f.as_ref().to_string()).collect());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub(crate) fn to_kwargs(&self) -> Map<String, Value> {
        let mut kwargs = Map::new();
        kwargs.insert("limit".to_string(), json!(self.limit));
        kwargs.insert("offset".to_string(), json!(self.offset));
        if let Some(fields) = self.fields.as_ref().filter(|f| !f.is_empty()) {
            kwargs.insert("fields".to_string(), json!(fields));
        }
        if let Some(order) = self.order.as_ref().filter(|o| !o.is_empty()) {
            kwargs.insert("order".to_string(), json!(order));
        }
        kwargs
    }
}
