//! Client layer over Odoo's `execute_kw` interface.
//!
//! # Architecture
//!
//! - `transport`: wire calls (`Transport` trait, JSON-RPC implementation)
//! - `session`: lazy authentication and the `execute` primitive
//! - `schema`: per-model field discovery and field-name resolution
//! - `values`: typed field values, x2many link operations, domains
//! - `crud`: generic search/read/create/write/unlink
//! - `tags`, `tasks`, `projects`, `users`, `milestones`: project operations
//!
//! Everything above `session` is expressed as `impl` blocks on
//! [`OdooClient`], generic over `T: Transport`.

mod client;
mod crud;
mod error;
mod milestones;
mod projects;
pub mod schema;
pub mod session;
mod tags;
mod tasks;
pub mod transport;
mod users;
pub mod values;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod crud_test;

pub use client::OdooClient;
pub use error::{OdooError, OdooResult};
pub use milestones::MILESTONE_MODEL;
pub use projects::{PROJECT_MODEL, STAGE_MODEL};
pub use schema::{ESTIMATED_EFFORT, FieldConcept, SchemaCache};
pub use session::{RemoteSession, ServerVersion, Uid};
pub use tags::TAG_MODEL;
pub use tasks::{CreatedTask, Priority, TASK_MODEL, TaskDefinition, TaskUpdate, TaskUpdateOutcome};
pub use transport::{JsonRpcTransport, Transport};
pub use users::{DEFAULT_USER_LIMIT, USER_MODEL};
pub use values::{
    DEFAULT_LIMIT, Domain, FieldValue, LinkOp, Record, RecordId, SearchOptions, Values,
};
