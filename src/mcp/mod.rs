//! Model Context Protocol (MCP) server
//!
//! Exposes the Odoo project operations as MCP tools over stdio.
//!
//! - **server**: [`OdooMcpServer`], the tool handler holding the shared client
//! - **service**: stdio serving loop
//! - **tools**: one module per entity (projects, tasks, users, tags,
//!   milestones, generic records, connection check)

pub mod server;
mod service;
pub mod tools;


pub use server::OdooMcpServer;
pub use service::{ServeError, serve_stdio};
