pub mod cli;
pub mod config;
pub mod doctor;
pub mod mcp;
pub mod odoo;
