//! Error types for the Odoo client layer.
//!
//! Uses miette for diagnostic output and thiserror for derive macros.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Diagnostic, Debug)]
pub enum OdooError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Odoo authentication failed for {username}@{url}")]
    #[diagnostic(
        code(odoo_mcp::odoo::authentication_failed),
        help("Check ODOO_USERNAME and ODOO_API_KEY, and that ODOO_DB names an existing database.")
    )]
    AuthenticationFailed { username: String, url: String },

    #[error("Failed to reach Odoo server: {source}")]
    #[diagnostic(
        code(odoo_mcp::odoo::transport),
        help("Is ODOO_URL reachable from this machine? It should be the base host, e.g. https://company.odoo.com")
    )]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Odoo server returned HTTP {status}: {message}")]
    #[diagnostic(code(odoo_mcp::odoo::http))]
    Http { status: u16, message: String },

    #[error("Odoo error ({code}): {message}")]
    #[diagnostic(code(odoo_mcp::odoo::remote))]
    Remote { code: i64, message: String },

    #[error("Unexpected response from Odoo: {message}")]
    #[diagnostic(code(odoo_mcp::odoo::invalid_response))]
    InvalidResponse { message: String },

    #[error("No fields provided to update")]
    #[diagnostic(code(odoo_mcp::odoo::empty_update))]
    EmptyUpdate,
}

impl OdooError {
    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        OdooError::InvalidResponse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for OdooError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OdooError::InvalidResponse {
                message: e.to_string(),
            }
        } else {
            OdooError::Transport { source: e }
        }
    }
}

impl From<serde_json::Error> for OdooError {
    fn from(e: serde_json::Error) -> Self {
        OdooError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type OdooResult<T> = Result<T, OdooError>;
