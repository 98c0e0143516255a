//! Wire transport to the Odoo server.
//!
//! Odoo exposes two services used here: `common` (authenticate, version)
//! and `object` (execute_kw). The [`Transport`] trait is the seam between
//! the client and the network so the rest of the layer can be tested
//! against an in-memory backend.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::odoo::error::{OdooError, OdooResult};

#[cfg(test)]
use mockall::automock;

pub const SERVICE_COMMON: &str = "common";
pub const SERVICE_OBJECT: &str = "object";

/// A single request/response call against an Odoo service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `method` on `service` with positional `args`, returning the
    /// method-specific result.
    async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> OdooResult<Value>;
}

/// JSON-RPC transport posting to `<url>/jsonrpc`.
pub struct JsonRpcTransport {
    endpoint: String,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(config: &ConnectionConfig) -> OdooResult<Self> {
        // reqwest is built without a default crypto provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            endpoint: format!("{}/jsonrpc", config.url()),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> OdooResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, service, method, "jsonrpc call");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&build_request(service, method, args, id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OdooError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        parse_response(body)
    }
}

/// Build the JSON-RPC envelope for a service call.
pub fn build_request(service: &str, method: &str, args: Vec<Value>, id: u64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": {
            "service": service,
            "method": method,
            "args": args,
        },
        "id": id,
    })
}

/// Extract the `result` member, or turn the `error` member into an
/// [`OdooError::Remote`].
///
/// Odoo puts the useful message (e.g. the `ValidationError` text) in
/// `error.data.message`; the top-level `error.message` is usually just
/// "Odoo Server Error".
pub fn parse_response(body: Value) -> OdooResult<Value> {
    let Value::Object(mut envelope) = body else {
        return Err(OdooError::invalid_response("response is not a JSON object"));
    };

    if let Some(error) = envelope.remove("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("data")
            .and_then(|data| data.get("message"))
            .and_then(Value::as_str)
            .or_else(|| error.get("message").and_then(Value::as_str))
            .unwrap_or("Unknown error")
            .to_string();
        return Err(OdooError::Remote { code, message });
    }

    envelope
        .remove("result")
        .ok_or_else(|| OdooError::invalid_response("response has neither result nor error"))
}
