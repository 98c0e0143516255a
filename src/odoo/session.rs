//! Authenticated session against one Odoo database.
//!
//! Authentication is lazy: the first call that needs a user id performs it
//! and the id is kept for the life of the session. A failed attempt caches
//! nothing, so the next call tries again from scratch.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::odoo::error::{OdooError, OdooResult};
use crate::odoo::transport::{SERVICE_COMMON, SERVICE_OBJECT, Transport};

/// User id returned by `common.authenticate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub i64);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of `common.version`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    #[serde(default)]
    pub server_version: String,
    #[serde(default)]
    pub server_version_info: Vec<Value>,
    #[serde(default)]
    pub server_serie: Option<String>,
    #[serde(default)]
    pub protocol_version: Option<i64>,
}

pub struct RemoteSession<T: Transport> {
    config: ConnectionConfig,
    transport: T,
    uid: OnceCell<Uid>,
}

impl<T: Transport> RemoteSession<T> {
    pub fn new(config: ConnectionConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            uid: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Return the cached user id, authenticating first if needed.
    ///
    /// Concurrent callers wait on a single in-flight authentication.
    pub async fn uid(&self) -> OdooResult<Uid> {
        self.uid
            .get_or_try_init(|| self.authenticate())
            .await
            .copied()
    }

    /// Whether a user id has been obtained.
    pub fn is_authenticated(&self) -> bool {
        self.uid.initialized()
    }

    async fn authenticate(&self) -> OdooResult<Uid> {
        let result = self
            .transport
            .call(
                SERVICE_COMMON,
                "authenticate",
                vec![
                    json!(self.config.db()),
                    json!(self.config.username()),
                    json!(self.config.api_key()),
                    json!({}),
                ],
            )
            .await?;

        // Odoo answers `false` for bad credentials.
        match result.as_i64() {
            Some(id) if id > 0 => {
                info!(uid = id, url = self.config.url(), "Authenticated with Odoo");
                Ok(Uid(id))
            }
            _ => Err(OdooError::AuthenticationFailed {
                username: self.config.username().to_string(),
                url: self.config.url().to_string(),
            }),
        }
    }

    /// Server version info. Does not authenticate.
    pub async fn version(&self) -> OdooResult<ServerVersion> {
        let result = self.transport.call(SERVICE_COMMON, "version", vec![]).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Run `method` on `model` through `execute_kw`.
    ///
    /// Exactly one remote call per invocation (plus the authentication call
    /// the first time). Arguments are not checked locally.
    pub async fn execute(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> OdooResult<Value> {
        let uid = self.uid().await?;
        debug!(model, method, "execute_kw");

        self.transport
            .call(
                SERVICE_OBJECT,
                "execute_kw",
                vec![
                    json!(self.config.db()),
                    json!(uid.0),
                    json!(self.config.api_key()),
                    json!(model),
                    json!(method),
                    Value::Array(args),
                    Value::Object(kwargs),
                ],
            )
            .await
    }
}
