//! The Odoo client: one session plus its schema cache.
//!
//! Higher-level operations live in sibling modules as further `impl`
//! blocks on [`OdooClient`] (generic record access in `crud`, tags,
//! tasks, projects, users and milestones).

use crate::config::ConnectionConfig;
use crate::odoo::error::OdooResult;
use crate::odoo::schema::{FieldConcept, FieldSet, SchemaCache};
use crate::odoo::session::{RemoteSession, ServerVersion, Uid};
use crate::odoo::transport::{JsonRpcTransport, Transport};

/// Client for one Odoo database.
///
/// Generic over `T: Transport` so tests can substitute an in-memory
/// backend. Meant to be built once at startup and shared by reference
/// (`Arc`); the session id and schema cache are safe for concurrent use.
pub struct OdooClient<T: Transport> {
    session: RemoteSession<T>,
    schema: SchemaCache,
}

impl OdooClient<JsonRpcTransport> {
    /// Client talking JSON-RPC to the configured server.
    pub fn connect(config: ConnectionConfig) -> OdooResult<Self> {
        let transport = JsonRpcTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> OdooClient<T> {
    pub fn new(config: ConnectionConfig, transport: T) -> Self {
        Self {
            session: RemoteSession::new(config, transport),
            schema: SchemaCache::new(),
        }
    }

    pub fn session(&self) -> &RemoteSession<T> {
        &self.session
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.session.config()
    }

    pub fn transport(&self) -> &T {
        self.session.transport()
    }

    pub fn url(&self) -> &str {
        self.session.config().url()
    }

    pub async fn uid(&self) -> OdooResult<Uid> {
        self.session.uid().await
    }

    pub async fn version(&self) -> OdooResult<ServerVersion> {
        self.session.version().await
    }

    pub async fn fields_of(&self, model: &str) -> OdooResult<FieldSet> {
        self.schema.fields_of(&self.session, model).await
    }

    pub async fn resolve_field(
        &self,
        model: &str,
        candidates: &[&str],
    ) -> OdooResult<Option<String>> {
        self.schema
            .resolve_field(&self.session, model, candidates)
            .await
    }

    /// Physical field for `concept` on `model`, logging when the server
    /// has no equivalent.
    pub async fn resolve_concept(
        &self,
        model: &str,
        concept: FieldConcept,
    ) -> OdooResult<Option<String>> {
        let field = self.resolve_field(model, concept.candidates).await?;
        if field.is_none() {
            tracing::warn!(model, concept = concept.name, "field not supported by this server");
        }
        Ok(field)
    }

    pub fn schema(&self) -> &SchemaCache {
        &self.schema
    }
}
