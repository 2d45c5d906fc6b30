//! Audit sink that writes events to tracing output. Used with the in-memory
//! storage backend.

use async_trait::async_trait;
use artcc_application::{AuditEvent, AuditRepository};
use artcc_core::AppResult;
use tracing::info;

/// Development audit repository that logs events instead of storing them.
#[derive(Clone)]
pub struct TracingAuditRepository;

impl TracingAuditRepository {
    /// Creates a new tracing audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRepository for TracingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let actor = event
            .actor
            .map_or_else(|| "system".to_owned(), |cid| cid.to_string());
        info!(
            target: "audit",
            actor = actor.as_str(),
            action = event.action.as_str(),
            resource_type = event.resource_type.as_str(),
            resource_id = event.resource_id.as_str(),
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );

        Ok(())
    }
}
