//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_membership_repository;
mod postgres_audit_repository;
mod postgres_membership_repository;
mod tracing_audit_repository;

pub use in_memory_membership_repository::InMemoryMembershipRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_membership_repository::PostgresMembershipRepository;
pub use tracing_audit_repository::TracingAuditRepository;
