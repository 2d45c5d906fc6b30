use async_trait::async_trait;
use sqlx::PgPool;

use artcc_application::{AuditEvent, AuditRepository};
use artcc_core::{AppError, AppResult};

/// PostgreSQL-backed append-only audit repository.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log_entries (
                actor_cid,
                action,
                resource_type,
                resource_id,
                detail
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.actor.map(|cid| i64::from(cid.value())))
        .bind(event.action.as_str())
        .bind(event.resource_type)
        .bind(event.resource_id)
        .bind(event.detail)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit event: {error}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use artcc_application::{AuditEvent, AuditRepository};
    use artcc_domain::{AuditAction, Cid};
    use sqlx::PgPool;
    use sqlx::migrate::Migrator;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    use super::PostgresAuditRepository;

    static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

    async fn test_pool() -> Option<PgPool> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for postgres audit tests: {error}");
        }

        Some(pool)
    }

    #[tokio::test]
    async fn seeded_events_are_stored_without_actor() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repository = PostgresAuditRepository::new(pool.clone());
        let resource_id = Uuid::new_v4().to_string();

        for actor in [None, Cid::new(1_293_257).ok()] {
            let appended = repository
                .append_event(AuditEvent {
                    actor,
                    action: AuditAction::RoleAssigned,
                    resource_type: "role_assignment".to_owned(),
                    resource_id: resource_id.clone(),
                    detail: None,
                })
                .await;
            assert!(appended.is_ok());
        }

        let actors = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT actor_cid
            FROM audit_log_entries
            WHERE resource_id = $1
            ORDER BY actor_cid NULLS FIRST
            "#,
        )
        .bind(resource_id)
        .fetch_all(&pool)
        .await;
        assert!(actors.is_ok_and(|actors| actors == vec![None, Some(1_293_257)]));
    }
}
