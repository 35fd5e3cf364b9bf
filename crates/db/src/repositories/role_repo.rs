//! Repository for the `roles` table.

use ideaforge_core::types::DbId;
use sqlx::PgPool;

/// Read access to the seeded roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Look up a role ID by name.
    pub async fn find_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
