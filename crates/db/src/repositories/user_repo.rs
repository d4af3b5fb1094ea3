//! Repository for `users`, `roles` and `user_roles`.

use quill_core::roles::Role;
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

/// Provides user lookups and role assignment.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user. A duplicate email violates `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Role names held by a user, alphabetical.
    pub async fn roles_for(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 \
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Grant a role. Idempotent.
    pub async fn assign_role(pool: &PgPool, user_id: DbId, role: Role) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) \
             SELECT $1, id FROM roles WHERE name = $2 \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Make sure every fixed role has a row.
    pub async fn ensure_roles(pool: &PgPool) -> Result<(), sqlx::Error> {
        let names: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        sqlx::query(
            "INSERT INTO roles (name) SELECT unnest($1::TEXT[]) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(&names)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove every role row (and, by cascade, every grant).
    ///
    /// [`UserRepo::ensure_roles`] restores the fixed set.
    pub async fn delete_all_roles(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Remove every user. Used by the development seeder.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
