use super::{PgStore, conflict_on_unique};
use crate::{error::AppResult, models::User, repositories::UserRepository};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: User) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, role, is_verified, projects, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, role, is_verified, projects, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.is_verified)
        .bind(&user.projects)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "User already exists"))?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, is_verified, projects, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, is_verified, projects, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn update_user(&self, user: &User) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                role = $4,
                is_verified = $5,
                projects = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, role, is_verified, projects, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.is_verified)
        .bind(&user.projects)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }
}
