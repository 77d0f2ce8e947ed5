//! PostgreSQL backend.
//!
//! Schema lives in `migrations/`. Embedded documents (final report,
//! report history, protocol file) are JSONB columns; id lists are `UUID[]`.

mod notifications;
mod projects;
mod samples;
mod users;

use super::Store;
use crate::{
    database::Database,
    error::{AppError, AppResult},
};
use async_trait::async_trait;

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Turn a unique-constraint violation into a `Conflict` with the given message
fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(message)
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
