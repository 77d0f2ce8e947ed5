use super::{Entity, is_blank};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Researcher,
    Technician,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Researcher => "researcher",
            UserRole::Technician => "technician",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    /// Projects created by this user
    pub projects: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl User {
    pub fn new(name: String, email: String, role: UserRole, is_verified: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            role,
            is_verified,
            projects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Create user request (account record only, credentials live elsewhere)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
}

impl CreateUserRequest {
    pub fn into_user(self) -> AppResult<User> {
        if is_blank(&self.name) || is_blank(&self.email) {
            return Err(AppError::validation("Name and email are required"));
        }
        let email = self.email.unwrap_or_default().trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email address"));
        }
        Ok(User::new(
            self.name.unwrap_or_default().trim().to_string(),
            email,
            self.role,
            self.is_verified,
        ))
    }
}

/// Public projection of a user embedded in other payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
