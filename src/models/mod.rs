pub mod notification;
pub mod project;
pub mod sample;
pub mod statistics;
pub mod user;

pub use notification::*;
pub use project::*;
pub use sample::*;
pub use statistics::*;
pub use user::*;

/// Common trait for persisted entities
pub trait Entity {
    type Id;
    fn id(&self) -> Self::Id;
}

/// Treat absent and blank strings alike when validating request bodies
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
