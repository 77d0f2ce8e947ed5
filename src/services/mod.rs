//! Business operations on top of the repositories.

pub mod dispatcher;
pub mod final_report;
pub mod notifications;
pub mod progress;
pub mod projects;
pub mod samples;

#[cfg(test)]
mod fixtures;

pub use dispatcher::{Message, NotificationDispatcher, Recipients};
pub use notifications::NotificationService;
pub use progress::{progress_of, statistics_for};
pub use projects::ProjectService;
pub use samples::SampleService;
