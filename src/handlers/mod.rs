pub mod form;
pub mod health;
pub mod notifications;
pub mod projects;
pub mod reports;
pub mod samples;
pub mod users;

use crate::{
    config::Config,
    repositories::Store,
    services::{NotificationDispatcher, NotificationService, ProjectService, SampleService},
    storage::Storage,
};
use std::sync::Arc;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub storage: Arc<dyn Storage>,
    pub notifications: NotificationService,
    pub projects: ProjectService,
    pub samples: SampleService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the services on top of a store and a file storage
    pub fn new<S>(store: Arc<S>, storage: Arc<dyn Storage>, config: Config) -> Self
    where
        S: Store + 'static,
    {
        let notifier = NotificationDispatcher::new(store.clone());
        Self {
            notifications: NotificationService::new(
                store.clone(),
                config.notifications.list_limit,
            ),
            projects: ProjectService::new(store.clone(), notifier.clone()),
            samples: SampleService::new(store.clone(), notifier),
            store,
            storage,
            config: Arc::new(config),
        }
    }
}
