//! Shared application state for all routes: built once at startup and passed explicitly.

use crate::config::AppConfig;
use crate::store::Store;
use crate::tasks::BackgroundTasks;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tasks: BackgroundTasks,
}

impl AppState {
    /// Must be called inside a tokio runtime (starts the background workers).
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let tasks = BackgroundTasks::spawn(config.background_workers);
        AppState {
            config: Arc::new(config),
            store,
            tasks,
        }
    }
}
