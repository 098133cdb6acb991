//! Stocktake: inventory backend whose REST resources are declared once and both served
//! and documented from that declaration.

pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod resources;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod tasks;

pub use config::{load as load_config, AppConfig};
pub use docs::{render, render_all, DocTable, RenderContext, ResourceDoc};
pub use error::{AppError, ConfigError, DocError, FieldErrors, StoreError};
pub use migration::ensure_tables;
pub use response::success;
pub use routes::{app, common_routes, ApiBuilder};
pub use service::{CrudService, Schema};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
pub use tasks::BackgroundTasks;
