pub mod api;
pub mod common;

pub use api::{app, ApiBuilder};
pub use common::common_routes;
