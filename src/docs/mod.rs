//! Self-documenting endpoints: descriptors, the registration table and the renderer.

pub mod descriptor;
pub mod registry;
pub mod render;
pub mod status;

pub use descriptor::{Documented, ResourceDoc, ResourceDocBuilder, DEFAULT_CONTENT_TYPE};
pub use registry::{DocEntry, DocTable};
pub use render::{render, render_all, RenderContext};
