pub mod compress;
pub mod error;
pub mod format;
pub mod loader;
pub mod template;
pub mod variation;

pub use error::TemplateError;
pub use loader::{load_chunk, materialize};
pub use template::{Landmark, TemplateChunk, VariationParams, WorldTemplate};
