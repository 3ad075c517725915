pub mod basic;
pub mod convert;
pub mod error;
pub mod face;
pub mod greedy;
pub mod mesh_data;
pub mod pipeline;
pub mod quad;

pub use error::MeshError;
pub use face::Face;
pub use mesh_data::{MaterialSection, MeshData};
pub use pipeline::{mesh_chunk, mesh_chunk_with_options};
pub use quad::GreedyQuad;
