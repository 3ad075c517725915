pub mod chunk;
pub mod constants;
pub mod coords;
pub mod lod;
pub mod monitor;
pub mod stats;
pub mod voxel;

pub use chunk::{ChunkData, ChunkSize};
pub use lod::ChunkLod;
pub use monitor::PerformanceMonitor;
pub use stats::{MeshStats, WorldStats};
pub use voxel::Material;
