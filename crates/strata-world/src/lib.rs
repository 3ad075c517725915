pub mod chunk_component;
pub mod config;
pub mod error;
pub mod events;
pub mod queue;
pub mod sink;
pub mod world;
pub mod worldgen;

mod worker;

pub use chunk_component::{ChunkComponent, ChunkState};
pub use config::WorldConfig;
pub use error::WorldError;
pub use events::WorldEvent;
pub use sink::{ChunkMeshRecord, MeshSink, NullSink};
pub use world::VoxelWorld;
