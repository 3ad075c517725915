use glam::IVec3;
use thiserror::Error;

/// Errors surfaced by chunk and world operations.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A mesh generation was requested while one is already running for the
    /// same chunk. No state changes; the caller may retry after completion.
    #[error("chunk is already meshing")]
    Busy,

    /// Batched voxel input with mismatched array lengths.
    #[error("invalid input: {positions} positions vs {materials} materials")]
    InvalidInput { positions: usize, materials: usize },

    /// The free pool is empty and the live-chunk cap has been reached.
    #[error("chunk pool exhausted")]
    PoolExhausted,

    /// Flat-world mode rejects chunks outside the z = 0 layer.
    #[error("flat world mode rejects chunk at {chunk_pos}")]
    FlatWorldRejected { chunk_pos: IVec3 },
}
