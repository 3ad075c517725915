use glam::{IVec3, Vec3};
use strata_mesh::MeshData;

/// Completed mesh buffers handed to the host renderer.
///
/// Positions are chunk-local world units; `bounds` is the same box shifted
/// to absolute world space. The host uploads the buffers and owns any GPU
/// handles; the core never sees them again.
#[derive(Debug, Clone)]
pub struct ChunkMeshRecord {
    /// Stable for the chunk's lifetime in the active map.
    pub chunk_id: u32,
    pub chunk_pos: IVec3,
    pub mesh: MeshData,
    pub bounds: (Vec3, Vec3),
}

/// Host-renderer seam. Called on the main sequence only.
pub trait MeshSink {
    fn apply_chunk_mesh(&mut self, record: ChunkMeshRecord);

    /// A chunk left the active map or had its mesh cleared.
    fn clear_chunk_mesh(&mut self, chunk_id: u32);
}

/// Sink that drops everything; useful headless and in tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl MeshSink for NullSink {
    fn apply_chunk_mesh(&mut self, _record: ChunkMeshRecord) {}
    fn clear_chunk_mesh(&mut self, _chunk_id: u32) {}
}
