use thiserror::Error;

/// Mesh validation failures. A failed validation discards the mesh; the
/// owning chunk falls back to its previous state and may retry later.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("vertex stream length mismatch: {stream} has {actual}, expected {expected}")]
    StreamLengthMismatch {
        stream: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("vertex {index} coordinate {value} outside [-{limit}, +{limit}]")]
    VertexOutOfBounds { index: usize, value: f32, limit: f32 },

    #[error("vertex {0} has a zero normal")]
    ZeroNormal(usize),
}
