use glam::{Vec2, Vec3};
use strata_core::Material;

use crate::error::MeshError;

/// One contiguous run of indices drawn with a single material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSection {
    pub material: Material,
    /// Contiguous section id in first-seen order, starting at 0.
    pub section_id: u32,
    pub first_index: u32,
    pub index_count: u32,
}

/// Renderable mesh buffers for one chunk.
///
/// Six parallel vertex streams plus a flat triangle list. Indices are grouped
/// by material so `sections` describes contiguous index ranges; the host may
/// draw per section or in one call.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub tangents: Vec<Vec3>,
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u32>,
    pub sections: Vec<MaterialSection>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, vertices: usize, indices: usize) {
        self.positions.reserve(vertices);
        self.normals.reserve(vertices);
        self.uvs.reserve(vertices);
        self.tangents.reserve(vertices);
        self.colors.reserve(vertices);
        self.indices.reserve(indices);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.tangents.clear();
        self.colors.clear();
        self.indices.clear();
        self.sections.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Section id for a material, if any triangle uses it.
    pub fn section_for(&self, material: Material) -> Option<&MaterialSection> {
        self.sections.iter().find(|s| s.material == material)
    }

    /// Axis-aligned bounding box over all vertex positions. Zero box when
    /// the mesh is empty.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut iter = self.positions.iter();
        let Some(first) = iter.next() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        let mut min = *first;
        let mut max = *first;
        for p in iter {
            min = min.min(*p);
            max = max.max(*p);
        }
        (min, max)
    }

    /// Structural validation run before a mesh leaves the converter:
    /// index bounds, stream lengths, coordinate range, nonzero normals.
    /// `coordinate_limit` is `2 * max_chunk_extent * voxel_size`.
    pub fn validate(&self, coordinate_limit: f32) -> Result<(), MeshError> {
        let vertex_count = self.vertex_count();
        for stream in [
            ("normals", self.normals.len()),
            ("uvs", self.uvs.len()),
            ("tangents", self.tangents.len()),
            ("colors", self.colors.len()),
        ] {
            if stream.1 != vertex_count {
                return Err(MeshError::StreamLengthMismatch {
                    stream: stream.0,
                    actual: stream.1,
                    expected: vertex_count,
                });
            }
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }

        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }

        for (i, p) in self.positions.iter().enumerate() {
            for value in [p.x, p.y, p.z] {
                if !value.is_finite() || value.abs() > coordinate_limit {
                    return Err(MeshError::VertexOutOfBounds {
                        index: i,
                        value,
                        limit: coordinate_limit,
                    });
                }
            }
        }

        for (i, n) in self.normals.iter().enumerate() {
            if *n == Vec3::ZERO {
                return Err(MeshError::ZeroNormal(i));
            }
        }

        Ok(())
    }
}
