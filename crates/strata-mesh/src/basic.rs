//! Reference mesher: one quad per visible voxel face, no coalescing.
//!
//! This is the oracle the greedy mesher is tested against, and the fallback
//! used when greedy meshing is disabled or a coarse LOD is requested.

use glam::IVec3;
use strata_core::ChunkData;

use crate::face::{Face, ALL_FACES};
use crate::quad::GreedyQuad;

/// A face is visible when its neighbour is air, or transparent with a
/// different material (water seen through ice, etc.). Neighbours outside the
/// chunk read as air, so boundary faces are always emitted.
#[inline]
pub fn is_face_visible(chunk: &ChunkData, pos: IVec3, face: Face) -> bool {
    let current = chunk.get_pos(pos);
    if current.is_air() {
        return false;
    }
    let neighbour = chunk.get_pos(pos + face.offset());
    neighbour.is_air() || (neighbour.is_transparent() && current != neighbour)
}

/// Emit one unit quad per visible face, scanning the volume in storage order.
pub fn emit_visible_faces(chunk: &ChunkData) -> Vec<GreedyQuad> {
    let size = chunk.size();
    let mut quads = Vec::new();

    for z in 0..size.z {
        for y in 0..size.y {
            for x in 0..size.x {
                let pos = IVec3::new(x, y, z);
                let material = chunk.get_pos(pos);
                if material.is_air() {
                    continue;
                }
                for face in ALL_FACES {
                    if is_face_visible(chunk, pos, face) {
                        quads.push(GreedyQuad::unit(pos, face, material));
                    }
                }
            }
        }
    }

    quads
}

/// Count visible faces without allocating; used for reduction statistics.
pub fn visible_face_count(chunk: &ChunkData) -> usize {
    let size = chunk.size();
    let mut count = 0;
    for z in 0..size.z {
        for y in 0..size.y {
            for x in 0..size.x {
                let pos = IVec3::new(x, y, z);
                if chunk.get_pos(pos).is_air() {
                    continue;
                }
                for face in ALL_FACES {
                    if is_face_visible(chunk, pos, face) {
                        count += 1;
                    }
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{ChunkSize, Material};

    #[test]
    fn test_single_voxel_emits_six_faces() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(8));
        chunk.set(3, 3, 3, Material::Stone);
        let quads = emit_visible_faces(&chunk);
        assert_eq!(quads.len(), 6);
        for quad in &quads {
            assert_eq!(quad.size_uv, (1, 1));
            assert_eq!(quad.material, Material::Stone);
        }
    }

    #[test]
    fn test_buried_voxel_emits_nothing() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(8));
        for z in 2..5 {
            for y in 2..5 {
                for x in 2..5 {
                    chunk.set(x, y, z, Material::Stone);
                }
            }
        }
        let center_faces: Vec<_> = emit_visible_faces(&chunk)
            .into_iter()
            .filter(|q| q.base == IVec3::splat(3))
            .collect();
        assert!(center_faces.is_empty());
    }

    #[test]
    fn test_solid_chunk_face_count() {
        // A fully solid chunk exposes exactly the six outer shells:
        // 2 * (X*Y + X*Z + Y*Z) unit quads.
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::new(4, 6, 8));
        chunk.fill_with(|_, _, _| Material::Stone);
        let quads = emit_visible_faces(&chunk);
        assert_eq!(quads.len(), 2 * (4 * 6 + 4 * 8 + 6 * 8));
    }

    #[test]
    fn test_transparent_neighbour_with_different_material_is_visible() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(4));
        chunk.set(1, 1, 1, Material::Stone);
        chunk.set(2, 1, 1, Material::Water);
        let quads = emit_visible_faces(&chunk);
        // Stone's +X face shows through the water.
        assert!(quads
            .iter()
            .any(|q| q.base == IVec3::new(1, 1, 1) && q.face == Face::Right));
        // Water against water would not be visible, but water against air is.
        assert!(quads
            .iter()
            .any(|q| q.base == IVec3::new(2, 1, 1) && q.face == Face::Right));
    }

    #[test]
    fn test_same_transparent_material_culls_shared_face() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(4));
        chunk.set(1, 1, 1, Material::Water);
        chunk.set(2, 1, 1, Material::Water);
        let quads = emit_visible_faces(&chunk);
        assert!(!quads
            .iter()
            .any(|q| q.base == IVec3::new(1, 1, 1) && q.face == Face::Right));
        assert!(!quads
            .iter()
            .any(|q| q.base == IVec3::new(2, 1, 1) && q.face == Face::Left));
    }

    #[test]
    fn test_visible_face_count_matches_emission() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(6));
        chunk.set(0, 0, 0, Material::Grass);
        chunk.set(5, 5, 5, Material::Stone);
        chunk.set(2, 3, 4, Material::Dirt);
        assert_eq!(visible_face_count(&chunk), emit_visible_faces(&chunk).len());
    }
}
