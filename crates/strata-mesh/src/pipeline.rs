//! Per-chunk mesh pipeline: LOD selection of mesher, conversion, stats.

use std::time::Instant;

use strata_core::voxel::MATERIAL_COUNT;
use strata_core::{ChunkData, ChunkLod, ChunkSize, Material, MeshStats};

use crate::basic::{emit_visible_faces, visible_face_count};
use crate::convert::convert_quads;
use crate::error::MeshError;
use crate::greedy::generate_greedy_quads;
use crate::mesh_data::MeshData;

/// Mesh one chunk at the requested LOD.
///
/// - `Lod0`: greedy meshing at full resolution.
/// - `Lod1` / `Lod2`: basic meshing over a volume down-sampled 2x / 4x, with
///   the voxel edge scaled up to match, so the chunk keeps its world extent.
/// - `Lod3` / `Unloaded`: an empty mesh (billboards and unloading are host
///   concerns).
pub fn mesh_chunk(
    chunk: &ChunkData,
    lod: ChunkLod,
    voxel_size: f32,
) -> Result<(MeshData, MeshStats), MeshError> {
    mesh_chunk_with_options(chunk, lod, voxel_size, true)
}

/// `mesh_chunk` with the greedy pass optional: when `use_greedy` is false,
/// LOD0 falls back to the basic mesher at full resolution.
pub fn mesh_chunk_with_options(
    chunk: &ChunkData,
    lod: ChunkLod,
    voxel_size: f32,
    use_greedy: bool,
) -> Result<(MeshData, MeshStats), MeshError> {
    let start = Instant::now();

    let (mesh, mut stats) = match lod {
        ChunkLod::Lod0 if use_greedy => mesh_greedy(chunk, voxel_size)?,
        ChunkLod::Lod0 => mesh_basic(chunk, voxel_size, chunk.size().max_extent())?,
        ChunkLod::Lod1 | ChunkLod::Lod2 => {
            let factor = lod.scale_factor();
            let coarse = downsample(chunk, factor);
            mesh_basic(&coarse, voxel_size * factor as f32, chunk.size().max_extent())?
        }
        ChunkLod::Lod3 | ChunkLod::Unloaded => (MeshData::new(), MeshStats::default()),
    };

    stats.generation_time_ms = start.elapsed().as_secs_f32() * 1000.0;
    Ok((mesh, stats))
}

fn mesh_greedy(chunk: &ChunkData, voxel_size: f32) -> Result<(MeshData, MeshStats), MeshError> {
    let greedy_start = Instant::now();
    let quads = generate_greedy_quads(chunk);
    let greedy_time_ms = greedy_start.elapsed().as_secs_f32() * 1000.0;

    let (mesh, convert_stats) = convert_quads(&quads, voxel_size, chunk.size().max_extent())?;

    let visible = visible_face_count(chunk);
    let reduction_percent = if visible == 0 {
        0.0
    } else {
        (1.0 - quads.len() as f32 / visible as f32) * 100.0
    };

    let stats = MeshStats {
        generation_time_ms: 0.0,
        greedy_time_ms,
        vertex_count: mesh.vertex_count() as u32,
        triangle_count: mesh.triangle_count() as u32,
        quad_count: quads.len() as u32,
        weld_efficiency: convert_stats.weld_efficiency,
        reduction_percent,
    };
    Ok((mesh, stats))
}

fn mesh_basic(
    chunk: &ChunkData,
    voxel_size: f32,
    max_extent: i32,
) -> Result<(MeshData, MeshStats), MeshError> {
    let quads = emit_visible_faces(chunk);
    let (mesh, convert_stats) = convert_quads(&quads, voxel_size, max_extent)?;

    let stats = MeshStats {
        generation_time_ms: 0.0,
        greedy_time_ms: 0.0,
        vertex_count: mesh.vertex_count() as u32,
        triangle_count: mesh.triangle_count() as u32,
        quad_count: quads.len() as u32,
        weld_efficiency: convert_stats.weld_efficiency,
        reduction_percent: 0.0,
    };
    Ok((mesh, stats))
}

/// Shrink a volume by an integer factor. A coarse cell takes the most common
/// solid material among the source voxels it covers (ties break toward the
/// lower material id), or air when none are solid.
pub fn downsample(chunk: &ChunkData, factor: i32) -> ChunkData {
    debug_assert!(factor >= 1);
    let size = chunk.size();
    let coarse_size = ChunkSize::new(
        (size.x + factor - 1) / factor,
        (size.y + factor - 1) / factor,
        (size.z + factor - 1) / factor,
    );
    let mut coarse = ChunkData::new(chunk.chunk_pos(), coarse_size);

    coarse.fill_with(|cx, cy, cz| {
        let mut counts = [0u32; MATERIAL_COUNT];
        for dz in 0..factor {
            for dy in 0..factor {
                for dx in 0..factor {
                    let material = chunk.get(cx * factor + dx, cy * factor + dy, cz * factor + dz);
                    if material.is_solid() {
                        counts[material.id() as usize] += 1;
                    }
                }
            }
        }
        let mut best = Material::Air;
        let mut best_count = 0;
        for (id, &count) in counts.iter().enumerate() {
            if count > best_count {
                best_count = count;
                best = Material::from_id(id as u8);
            }
        }
        best
    });
    coarse
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn tower_chunk() -> ChunkData {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(32));
        for z in 0..10 {
            chunk.set(0, 0, z, Material::Stone);
        }
        chunk
    }

    #[test]
    fn test_lod0_uses_greedy() {
        let chunk = tower_chunk();
        let (mesh, stats) = mesh_chunk(&chunk, ChunkLod::Lod0, 25.0).expect("mesh");
        assert_eq!(stats.quad_count, 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(stats.reduction_percent > 80.0);
    }

    #[test]
    fn test_lod3_and_unloaded_are_empty() {
        let chunk = tower_chunk();
        for lod in [ChunkLod::Lod3, ChunkLod::Unloaded] {
            let (mesh, stats) = mesh_chunk(&chunk, lod, 25.0).expect("mesh");
            assert!(mesh.is_empty());
            assert_eq!(stats.triangle_count, 0);
        }
    }

    #[test]
    fn test_lod1_halves_resolution() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(16));
        chunk.fill_with(|_, _, z| if z < 8 { Material::Stone } else { Material::Air });

        let (mesh, _) = mesh_chunk(&chunk, ChunkLod::Lod1, 25.0).expect("mesh");
        // An 8^3 coarse volume half-filled, meshed at 50-unit voxels, still
        // spans the chunk's 400-unit footprint.
        let (min, max) = mesh.bounds();
        assert_eq!(min, glam::Vec3::ZERO);
        assert_eq!(max, glam::Vec3::new(400.0, 400.0, 200.0));
    }

    #[test]
    fn test_downsample_majority_material() {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(4));
        // One 2x2x2 block: 5 stone, 3 dirt -> stone wins.
        let cells = [
            (0, 0, 0, Material::Stone),
            (1, 0, 0, Material::Stone),
            (0, 1, 0, Material::Stone),
            (1, 1, 0, Material::Stone),
            (0, 0, 1, Material::Stone),
            (1, 0, 1, Material::Dirt),
            (0, 1, 1, Material::Dirt),
            (1, 1, 1, Material::Dirt),
        ];
        for (x, y, z, m) in cells {
            chunk.set(x, y, z, m);
        }
        let coarse = downsample(&chunk, 2);
        assert_eq!(coarse.size(), ChunkSize::cube(2));
        assert_eq!(coarse.get(0, 0, 0), Material::Stone);
        assert_eq!(coarse.get(1, 1, 1), Material::Air);
    }

    #[test]
    fn test_downsample_empty_region_is_air() {
        let chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(8));
        let coarse = downsample(&chunk, 2);
        assert_eq!(coarse.solid_count(), 0);
    }
}
