//! Deterministic seed-driven overlays applied on top of template voxels.
//!
//! All randomness derives from a per-chunk ChaCha8 stream seeded by mixing
//! the world seed with the chunk position, so identical inputs always
//! produce byte-identical voxel arrays. Overlays run in a fixed order:
//! terrain noise, grass/flowers, trees.

use glam::{IVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::constants::VOXEL_SIZE;
use strata_core::{ChunkData, Material};
use tracing::debug;

use crate::template::{VariationParams, WorldTemplate};

/// Minimum headroom above the ground voxel required to place a tree.
const TREE_HEADROOM: i32 = 8;

/// Leaf canopy radius in voxels.
const LEAF_RADIUS: i32 = 2;

/// Mix the world seed with a chunk position into a per-chunk RNG seed.
pub fn chunk_seed(seed: u64, chunk_pos: IVec3) -> u64 {
    let mut state = seed;
    for component in [chunk_pos.x, chunk_pos.y, chunk_pos.z] {
        state ^= component as i64 as u64;
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
    }
    state
}

/// Apply the template's seed variations to a freshly loaded chunk.
pub fn apply_seed_variation(chunk: &mut ChunkData, template: &WorldTemplate, seed: u64) {
    if !template.allow_seed_variations {
        return;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(seed, chunk.chunk_pos()));
    let params = template.variation;

    apply_terrain_noise(chunk, &params, &mut rng);
    apply_grass_variation(chunk, &params, &mut rng);
    apply_tree_variation(chunk, template, &params, &mut rng);
}

fn apply_terrain_noise(_chunk: &mut ChunkData, params: &VariationParams, _rng: &mut ChaCha8Rng) {
    if params.terrain_noise_height <= 0.0 {
        return;
    }
    // Height variation is left unapplied: authored terrain keeps its
    // silhouette. The parameter stays in the format for future use.
    debug!("terrain noise variation not applied");
}

/// Scatter flowers (Leaves placeholders) on grass surfaces that have air
/// above them.
fn apply_grass_variation(chunk: &mut ChunkData, params: &VariationParams, rng: &mut ChaCha8Rng) {
    if params.grass_variation <= 0.0 {
        return;
    }

    let size = chunk.size();
    for y in 0..size.y {
        for x in 0..size.x {
            // Topmost grass voxel of the column.
            for z in (0..size.z).rev() {
                if chunk.get(x, y, z) != Material::Grass {
                    continue;
                }
                if z < size.z - 1 && chunk.get(x, y, z + 1).is_air() {
                    let roll: f32 = rng.gen();
                    if roll < params.flower_density {
                        chunk.set(x, y, z + 1, Material::Leaves);
                    }
                }
                break;
            }
        }
    }
}

/// Attempt a handful of tree placements, skipping positions inside any
/// landmark's protection radius.
fn apply_tree_variation(
    chunk: &mut ChunkData,
    template: &WorldTemplate,
    params: &VariationParams,
    rng: &mut ChaCha8Rng,
) {
    if params.tree_variation <= 0.0 {
        return;
    }

    let size = chunk.size();
    // Margin of 3 voxels on each side so canopies stay inside the chunk.
    if size.x - 4 <= 3 || size.y - 4 <= 3 {
        return;
    }

    let attempts = (params.tree_variation * 5.0).floor() as i32;
    let chunk_origin = chunk.chunk_pos().as_vec3() * size.x as f32 * VOXEL_SIZE;

    for _ in 0..attempts {
        let x = rng.gen_range(3..size.x - 4);
        let y = rng.gen_range(3..size.y - 4);

        let world_pos = chunk_origin + Vec3::new(x as f32, y as f32, 0.0) * VOXEL_SIZE;
        if template.is_position_protected(world_pos) {
            continue;
        }

        // Topmost grass or dirt voxel is the ground.
        let mut ground = -1;
        for z in (0..size.z).rev() {
            let material = chunk.get(x, y, z);
            if material == Material::Grass || material == Material::Dirt {
                ground = z;
                break;
            }
        }
        if ground < 0 || ground > size.z - TREE_HEADROOM {
            continue;
        }

        let trunk_height = rng.gen_range(4..=6);
        for dz in 1..=trunk_height {
            chunk.set(x, y, ground + dz, Material::Wood);
        }

        let canopy_center = ground + trunk_height;
        for dx in -LEAF_RADIUS..=LEAF_RADIUS {
            for dy in -LEAF_RADIUS..=LEAF_RADIUS {
                for dz in -LEAF_RADIUS..=LEAF_RADIUS {
                    let dist_sq = dx * dx + dy * dy + dz * dz;
                    if dist_sq > LEAF_RADIUS * LEAF_RADIUS {
                        continue;
                    }
                    let pos = IVec3::new(x + dx, y + dy, canopy_center + dz);
                    if chunk.in_bounds(pos.x, pos.y, pos.z) && chunk.get_pos(pos).is_air() {
                        chunk.set_pos(pos, Material::Leaves);
                    }
                }
            }
        }
    }
}
