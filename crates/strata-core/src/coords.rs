//! World / chunk / local coordinate conversions.
//!
//! The world is right-handed with Z up. One voxel spans `voxel_size` world
//! units, one chunk spans `chunk_size * voxel_size` per axis.

use glam::{IVec3, Vec3};

use crate::chunk::ChunkSize;

/// Chunk grid coordinate containing a world position.
#[inline]
pub fn world_to_chunk(world: Vec3, chunk_size: i32, voxel_size: f32) -> IVec3 {
    let span = chunk_size as f32 * voxel_size;
    IVec3::new(
        (world.x / span).floor() as i32,
        (world.y / span).floor() as i32,
        (world.z / span).floor() as i32,
    )
}

/// Local voxel coordinate of a world position within a given chunk. The
/// result is only in-range when `chunk_pos == world_to_chunk(world, ..)`.
#[inline]
pub fn world_to_local(world: Vec3, chunk_pos: IVec3, chunk_size: i32, voxel_size: f32) -> IVec3 {
    let origin = chunk_world_origin(chunk_pos, chunk_size, voxel_size);
    let local = world - origin;
    IVec3::new(
        (local.x / voxel_size).floor() as i32,
        (local.y / voxel_size).floor() as i32,
        (local.z / voxel_size).floor() as i32,
    )
}

/// World position of a chunk's minimum corner.
#[inline]
pub fn chunk_world_origin(chunk_pos: IVec3, chunk_size: i32, voxel_size: f32) -> Vec3 {
    chunk_pos.as_vec3() * chunk_size as f32 * voxel_size
}

/// World position of a chunk's center, used for distance-based priorities
/// and LOD selection.
#[inline]
pub fn chunk_world_center(chunk_pos: IVec3, size: ChunkSize, voxel_size: f32) -> Vec3 {
    let origin = chunk_world_origin(chunk_pos, size.x, voxel_size);
    origin + size.to_ivec3().as_vec3() * voxel_size * 0.5
}
