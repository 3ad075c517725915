use glam::IVec3;

use crate::constants::{CHUNK_SIZE_DESKTOP, CHUNK_SIZE_MOBILE};
use crate::voxel::Material;

/// Chunk dimensions in voxels. Immutable once a chunk is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::cube(CHUNK_SIZE_DESKTOP)
    }
}

impl ChunkSize {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert!(x > 0 && y > 0 && z > 0);
        Self { x, y, z }
    }

    pub fn cube(edge: i32) -> Self {
        Self::new(edge, edge, edge)
    }

    pub fn mobile() -> Self {
        Self::cube(CHUNK_SIZE_MOBILE)
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        (self.x * self.y * self.z) as usize
    }

    #[inline]
    pub fn to_ivec3(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Largest dimension, used by mesh validation to bound vertex coordinates.
    #[inline]
    pub fn max_extent(&self) -> i32 {
        self.x.max(self.y).max(self.z)
    }

    /// Dimension along a numeric axis (0 = X, 1 = Y, 2 = Z).
    #[inline]
    pub fn axis(&self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

/// Dense row-major voxel volume for one chunk.
///
/// Index layout is `x + y * X + z * X * Y` (x fastest). Reads outside the
/// extents return `Air` rather than panicking; writes outside are no-ops.
/// The dirty flag flips only when a write actually changes a voxel.
#[derive(Debug, Clone)]
pub struct ChunkData {
    chunk_pos: IVec3,
    size: ChunkSize,
    voxels: Vec<Material>,
    dirty: bool,
}

impl ChunkData {
    pub fn new(chunk_pos: IVec3, size: ChunkSize) -> Self {
        Self {
            chunk_pos,
            size,
            voxels: vec![Material::Air; size.voxel_count()],
            dirty: true,
        }
    }

    /// Re-point an existing allocation at a new grid position, clearing all
    /// voxels. Reuses the buffer when the size is unchanged (pool recycling).
    pub fn reset(&mut self, chunk_pos: IVec3, size: ChunkSize) {
        self.chunk_pos = chunk_pos;
        if self.size == size {
            self.voxels.fill(Material::Air);
        } else {
            self.size = size;
            self.voxels.clear();
            self.voxels.resize(size.voxel_count(), Material::Air);
        }
        self.dirty = true;
    }

    #[inline]
    pub fn chunk_pos(&self) -> IVec3 {
        self.chunk_pos
    }

    #[inline]
    pub fn size(&self) -> ChunkSize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.size.x && y >= 0 && y < self.size.y && z >= 0 && z < self.size.z
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (x + y * self.size.x + z * self.size.x * self.size.y) as usize
    }

    /// Voxel at a local position. Out-of-range positions read as `Air`, which
    /// makes chunk-boundary faces visible without any neighbour plumbing.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Material {
        if !self.in_bounds(x, y, z) {
            return Material::Air;
        }
        self.voxels[self.index(x, y, z)]
    }

    #[inline]
    pub fn get_pos(&self, pos: IVec3) -> Material {
        self.get(pos.x, pos.y, pos.z)
    }

    /// Write a voxel. In-range only; flips the dirty flag only on change.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, material: Material) {
        if !self.in_bounds(x, y, z) {
            return;
        }
        let idx = self.index(x, y, z);
        if self.voxels[idx] != material {
            self.voxels[idx] = material;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn set_pos(&mut self, pos: IVec3, material: Material) {
        self.set(pos.x, pos.y, pos.z, material);
    }

    /// Reset every voxel to `Air`.
    pub fn clear(&mut self) {
        self.voxels.fill(Material::Air);
        self.dirty = true;
    }

    /// Bulk fill via callback, row-major (x fastest). One dirty flip at the
    /// end regardless of how many voxels changed.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, i32, i32) -> Material,
    {
        let mut idx = 0;
        for z in 0..self.size.z {
            for y in 0..self.size.y {
                for x in 0..self.size.x {
                    self.voxels[idx] = f(x, y, z);
                    idx += 1;
                }
            }
        }
        self.dirty = true;
    }

    #[inline]
    pub fn voxels(&self) -> &[Material] {
        &self.voxels
    }

    /// Pack the volume into raw material ids, in storage order.
    pub fn to_ids(&self) -> Vec<u8> {
        self.voxels.iter().map(|v| v.id()).collect()
    }

    /// Fill from packed material ids in storage order. Returns false (and
    /// leaves the volume untouched) when the byte count does not match.
    pub fn fill_from_ids(&mut self, ids: &[u8]) -> bool {
        if ids.len() != self.voxels.len() {
            return false;
        }
        for (voxel, &id) in self.voxels.iter_mut().zip(ids) {
            *voxel = Material::from_id(id);
        }
        self.dirty = true;
        true
    }

    /// Count of non-air voxels (used by tests and stats, not hot paths).
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
