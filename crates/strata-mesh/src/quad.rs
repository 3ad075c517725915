use glam::IVec3;
use strata_core::Material;

use crate::face::Face;

/// A rectangular surface patch of one material facing one direction.
///
/// `base` is the minimum voxel covered by the quad; `size_uv` is its extent
/// in voxels along the face's u and v axes. The basic mesher emits unit
/// quads (`size_uv == (1, 1)`); the greedy mesher emits maximal rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyQuad {
    pub base: IVec3,
    pub size_uv: (u32, u32),
    pub face: Face,
    pub material: Material,
}

impl GreedyQuad {
    pub fn unit(base: IVec3, face: Face, material: Material) -> Self {
        Self {
            base,
            size_uv: (1, 1),
            face,
            material,
        }
    }

    /// Number of unit voxel faces this quad covers.
    #[inline]
    pub fn area(&self) -> u32 {
        self.size_uv.0 * self.size_uv.1
    }

    /// Enumerate the unit voxel faces covered by this quad, as positions in
    /// the chunk grid. Used by equivalence tests to compare meshers.
    pub fn covered_cells(&self) -> Vec<IVec3> {
        let (pa, ua, va) = self.face.axes();
        let slice = self.base[pa];
        let u0 = self.base[ua];
        let v0 = self.base[va];
        let mut cells = Vec::with_capacity(self.area() as usize);
        for dv in 0..self.size_uv.1 as i32 {
            for du in 0..self.size_uv.0 as i32 {
                cells.push(self.face.voxel_pos(slice, u0 + du, v0 + dv));
            }
        }
        cells
    }
}
