//! Greedy mesher: coalesces coplanar, same-material, visible voxel faces
//! into maximal rectangles.
//!
//! For each face direction the volume is cut into slices perpendicular to
//! the face's primary axis. A 2D visibility mask is built per slice, then
//! scanned in row-major (u, v) order; each unclaimed visible cell seeds a
//! rectangle that grows along +u first, then +v. The fixed growth order and
//! scan order make the output deterministic for a given volume.

use strata_core::{ChunkData, Material};

use crate::basic::is_face_visible;
use crate::face::{Face, ALL_FACES};
use crate::quad::GreedyQuad;

#[derive(Debug, Clone, Copy, Default)]
struct MaskCell {
    material: Material,
    visible: bool,
}

/// Reusable slice mask, sized for the largest slice of the chunk. Reusing
/// the buffer across all 6 directions avoids per-slice allocations.
struct SliceMask {
    cells: Vec<MaskCell>,
    u_dim: i32,
    v_dim: i32,
}

impl SliceMask {
    fn new(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            u_dim: 0,
            v_dim: 0,
        }
    }

    #[inline]
    fn index(&self, u: i32, v: i32) -> usize {
        (u + v * self.u_dim) as usize
    }

    #[inline]
    fn at(&self, u: i32, v: i32) -> MaskCell {
        self.cells[self.index(u, v)]
    }

    fn fill(&mut self, chunk: &ChunkData, face: Face, slice: i32) {
        let (_, u_axis, v_axis) = face.axes();
        let size = chunk.size();
        self.u_dim = size.axis(u_axis);
        self.v_dim = size.axis(v_axis);
        self.cells.clear();
        self.cells
            .resize((self.u_dim * self.v_dim) as usize, MaskCell::default());

        for v in 0..self.v_dim {
            for u in 0..self.u_dim {
                let pos = face.voxel_pos(slice, u, v);
                let material = chunk.get_pos(pos);
                if material.is_air() {
                    continue;
                }
                let idx = self.index(u, v);
                self.cells[idx] = MaskCell {
                    material,
                    visible: is_face_visible(chunk, pos, face),
                };
            }
        }
    }

    /// Grow a rectangle from `(u0, v0)`: extend along +u to its maximum,
    /// then extend whole rows along +v. Returns (width, height) in cells.
    fn extend(&self, u0: i32, v0: i32, material: Material) -> (i32, i32) {
        let mut width = 1;
        while u0 + width < self.u_dim {
            let cell = self.at(u0 + width, v0);
            if !cell.visible || cell.material != material {
                break;
            }
            width += 1;
        }

        let mut height = 1;
        'rows: while v0 + height < self.v_dim {
            for u in u0..u0 + width {
                let cell = self.at(u, v0 + height);
                if !cell.visible || cell.material != material {
                    break 'rows;
                }
            }
            height += 1;
        }

        (width, height)
    }

    fn claim(&mut self, u0: i32, v0: i32, width: i32, height: i32) {
        for v in v0..v0 + height {
            for u in u0..u0 + width {
                let idx = self.index(u, v);
                self.cells[idx].visible = false;
            }
        }
    }
}

/// Produce maximal-rectangle quads for every visible face of the chunk.
pub fn generate_greedy_quads(chunk: &ChunkData) -> Vec<GreedyQuad> {
    let size = chunk.size();
    let max_slice = (size.x * size.y).max(size.x * size.z).max(size.y * size.z);
    let mut mask = SliceMask::new(max_slice as usize);
    let mut quads = Vec::new();

    for face in ALL_FACES {
        let (primary, _, _) = face.axes();
        for slice in 0..size.axis(primary) {
            mask.fill(chunk, face, slice);
            extract_quads(&mut mask, face, slice, &mut quads);
        }
    }

    quads
}

fn extract_quads(mask: &mut SliceMask, face: Face, slice: i32, out: &mut Vec<GreedyQuad>) {
    for v in 0..mask.v_dim {
        for u in 0..mask.u_dim {
            let cell = mask.at(u, v);
            if !cell.visible {
                continue;
            }

            let (width, height) = mask.extend(u, v, cell.material);
            out.push(GreedyQuad {
                base: face.voxel_pos(slice, u, v),
                size_uv: (width as u32, height as u32),
                face,
                material: cell.material,
            });
            mask.claim(u, v, width, height);
        }
    }
}
