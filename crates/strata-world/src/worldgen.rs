//! Procedural fallback terrain: rolling hills from seeded 2D value noise.
//!
//! Used for chunks with no template entry. Column profile (world Z):
//! stone up to `h - 4`, dirt through `h - 1`, grass capping at `h - 1`,
//! with `h` sampled per column and clamped to [5, 15].

use strata_core::{ChunkData, Material};

const NOISE_SCALE: f64 = 0.03;
const BASE_HEIGHT: f64 = 10.0;
const HEIGHT_SCALE: f64 = 10.0;
const MIN_HEIGHT: i32 = 5;
const MAX_HEIGHT: i32 = 15;

/// Deterministic heightmap generator. The permutation table is shuffled
/// once from the seed; all sampling is pure.
pub struct TerrainGenerator {
    perm: [u8; 512],
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            perm: build_permutation(seed),
        }
    }

    /// Terrain height for a world-space column, in voxels above z = 0.
    pub fn height_at(&self, wx: i32, wy: i32) -> i32 {
        let n = self.value2d(wx as f64 * NOISE_SCALE, wy as f64 * NOISE_SCALE);
        let h = (BASE_HEIGHT + n * HEIGHT_SCALE).floor() as i32;
        h.clamp(MIN_HEIGHT, MAX_HEIGHT)
    }

    /// Fill a chunk with the rolling-hills profile. Columns entirely above
    /// the terrain (or chunks below world z = 0) come out as air.
    pub fn fill_chunk(&self, chunk: &mut ChunkData) {
        let size = chunk.size();
        let chunk_pos = chunk.chunk_pos();
        let base_x = chunk_pos.x * size.x;
        let base_y = chunk_pos.y * size.y;
        let base_z = chunk_pos.z * size.z;

        chunk.fill_with(|x, y, z| {
            let height = self.height_at(base_x + x, base_y + y);
            let wz = base_z + z;
            if wz < 0 || wz >= height {
                Material::Air
            } else if wz < height - 4 {
                Material::Stone
            } else if wz < height - 1 {
                Material::Dirt
            } else {
                Material::Grass
            }
        });
    }

    /// 2D value noise in [0, 1]: lattice hashes blended with smoothstep.
    fn value2d(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let sx = smoothstep(fx);
        let sy = smoothstep(fy);

        let v00 = self.lattice(x0 as i64, y0 as i64);
        let v10 = self.lattice(x0 as i64 + 1, y0 as i64);
        let v01 = self.lattice(x0 as i64, y0 as i64 + 1);
        let v11 = self.lattice(x0 as i64 + 1, y0 as i64 + 1);

        let top = v00 + (v10 - v00) * sx;
        let bottom = v01 + (v11 - v01) * sx;
        top + (bottom - top) * sy
    }

    #[inline]
    fn lattice(&self, ix: i64, iy: i64) -> f64 {
        let xi = (ix & 255) as usize;
        let yi = (iy & 255) as usize;
        let hash = self.perm[xi + self.perm[yi] as usize];
        hash as f64 / 255.0
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn build_permutation(seed: u64) -> [u8; 512] {
    let mut p: [u8; 256] = [0; 256];
    for (i, value) in p.iter_mut().enumerate() {
        *value = i as u8;
    }

    // Fisher-Yates shuffle driven by an LCG on the seed.
    let mut rng = seed;
    for i in (1..256).rev() {
        rng = rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (rng >> 33) as usize % (i + 1);
        p.swap(i, j);
    }

    let mut perm = [0u8; 512];
    for (i, value) in perm.iter_mut().enumerate() {
        *value = p[i & 255];
    }
    perm
}
