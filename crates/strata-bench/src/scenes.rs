//! Benchmark scenes: representative voxel volumes with known meshing
//! characteristics, built deterministically so runs are comparable.

use glam::IVec3;
use strata_core::{ChunkData, ChunkSize, Material};

/// How a scene's volume is filled.
#[derive(Debug, Clone, Copy)]
pub enum SceneKind {
    /// Bottom half stone, then dirt: large flat areas merge heavily.
    LayeredSlab,
    /// 8-voxel terraces, heights stepping across the chunk.
    Terraced,
    /// Independent per-voxel material draw at the given solid density.
    Random { density: f32 },
    /// Every voxel solid: the degenerate best case (6 quads).
    Solid,
    /// Sine-based rolling terrain with a stone/dirt/grass profile.
    Hills,
}

/// Configuration for a single benchmark scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    pub name: &'static str,
    pub edge: i32,
    pub kind: SceneKind,
    pub seed: u64,
}

/// The standard scene suite, covering merge-friendly, merge-hostile, and
/// typical-terrain volumes at the desktop chunk size.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "solid",
            edge: 32,
            kind: SceneKind::Solid,
            seed: 0,
        },
        SceneConfig {
            name: "layered-slab",
            edge: 32,
            kind: SceneKind::LayeredSlab,
            seed: 0,
        },
        SceneConfig {
            name: "terraced",
            edge: 32,
            kind: SceneKind::Terraced,
            seed: 0,
        },
        SceneConfig {
            name: "hills",
            edge: 32,
            kind: SceneKind::Hills,
            seed: 0,
        },
        SceneConfig {
            name: "random-30",
            edge: 32,
            kind: SceneKind::Random { density: 0.3 },
            seed: 42,
        },
        SceneConfig {
            name: "random-60",
            edge: 32,
            kind: SceneKind::Random { density: 0.6 },
            seed: 42,
        },
    ]
}

/// Materialize a scene's voxel volume.
pub fn build_chunk(config: &SceneConfig) -> ChunkData {
    let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(config.edge));
    let edge = config.edge;

    match config.kind {
        SceneKind::Solid => {
            chunk.fill_with(|_, _, _| Material::Stone);
        }
        SceneKind::LayeredSlab => {
            let half = edge / 2;
            chunk.fill_with(|_, _, z| {
                if z < half / 2 {
                    Material::Stone
                } else if z < half {
                    Material::Dirt
                } else {
                    Material::Air
                }
            });
        }
        SceneKind::Terraced => {
            let step = (edge / 4).max(1);
            chunk.fill_with(|x, y, z| {
                let height = edge / 4 + x / step + y / step;
                if z < height {
                    Material::Stone
                } else {
                    Material::Air
                }
            });
        }
        SceneKind::Hills => {
            chunk.fill_with(|x, y, z| {
                let height = (edge as f32 * 0.4
                    + (x as f32 * 0.35).sin() * 4.0
                    + (y as f32 * 0.27).cos() * 4.0) as i32;
                if z >= height {
                    Material::Air
                } else if z < height - 4 {
                    Material::Stone
                } else if z < height - 1 {
                    Material::Dirt
                } else {
                    Material::Grass
                }
            });
        }
        SceneKind::Random { density } => {
            let mut rng = Lcg::new(config.seed);
            chunk.fill_with(|_, _, _| {
                if rng.next_f32() < density {
                    // Materials 1..=5 like the interactive palette.
                    Material::from_id(1 + (rng.next_u32() % 5) as u8)
                } else {
                    Material::Air
                }
            });
        }
    }
    chunk
}

/// Small deterministic generator for scene fills; benchmark inputs must not
/// vary between runs.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1),
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1 << 24) as f32
    }
}
