use serde::{Deserialize, Serialize};
use strata_core::constants::{
    CHUNK_SIZE_DESKTOP, CHUNK_SIZE_MOBILE, CHUNK_UPDATE_INTERVAL, LOD_UPDATE_INTERVAL,
    MEMORY_CHECK_INTERVAL, VOXEL_SIZE,
};

/// World manager configuration. All options are set before streaming starts;
/// `flat_world_mode` and `disable_dynamic_generation` are also honoured on
/// every streaming tick if toggled at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Cube edge length of every chunk, in voxels.
    pub chunk_size: i32,
    /// Load radius around the viewer, in chunks (XY plane).
    pub view_distance_chunks: i32,
    /// Number of chunks pre-allocated into the free pool.
    pub chunk_pool_size: usize,
    /// When false, all meshing runs synchronously on the main sequence.
    pub use_multithreading: bool,
    /// Worker threads in the mesh pool.
    pub worker_threads: usize,
    /// Upper bound on in-flight mesh jobs.
    pub max_concurrent_chunk_generations: usize,
    pub mobile_memory_budget_mb: f32,
    pub pc_memory_budget_mb: f32,
    /// Selects which of the two budgets is enforced.
    pub use_mobile_budget: bool,
    /// Adopt pre-existing host chunks as authored content on startup.
    pub preserve_editor_chunks: bool,
    /// When true, the streaming loop never creates new chunks.
    pub disable_dynamic_generation: bool,
    /// When true, chunk creation is rejected for any z != 0.
    pub flat_world_mode: bool,
    /// Use greedy meshing for LOD0 (basic otherwise).
    pub use_greedy_meshing: bool,
    /// Voxel edge length in host world units.
    pub voxel_size: f32,
    /// Seed for procedural generation and template seed variation.
    pub world_seed: u64,
    pub chunk_update_interval: f32,
    pub memory_check_interval: f32,
    pub lod_update_interval: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE_DESKTOP,
            view_distance_chunks: 10,
            chunk_pool_size: 100,
            use_multithreading: true,
            worker_threads: 4,
            max_concurrent_chunk_generations: 4,
            mobile_memory_budget_mb: 400.0,
            pc_memory_budget_mb: 800.0,
            use_mobile_budget: false,
            preserve_editor_chunks: true,
            disable_dynamic_generation: false,
            flat_world_mode: false,
            use_greedy_meshing: true,
            voxel_size: VOXEL_SIZE,
            world_seed: 12345,
            chunk_update_interval: CHUNK_UPDATE_INTERVAL,
            memory_check_interval: MEMORY_CHECK_INTERVAL,
            lod_update_interval: LOD_UPDATE_INTERVAL,
        }
    }
}

impl WorldConfig {
    /// Mobile preset: smaller chunks, shorter view distance, tighter budget.
    pub fn mobile() -> Self {
        Self {
            chunk_size: CHUNK_SIZE_MOBILE,
            view_distance_chunks: 6,
            use_mobile_budget: true,
            ..Self::default()
        }
    }

    /// The byte cap currently enforced, in MiB.
    pub fn memory_budget_mb(&self) -> f32 {
        if self.use_mobile_budget {
            self.mobile_memory_budget_mb
        } else {
            self.pc_memory_budget_mb
        }
    }

    /// World-unit span of one chunk along an axis.
    pub fn chunk_span(&self) -> f32 {
        self.chunk_size as f32 * self.voxel_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.chunk_size, 32);
        assert_eq!(config.chunk_pool_size, 100);
        assert!((config.memory_budget_mb() - 800.0).abs() < f32::EPSILON);
        assert_eq!(config.chunk_span(), 800.0);
    }

    #[test]
    fn test_mobile_preset() {
        let config = WorldConfig::mobile();
        assert_eq!(config.chunk_size, 16);
        assert!((config.memory_budget_mb() - 400.0).abs() < f32::EPSILON);
    }
}
