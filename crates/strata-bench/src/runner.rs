//! Benchmark execution: run each scene through both meshers, collect
//! timing distributions, and check the per-chunk time target.

use std::time::Instant;

use strata_mesh::basic::emit_visible_faces;
use strata_mesh::convert::convert_quads;
use strata_mesh::greedy::generate_greedy_quads;

use crate::scenes::{build_chunk, SceneConfig};

/// Per-chunk greedy meshing target in milliseconds (32^3 volume).
pub const GREEDY_TARGET_MS: f64 = 5.0;

const VOXEL_SIZE: f32 = 25.0;

/// Timing distribution over a benchmark's iterations.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TimingSeries {
    /// Summarize a set of millisecond samples.
    pub fn from_samples(mut samples: Vec<f64>) -> Self {
        assert!(!samples.is_empty(), "timing series needs samples");
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let percentile = |p: f64| {
            let idx = ((samples.len() - 1) as f64 * p).round() as usize;
            samples[idx]
        };

        Self {
            mean_ms: samples.iter().sum::<f64>() / samples.len() as f64,
            median_ms: percentile(0.5),
            p95_ms: percentile(0.95),
            p99_ms: percentile(0.99),
            min_ms: samples[0],
            max_ms: samples[samples.len() - 1],
        }
    }
}

/// Result of one scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub solid_voxels: u32,
    pub basic_quads: u32,
    pub greedy_quads: u32,
    pub greedy_triangles: u32,
    pub reduction_percent: f64,
    pub basic: TimingSeries,
    pub greedy: TimingSeries,
    /// Whether the mean greedy time met the per-chunk target.
    pub meets_target: bool,
}

/// Runs the scene suite on the calling thread.
pub struct BenchmarkRunner {
    iterations: usize,
}

impl BenchmarkRunner {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Run a single scene: full greedy pipeline and full basic pipeline,
    /// `iterations` times each after one warmup pass.
    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!("running scene '{}' ({} iterations)", config.name, self.iterations);

        let chunk = build_chunk(config);
        let max_extent = chunk.size().max_extent();

        // Warmup pass also yields the geometry counts.
        let greedy_quads = generate_greedy_quads(&chunk);
        let basic_quads = emit_visible_faces(&chunk);
        let (greedy_mesh, _) =
            convert_quads(&greedy_quads, VOXEL_SIZE, max_extent).expect("greedy mesh");

        let mut greedy_samples = Vec::with_capacity(self.iterations);
        let mut basic_samples = Vec::with_capacity(self.iterations);

        for _ in 0..self.iterations {
            let start = Instant::now();
            let quads = generate_greedy_quads(&chunk);
            let _ = convert_quads(&quads, VOXEL_SIZE, max_extent).expect("greedy mesh");
            greedy_samples.push(start.elapsed().as_secs_f64() * 1000.0);

            let start = Instant::now();
            let quads = emit_visible_faces(&chunk);
            let _ = convert_quads(&quads, VOXEL_SIZE, max_extent).expect("basic mesh");
            basic_samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }

        let reduction_percent = if basic_quads.is_empty() {
            0.0
        } else {
            (1.0 - greedy_quads.len() as f64 / basic_quads.len() as f64) * 100.0
        };

        let greedy = TimingSeries::from_samples(greedy_samples);
        let basic = TimingSeries::from_samples(basic_samples);
        let meets_target = greedy.mean_ms < GREEDY_TARGET_MS;

        BenchmarkResult {
            scene_name: config.name.to_string(),
            solid_voxels: chunk.solid_count() as u32,
            basic_quads: basic_quads.len() as u32,
            greedy_quads: greedy_quads.len() as u32,
            greedy_triangles: greedy_mesh.triangle_count() as u32,
            reduction_percent,
            basic,
            greedy,
            meets_target,
        }
    }

    /// Run the whole suite.
    pub fn run_all(&self, configs: &[SceneConfig]) -> Vec<BenchmarkResult> {
        configs.iter().map(|c| self.run_scene(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::{SceneConfig, SceneKind};

    #[test]
    fn test_timing_series_statistics() {
        let series = TimingSeries::from_samples(vec![4.0, 1.0, 3.0, 2.0, 5.0]);
        assert!((series.mean_ms - 3.0).abs() < 1e-9);
        assert!((series.median_ms - 3.0).abs() < 1e-9);
        assert!((series.min_ms - 1.0).abs() < 1e-9);
        assert!((series.max_ms - 5.0).abs() < 1e-9);
        assert!(series.p95_ms <= series.max_ms);
    }

    #[test]
    fn test_solid_scene_result_shape() {
        let runner = BenchmarkRunner::new(2);
        let config = SceneConfig {
            name: "solid",
            edge: 16,
            kind: SceneKind::Solid,
            seed: 0,
        };
        let result = runner.run_scene(&config);

        assert_eq!(result.scene_name, "solid");
        assert_eq!(result.solid_voxels, 16 * 16 * 16);
        assert_eq!(result.greedy_quads, 6);
        assert_eq!(result.greedy_triangles, 12);
        assert_eq!(result.basic_quads, 6 * 16 * 16);
        assert!(result.reduction_percent > 99.0);
        assert!(result.greedy.min_ms > 0.0);
    }

    #[test]
    fn test_reduction_is_zero_safe_on_empty_scene() {
        // A zero-density random scene has no quads at all.
        let runner = BenchmarkRunner::new(1);
        let config = SceneConfig {
            name: "empty",
            edge: 8,
            kind: SceneKind::Random { density: 0.0 },
            seed: 1,
        };
        let result = runner.run_scene(&config);
        assert_eq!(result.greedy_quads, 0);
        assert_eq!(result.reduction_percent, 0.0);
    }
}
