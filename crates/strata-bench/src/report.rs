//! Baseline persistence and regression reporting.

use std::path::Path;

use crate::runner::BenchmarkResult;

/// A saved run: timestamp plus per-scene results.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    /// Seconds since the Unix epoch when the baseline was captured.
    pub timestamp: u64,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. None if the file is absent or
/// unparseable (a stale-format baseline is treated as no baseline).
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a baseline as pretty-printed JSON.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Compare current results against a baseline on mean greedy time. Returns
/// `(scene name, percent change)` for every scene slower than the threshold.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();
    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        if base.greedy.mean_ms <= 0.0 {
            continue;
        }
        let pct_change =
            (result.greedy.mean_ms - base.greedy.mean_ms) / base.greedy.mean_ms * 100.0;
        if pct_change > threshold_pct {
            regressions.push((result.scene_name.clone(), pct_change));
        }
    }
    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str(
        "| Scene | Solid | Quads (basic) | Quads (greedy) | Reduction | \
         Greedy mean (ms) | Greedy p95 (ms) | Basic mean (ms) | Target |\n",
    );
    out.push_str(
        "|-------|-------|---------------|----------------|-----------|\
         ------------------|-----------------|-----------------|--------|\n",
    );
    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.1}% | {:.3} | {:.3} | {:.3} | {} |\n",
            r.scene_name,
            r.solid_voxels,
            r.basic_quads,
            r.greedy_quads,
            r.reduction_percent,
            r.greedy.mean_ms,
            r.greedy.p95_ms,
            r.basic.mean_ms,
            if r.meets_target { "PASS" } else { "FAIL" },
        ));
    }
    out
}

/// Format the regression comparison.
pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!("No regressions above {threshold_pct:.0}% threshold.\n");
    }
    let mut out = format!("Regressions above {threshold_pct:.0}% threshold:\n");
    for (scene, pct) in regressions {
        out.push_str(&format!("  {scene}: +{pct:.1}%\n"));
    }
    out
}
