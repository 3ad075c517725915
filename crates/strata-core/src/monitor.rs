//! Performance monitor with an explicit start/stop lifecycle.
//!
//! The world manager records samples into a monitor handle passed in by the
//! host; nothing here is process-global. Recording while stopped is a no-op,
//! so instrumentation can stay in place permanently.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

/// Bounded history length, in recorded frames.
const HISTORY_CAP: usize = 1000;

/// Greedy meshing time target per chunk, in milliseconds.
const GREEDY_TARGET_MS: f32 = 5.0;

/// One frame's worth of recorded measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSample {
    /// Seconds since monitoring started.
    pub timestamp_s: f64,
    pub mesh_generation_ms: f32,
    pub greedy_meshing_ms: f32,
    pub triangle_count: u32,
    pub vertex_count: u32,
    pub reduction_percent: f32,
    pub active_chunks: u32,
    pub memory_mb: f32,
}

/// Aggregates computed over the recorded history.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorSummary {
    pub frames_recorded: usize,
    pub duration_s: f64,
    pub average_mesh_generation_ms: f32,
    pub average_greedy_meshing_ms: f32,
    pub average_reduction_percent: f32,
    pub best_mesh_generation_ms: f32,
    pub worst_mesh_generation_ms: f32,
    pub peak_memory_mb: f32,
    pub current_memory_mb: f32,
}

#[derive(Debug)]
struct MonitorInner {
    monitoring: bool,
    history: VecDeque<FrameSample>,
    current: FrameSample,
    peak_memory_mb: f32,
}

/// Thread-safe sample collector. Clone the `Arc` handle into whatever needs
/// to record; the lock is held only for O(1) bookkeeping per call.
#[derive(Debug)]
pub struct PerformanceMonitor {
    started: Instant,
    inner: Mutex<MonitorInner>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            inner: Mutex::new(MonitorInner {
                monitoring: false,
                history: VecDeque::new(),
                current: FrameSample::default(),
                peak_memory_mb: 0.0,
            }),
        }
    }

    /// Begin recording. Clears any previous history.
    pub fn start_monitoring(&self) {
        let mut inner = self.lock();
        inner.monitoring = true;
        inner.history.clear();
        inner.current = FrameSample::default();
        inner.peak_memory_mb = 0.0;
    }

    pub fn stop_monitoring(&self) {
        self.lock().monitoring = false;
    }

    pub fn is_monitoring(&self) -> bool {
        self.lock().monitoring
    }

    pub fn record_mesh_generation(&self, time_ms: f32, triangles: u32, vertices: u32) {
        let mut inner = self.lock();
        if !inner.monitoring {
            return;
        }
        inner.current.mesh_generation_ms = time_ms;
        inner.current.triangle_count = triangles;
        inner.current.vertex_count = vertices;
    }

    pub fn record_greedy_meshing(&self, time_ms: f32, reduction_percent: f32) {
        let mut inner = self.lock();
        if !inner.monitoring {
            return;
        }
        inner.current.greedy_meshing_ms = time_ms;
        inner.current.reduction_percent = reduction_percent;
    }

    /// Close out the current frame: stamps it, pushes it into the bounded
    /// history, tracks the memory peak, and starts a fresh frame.
    pub fn record_chunk_update(&self, active_chunks: u32, memory_mb: f32) {
        let timestamp_s = self.started.elapsed().as_secs_f64();
        let mut inner = self.lock();
        if !inner.monitoring {
            return;
        }
        inner.current.active_chunks = active_chunks;
        inner.current.memory_mb = memory_mb;
        inner.current.timestamp_s = timestamp_s;

        let frame = inner.current;
        inner.history.push_back(frame);
        if inner.history.len() > HISTORY_CAP {
            inner.history.pop_front();
        }
        if memory_mb > inner.peak_memory_mb {
            inner.peak_memory_mb = memory_mb;
        }
        inner.current = FrameSample::default();
    }

    pub fn summary(&self) -> MonitorSummary {
        let inner = self.lock();
        let mut summary = MonitorSummary {
            frames_recorded: inner.history.len(),
            peak_memory_mb: inner.peak_memory_mb,
            best_mesh_generation_ms: f32::MAX,
            ..MonitorSummary::default()
        };

        if let (Some(first), Some(last)) = (inner.history.front(), inner.history.back()) {
            summary.duration_s = last.timestamp_s - first.timestamp_s;
            summary.current_memory_mb = last.memory_mb;
        }

        let mut valid = 0usize;
        for frame in &inner.history {
            if frame.mesh_generation_ms > 0.0 {
                summary.average_mesh_generation_ms += frame.mesh_generation_ms;
                summary.average_greedy_meshing_ms += frame.greedy_meshing_ms;
                summary.average_reduction_percent += frame.reduction_percent;
                summary.best_mesh_generation_ms =
                    summary.best_mesh_generation_ms.min(frame.mesh_generation_ms);
                summary.worst_mesh_generation_ms =
                    summary.worst_mesh_generation_ms.max(frame.mesh_generation_ms);
                valid += 1;
            }
        }
        if valid > 0 {
            summary.average_mesh_generation_ms /= valid as f32;
            summary.average_greedy_meshing_ms /= valid as f32;
            summary.average_reduction_percent /= valid as f32;
        } else {
            summary.best_mesh_generation_ms = 0.0;
        }
        summary
    }

    /// Human-readable report with pass/fail against the meshing-time target
    /// and the given memory budget.
    pub fn report(&self, memory_budget_mb: f32) -> String {
        let summary = self.summary();
        let mut out = String::new();
        out.push_str("=== Voxel Performance Report ===\n");
        out.push_str(&format!("Monitoring Duration: {:.1} seconds\n", summary.duration_s));
        out.push_str(&format!("Frames Recorded: {}\n\n", summary.frames_recorded));
        out.push_str("Average Performance:\n");
        out.push_str(&format!(
            "  Mesh Generation: {:.2} ms\n",
            summary.average_mesh_generation_ms
        ));
        out.push_str(&format!(
            "  Greedy Meshing: {:.2} ms\n",
            summary.average_greedy_meshing_ms
        ));
        out.push_str(&format!(
            "  Triangle Reduction: {:.1}%\n\n",
            summary.average_reduction_percent
        ));
        out.push_str("Memory Usage:\n");
        out.push_str(&format!("  Current: {:.1} MB\n", summary.current_memory_mb));
        out.push_str(&format!("  Peak: {:.1} MB\n\n", summary.peak_memory_mb));
        out.push_str("Mesh Generation Times:\n");
        out.push_str(&format!("  Best: {:.2} ms\n", summary.best_mesh_generation_ms));
        out.push_str(&format!("  Worst: {:.2} ms\n\n", summary.worst_mesh_generation_ms));

        let meets_target = summary.average_greedy_meshing_ms < GREEDY_TARGET_MS
            && summary.peak_memory_mb < memory_budget_mb;
        out.push_str(&format!(
            "Target: <{GREEDY_TARGET_MS:.0}ms greedy mesh, <{memory_budget_mb:.0}MB memory\n"
        ));
        out.push_str(&format!(
            "Status: {}\n",
            if meets_target { "PASS" } else { "FAIL" }
        ));
        out
    }

    /// Dump the history as CSV, one row per recorded frame.
    pub fn csv_dump(&self) -> String {
        let inner = self.lock();
        let mut out = String::from(
            "timestamp_s,mesh_generation_ms,greedy_meshing_ms,triangle_count,\
             vertex_count,reduction_percent,active_chunks,memory_mb\n",
        );
        for frame in &inner.history {
            out.push_str(&format!(
                "{:.3},{:.2},{:.2},{},{},{:.1},{},{:.1}\n",
                frame.timestamp_s,
                frame.mesh_generation_ms,
                frame.greedy_meshing_ms,
                frame.triangle_count,
                frame.vertex_count,
                frame.reduction_percent,
                frame.active_chunks,
                frame.memory_mb,
            ));
        }
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MonitorInner> {
        // A poisoned monitor only loses diagnostics; keep the data.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
