//! The world manager: active chunk map, free pool, viewer-driven streaming,
//! mesh job dispatch, memory budget enforcement, and LOD selection.
//!
//! All chunk state is owned here and mutated on the main sequence only;
//! workers see voxel snapshots. Chunks are stored in a slot table, with the
//! active map and the free pool both holding slot indices; the slot index
//! doubles as the chunk id handed to the mesh sink.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::{IVec3, Vec3};
use strata_core::constants::{
    CHUNK_OVERHEAD_MB, EVICTION_DIVISOR, MAX_LOADED_CHUNKS, MAX_PRIORITY, MAX_TASKS_PER_FRAME,
    PRIORITY_DISTANCE_UNIT, STREAM_Z_RANGE, TRIANGLE_ESTIMATE_BYTES, VERTEX_ESTIMATE_BYTES,
};
use strata_core::coords::{chunk_world_center, chunk_world_origin, world_to_chunk, world_to_local};
use strata_core::lod::lod_for_distance;
use strata_core::{ChunkData, ChunkLod, ChunkSize, Material, PerformanceMonitor, WorldStats};
use strata_template::WorldTemplate;
use tracing::{debug, error, info, trace, warn};

use crate::chunk_component::{ChunkComponent, ChunkState};
use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::events::WorldEvent;
use crate::queue::{MeshQueue, MeshTask};
use crate::sink::{ChunkMeshRecord, MeshSink, NullSink};
use crate::worker::{MeshJob, MeshWorkerPool};
use crate::worldgen::TerrainGenerator;

/// Priority used when re-meshing a directly edited chunk.
const EDIT_PRIORITY: i32 = 0;

/// Priority used for neighbour regeneration after a boundary edit.
const NEIGHBOUR_PRIORITY: i32 = 1;

pub struct VoxelWorld {
    config: WorldConfig,
    chunks: Vec<ChunkComponent>,
    active: HashMap<IVec3, u32>,
    free: Vec<u32>,
    queue: MeshQueue,
    workers: MeshWorkerPool,
    in_flight: AtomicUsize,
    template: Option<WorldTemplate>,
    terrain: TerrainGenerator,
    sink: Box<dyn MeshSink>,
    monitor: Option<Arc<PerformanceMonitor>>,
    stats: WorldStats,
    events: VecDeque<WorldEvent>,
    budget_signaled: bool,
    viewer_pos: Vec3,
    chunk_update_timer: f32,
    memory_check_timer: f32,
    lod_update_timer: f32,
}

impl VoxelWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self::with_sink(config, Box::new(NullSink))
    }

    pub fn with_sink(config: WorldConfig, sink: Box<dyn MeshSink>) -> Self {
        let size = ChunkSize::cube(config.chunk_size);
        let pool_size = config.chunk_pool_size.min(MAX_LOADED_CHUNKS);
        let chunks: Vec<ChunkComponent> =
            (0..pool_size).map(|_| ChunkComponent::new(size)).collect();
        let free: Vec<u32> = (0..pool_size as u32).rev().collect();

        let worker_count = if config.use_multithreading {
            config.worker_threads.max(1)
        } else {
            0
        };
        let workers = MeshWorkerPool::new(worker_count);
        let terrain = TerrainGenerator::new(config.world_seed);

        info!(
            pool_size,
            worker_count,
            chunk_size = config.chunk_size,
            "voxel world initialized"
        );

        Self {
            // Timers primed so the first tick streams and selects LODs.
            chunk_update_timer: config.chunk_update_interval,
            lod_update_timer: config.lod_update_interval,
            memory_check_timer: 0.0,
            config,
            chunks,
            active: HashMap::new(),
            free,
            queue: MeshQueue::new(),
            workers,
            in_flight: AtomicUsize::new(0),
            template: None,
            terrain,
            sink,
            monitor: None,
            stats: WorldStats::default(),
            events: VecDeque::new(),
            budget_signaled: false,
            viewer_pos: Vec3::ZERO,
        }
    }

    /// Attach the template chunks are materialized from. Replaces any
    /// previous template; already-active chunks are not reloaded.
    pub fn set_template(&mut self, template: WorldTemplate) {
        self.template = Some(template);
    }

    /// Attach a performance monitor handle. Samples are recorded only while
    /// the monitor itself is started.
    pub fn set_monitor(&mut self, monitor: Arc<PerformanceMonitor>) {
        self.monitor = Some(monitor);
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    pub fn active_chunk_count(&self) -> usize {
        self.active.len()
    }

    pub fn pooled_chunk_count(&self) -> usize {
        self.free.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn pending_task_count(&self) -> usize {
        self.queue.len()
    }

    /// Positions currently in the active map.
    pub fn active_positions(&self) -> Vec<IVec3> {
        self.active.keys().copied().collect()
    }

    pub fn chunk_at(&self, chunk_pos: IVec3) -> Option<&ChunkComponent> {
        self.active
            .get(&chunk_pos)
            .map(|&slot| &self.chunks[slot as usize])
    }

    pub fn chunk_at_mut(&mut self, chunk_pos: IVec3) -> Option<&mut ChunkComponent> {
        self.active
            .get(&chunk_pos)
            .map(|&slot| &mut self.chunks[slot as usize])
    }

    /// Drain queued world events (chunk loads/unloads, budget signal).
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain(..).collect()
    }

    pub fn world_to_chunk_pos(&self, world: Vec3) -> IVec3 {
        world_to_chunk(world, self.config.chunk_size, self.config.voxel_size)
    }

    pub fn world_to_local_voxel(&self, world: Vec3, chunk_pos: IVec3) -> IVec3 {
        world_to_local(world, chunk_pos, self.config.chunk_size, self.config.voxel_size)
    }

    /// One main-sequence step: streaming, dispatch, completion handoff,
    /// budget enforcement, and LOD updates, each at its own cadence.
    pub fn tick(&mut self, viewer: Vec3, dt: f32) {
        self.chunk_update_timer += dt;
        if self.chunk_update_timer >= self.config.chunk_update_interval {
            self.chunk_update_timer = 0.0;
            self.stream_chunks(viewer);
        } else {
            self.viewer_pos = viewer;
        }

        self.process_mesh_tasks();
        self.drain_mesh_results();

        self.memory_check_timer += dt;
        if self.memory_check_timer >= self.config.memory_check_interval {
            self.memory_check_timer = 0.0;
            self.enforce_memory_budget();
        }

        self.lod_update_timer += dt;
        if self.lod_update_timer >= self.config.lod_update_interval {
            self.lod_update_timer = 0.0;
            self.update_lods();
        }
    }

    // ── Chunk lifecycle ────────────────────────────────────────────────

    /// Slot of the chunk at `chunk_pos`, creating and generating it if
    /// absent. Creation pulls from the pool, falls back to fresh allocation
    /// under the live-chunk cap, and errors with `PoolExhausted` beyond it.
    pub fn get_or_create_chunk(&mut self, chunk_pos: IVec3) -> Result<u32, WorldError> {
        if let Some(&slot) = self.active.get(&chunk_pos) {
            return Ok(slot);
        }

        let slot = self.allocate_slot(chunk_pos)?;
        let size = ChunkSize::cube(self.config.chunk_size);
        let chunk = &mut self.chunks[slot as usize];
        chunk.init(chunk_pos, size);

        self.generate_voxels(slot);
        self.chunks[slot as usize].mark_generated();

        self.active.insert(chunk_pos, slot);
        let priority = self.priority_for(chunk_pos);
        self.queue.push(MeshTask {
            chunk_pos,
            priority,
            is_regeneration: false,
        });
        self.events.push_back(WorldEvent::ChunkLoaded { chunk_pos });
        trace!(?chunk_pos, slot, "chunk loaded");
        Ok(slot)
    }

    /// Insert a chunk whose voxels the host already owns (editor content).
    /// Marked authored when `preserve_editor_chunks` is set, which shields
    /// it from procedural refills for its active lifetime.
    pub fn adopt_chunk(&mut self, data: ChunkData) -> Result<u32, WorldError> {
        let chunk_pos = data.chunk_pos();
        if self.active.contains_key(&chunk_pos) {
            return self.get_or_create_chunk(chunk_pos);
        }

        let slot = self.allocate_slot(chunk_pos)?;
        let chunk = &mut self.chunks[slot as usize];
        chunk.init(chunk_pos, data.size());
        *chunk.data_mut() = data;
        if self.config.preserve_editor_chunks {
            chunk.mark_authored();
        }
        chunk.mark_generated();

        self.active.insert(chunk_pos, slot);
        let priority = self.priority_for(chunk_pos);
        self.queue.push(MeshTask {
            chunk_pos,
            priority,
            is_regeneration: false,
        });
        self.events.push_back(WorldEvent::ChunkLoaded { chunk_pos });
        Ok(slot)
    }

    /// Remove a chunk from the active map and return it to the pool. Any
    /// in-flight mesh job for it is left to finish; its result dies at the
    /// generation check.
    pub fn unload_chunk(&mut self, chunk_pos: IVec3) {
        let Some(slot) = self.active.remove(&chunk_pos) else {
            return;
        };
        let chunk = &mut self.chunks[slot as usize];
        chunk.begin_unload();
        chunk.reset_for_pool();
        self.free.push(slot);
        self.sink.clear_chunk_mesh(slot);
        self.events.push_back(WorldEvent::ChunkUnloaded { chunk_pos });
        trace!(?chunk_pos, slot, "chunk unloaded");
    }

    /// Queue a chunk for re-meshing.
    pub fn regenerate_chunk(&mut self, chunk_pos: IVec3, priority: i32) {
        if self.active.contains_key(&chunk_pos) {
            self.queue.push(MeshTask {
                chunk_pos,
                priority,
                is_regeneration: true,
            });
        }
    }

    fn allocate_slot(&mut self, chunk_pos: IVec3) -> Result<u32, WorldError> {
        if self.config.flat_world_mode && chunk_pos.z != 0 {
            return Err(WorldError::FlatWorldRejected { chunk_pos });
        }

        if let Some(slot) = self.free.pop() {
            return Ok(slot);
        }

        if self.chunks.len() >= MAX_LOADED_CHUNKS {
            warn!(?chunk_pos, "chunk pool exhausted and live-chunk cap reached");
            return Err(WorldError::PoolExhausted);
        }

        let size = ChunkSize::cube(self.config.chunk_size);
        self.chunks.push(ChunkComponent::new(size));
        Ok((self.chunks.len() - 1) as u32)
    }

    /// Fill a freshly initialized chunk's voxels: template content when
    /// mapped (marks the chunk authored), procedural hills otherwise.
    /// Authored chunks are never overwritten by the procedural path.
    fn generate_voxels(&mut self, slot: u32) {
        let chunk = &mut self.chunks[slot as usize];
        let chunk_pos = chunk.chunk_pos();

        if let Some(template) = &self.template {
            match strata_template::materialize(template, chunk_pos, self.config.world_seed) {
                Ok(Some(data)) if data.size() == chunk.data().size() => {
                    *chunk.data_mut() = data;
                    chunk.mark_authored();
                    return;
                }
                Ok(Some(data)) => {
                    warn!(
                        ?chunk_pos,
                        template_size = ?data.size(),
                        chunk_size = self.config.chunk_size,
                        "template chunk size mismatch, using procedural fill"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    error!(?chunk_pos, error = %e, "template load failed, using procedural fill");
                }
            }
        }

        if self.config.disable_dynamic_generation {
            return;
        }
        if !chunk.is_authored() {
            self.terrain.fill_chunk(chunk.data_mut());
        }
    }

    // ── Voxel editing ──────────────────────────────────────────────────

    /// Write one voxel at a world position, creating the owning chunk if
    /// needed. Edits on a chunk face also queue the existing neighbours
    /// (all 26) for regeneration, since their culled faces may now differ.
    pub fn set_voxel(&mut self, world: Vec3, material: Material) -> Result<(), WorldError> {
        let chunk_pos = self.world_to_chunk_pos(world);
        let local = self.world_to_local_voxel(world, chunk_pos);

        let slot = self.get_or_create_chunk(chunk_pos)?;
        self.chunks[slot as usize].set_voxel(local.x, local.y, local.z, material);

        self.queue.push(MeshTask {
            chunk_pos,
            priority: EDIT_PRIORITY,
            is_regeneration: true,
        });

        let edge = self.config.chunk_size - 1;
        let on_boundary = local.x == 0
            || local.x == edge
            || local.y == 0
            || local.y == edge
            || local.z == 0
            || local.z == edge;
        if on_boundary {
            for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 && dz == 0 {
                            continue;
                        }
                        let neighbour = chunk_pos + IVec3::new(dx, dy, dz);
                        if self.active.contains_key(&neighbour) {
                            self.queue.push(MeshTask {
                                chunk_pos: neighbour,
                                priority: NEIGHBOUR_PRIORITY,
                                is_regeneration: true,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Voxel at a world position; `Air` where no chunk is active.
    pub fn get_voxel(&self, world: Vec3) -> Material {
        let chunk_pos = self.world_to_chunk_pos(world);
        let local = self.world_to_local_voxel(world, chunk_pos);
        match self.chunk_at(chunk_pos) {
            Some(chunk) => chunk.get_voxel(local.x, local.y, local.z),
            None => Material::Air,
        }
    }

    /// Fill a sphere of voxels. Affected chunks are deduplicated and queued
    /// once each as priority-0 regenerations.
    pub fn set_voxel_sphere(&mut self, center: Vec3, radius: f32, material: Material) {
        let e = self.config.voxel_size;
        let min = ((center - Vec3::splat(radius)) / e).floor().as_ivec3();
        let max = ((center + Vec3::splat(radius)) / e).floor().as_ivec3();

        self.bulk_edit(min, max, material, |voxel_center| {
            voxel_center.distance(center) <= radius
        });
    }

    /// Fill an axis-aligned box of voxels, queueing affected chunks once.
    pub fn set_voxel_box(&mut self, min: Vec3, max: Vec3, material: Material) {
        let e = self.config.voxel_size;
        let lo = (min / e).floor().as_ivec3();
        let hi = (max / e).floor().as_ivec3();
        self.bulk_edit(lo, hi, material, |_| true);
    }

    fn bulk_edit<F>(&mut self, lo: IVec3, hi: IVec3, material: Material, mut inside: F)
    where
        F: FnMut(Vec3) -> bool,
    {
        let e = self.config.voxel_size;
        let mut modified: HashSet<IVec3> = HashSet::new();

        for vz in lo.z..=hi.z {
            for vy in lo.y..=hi.y {
                for vx in lo.x..=hi.x {
                    let voxel_center =
                        Vec3::new(vx as f32 + 0.5, vy as f32 + 0.5, vz as f32 + 0.5) * e;
                    if !inside(voxel_center) {
                        continue;
                    }
                    let chunk_pos = self.world_to_chunk_pos(voxel_center);
                    let local = self.world_to_local_voxel(voxel_center, chunk_pos);
                    match self.get_or_create_chunk(chunk_pos) {
                        Ok(slot) => {
                            self.chunks[slot as usize]
                                .set_voxel(local.x, local.y, local.z, material);
                            modified.insert(chunk_pos);
                        }
                        Err(err) => debug!(?chunk_pos, error = %err, "bulk edit skipped chunk"),
                    }
                }
            }
        }

        for chunk_pos in modified {
            self.queue.push(MeshTask {
                chunk_pos,
                priority: EDIT_PRIORITY,
                is_regeneration: true,
            });
        }
    }

    // ── Streaming ──────────────────────────────────────────────────────

    /// Load every chunk in the viewer's required set and unload the rest.
    /// The required set is a square of `view_distance_chunks` in XY with
    /// `|dz| <= 2` vertically, or the z = 0 layer alone in flat-world mode.
    pub fn stream_chunks(&mut self, viewer: Vec3) {
        self.viewer_pos = viewer;
        let viewer_chunk = self.world_to_chunk_pos(viewer);
        let view_distance = self.config.view_distance_chunks;
        let z_range = if self.config.flat_world_mode {
            0..=0
        } else {
            -STREAM_Z_RANGE..=STREAM_Z_RANGE
        };

        let mut required: HashSet<IVec3> = HashSet::new();
        for dz in z_range {
            for dy in -view_distance..=view_distance {
                for dx in -view_distance..=view_distance {
                    let chunk_pos = if self.config.flat_world_mode {
                        IVec3::new(viewer_chunk.x + dx, viewer_chunk.y + dy, 0)
                    } else {
                        viewer_chunk + IVec3::new(dx, dy, dz)
                    };
                    required.insert(chunk_pos);

                    if self.active.contains_key(&chunk_pos) {
                        continue;
                    }
                    if self.config.disable_dynamic_generation {
                        continue;
                    }
                    if let Err(e) = self.get_or_create_chunk(chunk_pos) {
                        debug!(?chunk_pos, error = %e, "streaming skipped chunk");
                    }
                }
            }
        }

        let to_unload: Vec<IVec3> = self
            .active
            .keys()
            .filter(|pos| !required.contains(pos))
            .copied()
            .collect();
        for chunk_pos in to_unload {
            self.unload_chunk(chunk_pos);
        }
    }

    // ── Dispatch and completion ────────────────────────────────────────

    /// Pop queued tasks and hand them to the worker pool, bounded by the
    /// in-flight cap and the per-frame task limit. Tasks whose chunk is
    /// already `Ready` are dropped unless they are regenerations.
    pub fn process_mesh_tasks(&mut self) {
        let mut processed = 0;
        while self.in_flight.load(Ordering::Relaxed) < self.config.max_concurrent_chunk_generations
            && processed < MAX_TASKS_PER_FRAME
        {
            let Some(task) = self.queue.pop() else {
                break;
            };
            processed += 1;

            let Some(&slot) = self.active.get(&task.chunk_pos) else {
                continue;
            };
            let use_greedy = self.config.use_greedy_meshing;
            let voxel_size = self.config.voxel_size;
            let chunk = &mut self.chunks[slot as usize];
            if chunk.lod() == ChunkLod::Unloaded {
                continue;
            }
            if chunk.state() == ChunkState::Ready && !task.is_regeneration {
                continue;
            }

            let generation = match chunk.begin_meshing(task.is_regeneration) {
                Ok(generation) => generation,
                Err(_) => {
                    trace!(chunk_pos = ?task.chunk_pos, "chunk busy, task dropped");
                    continue;
                }
            };

            let job = MeshJob {
                chunk_pos: task.chunk_pos,
                slot,
                generation,
                lod: chunk.lod(),
                voxel_size,
                use_greedy,
                snapshot: chunk.data().clone(),
            };

            self.in_flight.fetch_add(1, Ordering::Relaxed);
            if self.config.use_multithreading {
                self.workers.submit(job);
            } else {
                self.workers.run_sync(job);
            }
        }
    }

    /// Apply completed mesh jobs on the main sequence. Results for chunks
    /// that were unloaded or re-dispatched since are discarded by the
    /// generation check; mesh results are therefore applied in dispatch
    /// order, not completion order.
    pub fn drain_mesh_results(&mut self) {
        for outcome in self.workers.drain() {
            let previous = self.in_flight.fetch_sub(1, Ordering::Relaxed);
            debug_assert!(previous > 0);

            let Some(&slot) = self.active.get(&outcome.chunk_pos) else {
                trace!(chunk_pos = ?outcome.chunk_pos, "result for unloaded chunk discarded");
                continue;
            };
            if slot != outcome.slot {
                continue;
            }

            let chunk = &mut self.chunks[slot as usize];
            match outcome.result {
                Ok((mesh, stats)) => {
                    let local_bounds = mesh.bounds();
                    if chunk.apply_mesh(outcome.generation, mesh, stats) {
                        self.stats.mesh_generation_time_ms = self
                            .stats
                            .mesh_generation_time_ms
                            .max(stats.generation_time_ms);
                        self.stats.greedy_meshing_time_ms =
                            self.stats.greedy_meshing_time_ms.max(stats.greedy_time_ms);
                        if let Some(monitor) = &self.monitor {
                            monitor.record_mesh_generation(
                                stats.generation_time_ms,
                                stats.triangle_count,
                                stats.vertex_count,
                            );
                            monitor
                                .record_greedy_meshing(stats.greedy_time_ms, stats.reduction_percent);
                        }

                        let origin = chunk_world_origin(
                            outcome.chunk_pos,
                            self.config.chunk_size,
                            self.config.voxel_size,
                        );
                        let record = ChunkMeshRecord {
                            chunk_id: slot,
                            chunk_pos: outcome.chunk_pos,
                            mesh: self.chunks[slot as usize].mesh().clone(),
                            bounds: (local_bounds.0 + origin, local_bounds.1 + origin),
                        };
                        self.sink.apply_chunk_mesh(record);
                    } else {
                        trace!(chunk_pos = ?outcome.chunk_pos, generation = outcome.generation,
                            "stale mesh result discarded");
                    }
                }
                Err(e) => {
                    error!(chunk_pos = ?outcome.chunk_pos, error = %e, "mesh validation failed");
                    chunk.mesh_failed(outcome.generation);
                }
            }
        }
    }

    // ── Memory budget ──────────────────────────────────────────────────

    /// Refresh the aggregate stats (active counts, vertex/triangle totals,
    /// memory estimate).
    pub fn update_world_stats(&mut self) {
        let mut vertices = 0u32;
        let mut triangles = 0u32;
        for &slot in self.active.values() {
            let chunk = &self.chunks[slot as usize];
            vertices += chunk.mesh().vertex_count() as u32;
            triangles += chunk.mesh().triangle_count() as u32;
        }

        let mib = 1024.0 * 1024.0;
        self.stats.active_chunks = self.active.len() as u32;
        self.stats.pooled_chunks = self.free.len() as u32;
        self.stats.vertex_count = vertices;
        self.stats.triangle_count = triangles;
        self.stats.memory_usage_mb = self.active.len() as f32 * CHUNK_OVERHEAD_MB
            + vertices as f32 * VERTEX_ESTIMATE_BYTES / mib
            + triangles as f32 * TRIANGLE_ESTIMATE_BYTES / mib;

        if let Some(monitor) = &self.monitor {
            monitor.record_chunk_update(self.stats.active_chunks, self.stats.memory_usage_mb);
        }
    }

    /// Enforce the configured byte cap: when the estimate is over budget,
    /// emit a one-shot `BudgetExceeded` event and unload the farthest 10%
    /// of active chunks (at least one). The signal re-arms once usage drops
    /// back under budget.
    pub fn enforce_memory_budget(&mut self) {
        self.update_world_stats();
        let used = self.stats.memory_usage_mb;
        let budget = self.config.memory_budget_mb();

        if used <= budget {
            self.budget_signaled = false;
            return;
        }

        if !self.budget_signaled {
            self.budget_signaled = true;
            warn!(used_mb = used, budget_mb = budget, "memory budget exceeded");
            self.events.push_back(WorldEvent::BudgetExceeded {
                used_mb: used,
                budget_mb: budget,
            });
        }

        let size = ChunkSize::cube(self.config.chunk_size);
        let mut by_distance: Vec<(f32, IVec3)> = self
            .active
            .keys()
            .map(|&pos| {
                let center = chunk_world_center(pos, size, self.config.voxel_size);
                (center.distance(self.viewer_pos), pos)
            })
            .collect();
        by_distance.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let unload_count = (self.active.len() / EVICTION_DIVISOR).max(1);
        for (_, chunk_pos) in by_distance.into_iter().take(unload_count) {
            self.unload_chunk(chunk_pos);
        }
        self.update_world_stats();
    }

    // ── LOD selection ──────────────────────────────────────────────────

    /// Re-select each active chunk's LOD from its distance to the viewer.
    /// A chunk dropping to `Unloaded` keeps its voxels but loses its mesh;
    /// other transitions queue a mesh job when the chunk needs one.
    pub fn update_lods(&mut self) {
        let size = ChunkSize::cube(self.config.chunk_size);
        let viewer = self.viewer_pos;

        for (&chunk_pos, &slot) in &self.active {
            let center = chunk_world_center(chunk_pos, size, self.config.voxel_size);
            let distance = center.distance(viewer);
            let target = lod_for_distance(distance);

            let chunk = &mut self.chunks[slot as usize];
            if chunk.lod() == target {
                continue;
            }

            let needs_mesh_job = chunk.set_lod(target);
            if target == ChunkLod::Unloaded {
                self.sink.clear_chunk_mesh(slot);
                continue;
            }
            if needs_mesh_job && chunk.needs_mesh() {
                let priority = ((distance / PRIORITY_DISTANCE_UNIT) as i32).clamp(0, MAX_PRIORITY);
                self.queue.push(MeshTask {
                    chunk_pos,
                    priority,
                    is_regeneration: true,
                });
            }
        }
    }

    // ── Template save ──────────────────────────────────────────────────

    /// Package the current active chunks into a template asset. Chunks are
    /// stored in sorted position order so output is deterministic.
    pub fn save_template(&self, name: &str) -> WorldTemplate {
        let mut template = WorldTemplate::new(name, self.config.chunk_size as u32);
        let mut positions: Vec<IVec3> = self.active.keys().copied().collect();
        positions.sort_by_key(|p| (p.z, p.y, p.x));
        for chunk_pos in positions {
            let slot = self.active[&chunk_pos];
            template.insert_chunk(chunk_pos, &self.chunks[slot as usize].data().to_ids());
        }
        template
    }

    fn priority_for(&self, chunk_pos: IVec3) -> i32 {
        let size = ChunkSize::cube(self.config.chunk_size);
        let center = chunk_world_center(chunk_pos, size, self.config.voxel_size);
        let distance = center.distance(self.viewer_pos);
        ((distance / PRIORITY_DISTANCE_UNIT) as i32).clamp(0, MAX_PRIORITY)
    }
}
