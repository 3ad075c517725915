//! Single source of truth for engine-wide constants. Values shared between
//! the meshing pipeline, the world manager, and the template loader live
//! here so the crates cannot drift apart.

/// Chunk edge length in voxels on desktop-class hardware.
pub const CHUNK_SIZE_DESKTOP: i32 = 32;

/// Chunk edge length in voxels on mobile-class hardware.
pub const CHUNK_SIZE_MOBILE: i32 = 16;

/// Edge length of one voxel in host world units (25 = 25 cm at 1 unit/cm).
pub const VOXEL_SIZE: f32 = 25.0;

/// Seconds between viewer-driven streaming passes.
pub const CHUNK_UPDATE_INTERVAL: f32 = 0.1;

/// Seconds between memory-budget checks.
pub const MEMORY_CHECK_INTERVAL: f32 = 1.0;

/// Seconds between LOD re-selection passes.
pub const LOD_UPDATE_INTERVAL: f32 = 0.5;

/// Vertical streaming range: chunks with `|dz| <= STREAM_Z_RANGE` around the
/// viewer chunk are loaded (unless flat-world mode restricts Z to 0).
pub const STREAM_Z_RANGE: i32 = 2;

/// Maximum mesh tasks the dispatcher pops per frame.
pub const MAX_TASKS_PER_FRAME: usize = 5;

/// Priority band width in world units: priority = floor(distance / this).
pub const PRIORITY_DISTANCE_UNIT: f32 = 1000.0;

/// Priorities are clamped to [0, MAX_PRIORITY]. Lower is more urgent.
pub const MAX_PRIORITY: i32 = 999;

/// Hard cap on simultaneously allocated chunks (pooled + active). Allocation
/// beyond this fails with `PoolExhausted` instead of growing without bound.
pub const MAX_LOADED_CHUNKS: usize = 4096;

/// Fraction divisor for budget eviction: unload max(1, active / this).
pub const EVICTION_DIVISOR: usize = 10;

/// Estimated fixed overhead per active chunk, in MiB.
pub const CHUNK_OVERHEAD_MB: f32 = 0.1;

/// Estimated bytes per vertex across all streams.
pub const VERTEX_ESTIMATE_BYTES: f32 = 32.0;

/// Estimated bytes per triangle of index data.
pub const TRIANGLE_ESTIMATE_BYTES: f32 = 12.0;

/// Vertex welding quantization: coordinates are multiplied by this and
/// rounded, giving 0.01 world-unit granularity.
pub const WELD_QUANTIZE_SCALE: f32 = 100.0;

/// LOD band edges in world units (metres x 100 at the default voxel size).
pub const LOD0_MAX_DISTANCE: f32 = 5_000.0;
pub const LOD1_MAX_DISTANCE: f32 = 10_000.0;
pub const LOD2_MAX_DISTANCE: f32 = 20_000.0;
pub const LOD3_MAX_DISTANCE: f32 = 30_000.0;
