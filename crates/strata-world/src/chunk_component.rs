use glam::IVec3;
use strata_core::{ChunkData, ChunkLod, ChunkSize, Material, MeshStats};
use strata_mesh::MeshData;

use crate::error::WorldError;

/// Lifecycle state of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Pooled or never initialized; no voxels of interest, no mesh.
    Uninitialized,
    /// Voxel content is being produced (template load or procedural fill).
    Generating,
    /// Voxels exist; no mesh job has completed for them yet.
    Generated,
    /// A mesh job is in flight for this chunk.
    Meshing,
    /// The latest mesh matches the voxels (as of its dispatch snapshot).
    Ready,
    /// Returned to the pool while a job was still running; the job's result
    /// is discarded at handoff.
    Unloading,
}

/// Owns one chunk's voxel volume and its latest mesh.
///
/// The world manager is the sole owner; jobs receive voxel snapshots and a
/// generation tag. The generation counter advances on every dispatch so
/// results are applied in dispatch order: a stale job's result is rejected
/// even if it completes last.
#[derive(Debug)]
pub struct ChunkComponent {
    data: ChunkData,
    state: ChunkState,
    lod: ChunkLod,
    authored: bool,
    generation: u64,
    mesh: MeshData,
    stats: MeshStats,
}

impl ChunkComponent {
    pub fn new(size: ChunkSize) -> Self {
        Self {
            data: ChunkData::new(IVec3::ZERO, size),
            state: ChunkState::Uninitialized,
            lod: ChunkLod::Lod0,
            authored: false,
            generation: 0,
            mesh: MeshData::new(),
            stats: MeshStats::default(),
        }
    }

    /// Claim the chunk for a new grid position: voxels cleared, state
    /// `Generating`, authored flag reset, mesh discarded.
    pub fn init(&mut self, chunk_pos: IVec3, size: ChunkSize) {
        self.data.reset(chunk_pos, size);
        self.state = ChunkState::Generating;
        self.lod = ChunkLod::Lod0;
        self.authored = false;
        self.mesh.clear();
        self.stats = MeshStats::default();
    }

    /// Voxel generation finished; the chunk can now be meshed.
    pub fn mark_generated(&mut self) {
        self.state = ChunkState::Generated;
    }

    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, material: Material) {
        self.data.set(x, y, z, material);
    }

    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Material {
        self.data.get(x, y, z)
    }

    /// Batched voxel writes. Fails fast on length mismatch without touching
    /// any voxel.
    pub fn set_voxel_batch(
        &mut self,
        positions: &[IVec3],
        materials: &[Material],
    ) -> Result<(), WorldError> {
        if positions.len() != materials.len() {
            return Err(WorldError::InvalidInput {
                positions: positions.len(),
                materials: materials.len(),
            });
        }
        for (pos, material) in positions.iter().zip(materials) {
            self.data.set_pos(*pos, *material);
        }
        Ok(())
    }

    /// Fill the half-open box `[min, max)`, clamped to the chunk extents.
    pub fn fill_region(&mut self, min: IVec3, max: IVec3, material: Material) {
        let size = self.data.size();
        let lo = min.max(IVec3::ZERO);
        let hi = max.min(size.to_ivec3());
        for z in lo.z..hi.z {
            for y in lo.y..hi.y {
                for x in lo.x..hi.x {
                    self.data.set(x, y, z, material);
                }
            }
        }
    }

    /// Change the LOD. `Unloaded` clears the mesh immediately; any other
    /// level reports whether a mesh job is needed so the caller can enqueue
    /// one.
    pub fn set_lod(&mut self, lod: ChunkLod) -> bool {
        if self.lod == lod {
            return false;
        }
        self.lod = lod;
        if lod == ChunkLod::Unloaded {
            self.clear_mesh();
            return false;
        }
        true
    }

    /// Begin a mesh job. Errors with `Busy` while another job is in flight,
    /// unless `force` (regenerations supersede the running job; its result
    /// dies at the generation check). Returns the generation tag the job
    /// must carry.
    pub fn begin_meshing(&mut self, force: bool) -> Result<u64, WorldError> {
        if self.state == ChunkState::Meshing && !force {
            return Err(WorldError::Busy);
        }
        self.state = ChunkState::Meshing;
        self.generation += 1;
        Ok(self.generation)
    }

    /// Apply a completed mesh. Accepted only when the generation matches the
    /// latest dispatch and the chunk is still meshing; stale and unloaded
    /// results return false and are discarded by the caller.
    pub fn apply_mesh(&mut self, generation: u64, mesh: MeshData, stats: MeshStats) -> bool {
        if generation != self.generation || self.state != ChunkState::Meshing {
            return false;
        }
        self.mesh = mesh;
        self.stats = stats;
        self.state = ChunkState::Ready;
        self.data.mark_clean();
        true
    }

    /// A mesh job failed validation: drop back to `Generated` so the next
    /// dirty flip retries. The previous mesh (possibly empty) stays.
    pub fn mesh_failed(&mut self, generation: u64) {
        if generation == self.generation && self.state == ChunkState::Meshing {
            self.state = ChunkState::Generated;
        }
    }

    /// Drop the mesh and fall back to `Uninitialized`.
    pub fn clear_mesh(&mut self) {
        self.mesh.clear();
        self.stats = MeshStats::default();
        self.state = ChunkState::Uninitialized;
    }

    /// Mark as leaving the world while a job may still be in flight.
    pub fn begin_unload(&mut self) {
        self.state = ChunkState::Unloading;
        self.generation += 1;
    }

    /// Return to the pool: mesh cleared, state reset, voxels wiped.
    pub fn reset_for_pool(&mut self) {
        self.clear_mesh();
        self.data.clear();
        self.authored = false;
        self.lod = ChunkLod::Lod0;
    }

    pub fn mark_authored(&mut self) {
        self.authored = true;
    }

    #[inline]
    pub fn is_authored(&self) -> bool {
        self.authored
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn lod(&self) -> ChunkLod {
        self.lod
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn chunk_pos(&self) -> IVec3 {
        self.data.chunk_pos()
    }

    #[inline]
    pub fn data(&self) -> &ChunkData {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut ChunkData {
        &mut self.data
    }

    #[inline]
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    #[inline]
    pub fn stats(&self) -> &MeshStats {
        &self.stats
    }

    /// Whether this chunk needs a fresh mesh for its current voxels.
    #[inline]
    pub fn needs_mesh(&self) -> bool {
        self.data.is_dirty() || self.state != ChunkState::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component() -> ChunkComponent {
        let mut chunk = ChunkComponent::new(ChunkSize::cube(8));
        chunk.init(IVec3::ZERO, ChunkSize::cube(8));
        chunk
    }

    #[test]
    fn test_init_state_machine() {
        let mut chunk = ChunkComponent::new(ChunkSize::cube(8));
        assert_eq!(chunk.state(), ChunkState::Uninitialized);
        chunk.init(IVec3::new(1, 2, 3), ChunkSize::cube(8));
        assert_eq!(chunk.state(), ChunkState::Generating);
        assert_eq!(chunk.chunk_pos(), IVec3::new(1, 2, 3));
        assert!(!chunk.is_authored());
        chunk.mark_generated();
        assert_eq!(chunk.state(), ChunkState::Generated);
    }

    #[test]
    fn test_busy_while_meshing() {
        let mut chunk = component();
        chunk.mark_generated();
        chunk.begin_meshing(false).expect("first job starts");
        assert!(matches!(chunk.begin_meshing(false), Err(WorldError::Busy)));
        // A forced regeneration supersedes the running job.
        let gen2 = chunk.begin_meshing(true).expect("forced job starts");
        assert_eq!(gen2, 2);
    }

    #[test]
    fn test_stale_result_is_rejected() {
        let mut chunk = component();
        chunk.mark_generated();
        let gen1 = chunk.begin_meshing(false).expect("job 1");
        let gen2 = chunk.begin_meshing(true).expect("job 2");

        // Job 2 completes first and is applied.
        assert!(chunk.apply_mesh(gen2, MeshData::new(), MeshStats::default()));
        assert_eq!(chunk.state(), ChunkState::Ready);

        // Job 1 completes afterwards; its generation is stale.
        assert!(!chunk.apply_mesh(gen1, MeshData::new(), MeshStats::default()));
        assert_eq!(chunk.state(), ChunkState::Ready);
    }

    #[test]
    fn test_result_discarded_after_unload() {
        let mut chunk = component();
        chunk.mark_generated();
        let generation = chunk.begin_meshing(false).expect("job");
        chunk.begin_unload();
        assert!(!chunk.apply_mesh(generation, MeshData::new(), MeshStats::default()));
    }

    #[test]
    fn test_mesh_failed_returns_to_generated() {
        let mut chunk = component();
        chunk.mark_generated();
        let generation = chunk.begin_meshing(false).expect("job");
        chunk.mesh_failed(generation);
        assert_eq!(chunk.state(), ChunkState::Generated);
        assert!(chunk.needs_mesh());
    }

    #[test]
    fn test_batch_length_mismatch_fails_fast() {
        let mut chunk = component();
        let positions = [IVec3::ZERO, IVec3::new(1, 0, 0)];
        let materials = [Material::Stone];
        let result = chunk.set_voxel_batch(&positions, &materials);
        assert!(matches!(
            result,
            Err(WorldError::InvalidInput { positions: 2, materials: 1 })
        ));
        assert_eq!(chunk.get_voxel(0, 0, 0), Material::Air);
    }

    #[test]
    fn test_fill_region_clamps() {
        let mut chunk = component();
        chunk.fill_region(IVec3::new(-5, -5, -5), IVec3::new(2, 2, 50), Material::Dirt);
        assert_eq!(chunk.get_voxel(0, 0, 7), Material::Dirt);
        assert_eq!(chunk.get_voxel(1, 1, 0), Material::Dirt);
        assert_eq!(chunk.get_voxel(2, 0, 0), Material::Air);
        assert_eq!(chunk.data().solid_count(), 2 * 2 * 8);
    }

    #[test]
    fn test_set_lod_unloaded_clears_mesh() {
        let mut chunk = component();
        chunk.mark_generated();
        let generation = chunk.begin_meshing(false).expect("job");
        assert!(chunk.apply_mesh(generation, MeshData::new(), MeshStats::default()));

        let needs_mesh = chunk.set_lod(ChunkLod::Unloaded);
        assert!(!needs_mesh);
        assert_eq!(chunk.state(), ChunkState::Uninitialized);
        assert!(chunk.mesh().is_empty());

        // Raising the LOD again requests a mesh.
        assert!(chunk.set_lod(ChunkLod::Lod1));
    }

    #[test]
    fn test_pool_reset_invariants() {
        let mut chunk = component();
        chunk.set_voxel(1, 1, 1, Material::Stone);
        chunk.mark_authored();
        chunk.reset_for_pool();
        assert_eq!(chunk.state(), ChunkState::Uninitialized);
        assert!(chunk.mesh().is_empty());
        assert!(!chunk.is_authored());
        assert_eq!(chunk.data().solid_count(), 0);
    }
}
