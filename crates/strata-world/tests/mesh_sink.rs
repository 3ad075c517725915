//! The world-to-host handoff: completed meshes arrive through the sink
//! with valid buffers, material sections, and world-space bounds.

use std::sync::{Arc, Mutex};

use glam::{IVec3, Vec3};
use strata_core::Material;
use strata_world::{ChunkMeshRecord, MeshSink, VoxelWorld, WorldConfig};

#[derive(Default)]
struct RecordingSink {
    applied: Arc<Mutex<Vec<ChunkMeshRecord>>>,
    cleared: Arc<Mutex<Vec<u32>>>,
}

impl MeshSink for RecordingSink {
    fn apply_chunk_mesh(&mut self, record: ChunkMeshRecord) {
        self.applied.lock().expect("lock").push(record);
    }

    fn clear_chunk_mesh(&mut self, chunk_id: u32) {
        self.cleared.lock().expect("lock").push(chunk_id);
    }
}

fn pump(world: &mut VoxelWorld) {
    for _ in 0..100_000 {
        world.process_mesh_tasks();
        world.drain_mesh_results();
        if world.pending_task_count() == 0 && world.in_flight_count() == 0 {
            return;
        }
    }
    panic!("world did not quiesce");
}

#[test]
fn test_completed_meshes_reach_the_sink() {
    let applied = Arc::new(Mutex::new(Vec::new()));
    let cleared = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink {
        applied: applied.clone(),
        cleared: cleared.clone(),
    };

    let mut world = VoxelWorld::with_sink(
        WorldConfig {
            chunk_size: 16,
            chunk_pool_size: 8,
            use_multithreading: false,
            ..WorldConfig::default()
        },
        Box::new(sink),
    );

    let slot = world.get_or_create_chunk(IVec3::ZERO).expect("create");
    pump(&mut world);

    let records = applied.lock().expect("lock");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.chunk_id, slot);
    assert_eq!(record.chunk_pos, IVec3::ZERO);

    // Buffer invariants from the host's point of view.
    let mesh = &record.mesh;
    assert!(!mesh.is_empty());
    assert_eq!(mesh.indices.len() % 3, 0);
    assert_eq!(mesh.positions.len(), mesh.normals.len());
    assert_eq!(mesh.positions.len(), mesh.uvs.len());
    assert_eq!(mesh.positions.len(), mesh.tangents.len());
    assert_eq!(mesh.positions.len(), mesh.colors.len());
    for &index in &mesh.indices {
        assert!((index as usize) < mesh.positions.len());
    }

    // Procedural hills produce stone, dirt, and grass sections.
    let materials: Vec<Material> = mesh.sections.iter().map(|s| s.material).collect();
    assert!(materials.contains(&Material::Grass));
    assert!(materials.contains(&Material::Stone));

    // Bounds sit inside the chunk's world-space box.
    let (min, max) = record.bounds;
    assert!(min.cmpge(Vec3::ZERO).all());
    assert!(max.cmple(Vec3::splat(16.0 * 25.0)).all());
    assert!(min.cmple(max).all());
}

#[test]
fn test_unload_clears_the_sink_entry() {
    let applied = Arc::new(Mutex::new(Vec::new()));
    let cleared = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink {
        applied: applied.clone(),
        cleared: cleared.clone(),
    };

    let mut world = VoxelWorld::with_sink(
        WorldConfig {
            chunk_size: 16,
            chunk_pool_size: 8,
            use_multithreading: false,
            ..WorldConfig::default()
        },
        Box::new(sink),
    );

    let slot = world.get_or_create_chunk(IVec3::ZERO).expect("create");
    pump(&mut world);
    world.unload_chunk(IVec3::ZERO);

    assert_eq!(cleared.lock().expect("lock").as_slice(), &[slot]);
    assert_eq!(world.active_chunk_count(), 0);
}
