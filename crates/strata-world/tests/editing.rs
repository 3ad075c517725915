//! Voxel editing scenarios: neighbour regeneration, bulk edits, authored
//! chunk protection.

use glam::{IVec3, Vec3};
use strata_core::{ChunkData, ChunkSize, Material};
use strata_world::{ChunkState, VoxelWorld, WorldConfig};

fn editing_config() -> WorldConfig {
    WorldConfig {
        chunk_size: 32,
        chunk_pool_size: 16,
        use_multithreading: false,
        // Chunks start empty; tests author their own content.
        disable_dynamic_generation: true,
        ..WorldConfig::default()
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

/// Create a chunk at `pos` filled uniformly with `material` and mesh it.
fn ready_solid_chunk(world: &mut VoxelWorld, pos: IVec3, material: Material) {
    world.get_or_create_chunk(pos).expect("create");
    let chunk = world.chunk_at_mut(pos).expect("chunk");
    chunk.data_mut().fill_with(|_, _, _| material);
    world.regenerate_chunk(pos, 0);
    pump(world);
    assert_eq!(world.chunk_at(pos).expect("chunk").state(), ChunkState::Ready);
}

#[test]
fn test_boundary_edit_regenerates_both_neighbours() {
    let mut world = VoxelWorld::new(editing_config());
    let a = IVec3::new(0, 0, 0);
    let b = IVec3::new(1, 0, 0);
    ready_solid_chunk(&mut world, a, Material::Stone);
    ready_solid_chunk(&mut world, b, Material::Stone);

    let gen_a = world.chunk_at(a).expect("a").generation();
    let gen_b = world.chunk_at(b).expect("b").generation();
    let tris_a = world.chunk_at(a).expect("a").mesh().triangle_count();

    // World position of A's local voxel (31, 0, 0): on the face shared
    // with B.
    let edit = Vec3::new(31.5 * 25.0, 0.5 * 25.0, 0.5 * 25.0);
    world.set_voxel(edit, Material::Air).expect("edit");
    assert_eq!(world.get_voxel(edit), Material::Air);
    pump(&mut world);

    let chunk_a = world.chunk_at(a).expect("a");
    let chunk_b = world.chunk_at(b).expect("b");
    assert!(chunk_a.generation() > gen_a, "A must regenerate");
    assert!(chunk_b.generation() > gen_b, "B must regenerate");
    assert_eq!(chunk_a.state(), ChunkState::Ready);
    assert_eq!(chunk_b.state(), ChunkState::Ready);

    // Carving the corner voxel exposes interior faces, so A's mesh grows.
    assert!(chunk_a.mesh().triangle_count() > tris_a);
}

#[test]
fn test_interior_edit_leaves_neighbours_alone() {
    let mut world = VoxelWorld::new(editing_config());
    let a = IVec3::new(0, 0, 0);
    let b = IVec3::new(1, 0, 0);
    ready_solid_chunk(&mut world, a, Material::Stone);
    ready_solid_chunk(&mut world, b, Material::Stone);

    let gen_b = world.chunk_at(b).expect("b").generation();

    let edit = Vec3::new(15.5 * 25.0, 15.5 * 25.0, 15.5 * 25.0);
    world.set_voxel(edit, Material::Air).expect("edit");
    pump(&mut world);

    assert_eq!(
        world.chunk_at(b).expect("b").generation(),
        gen_b,
        "interior edits must not touch neighbours"
    );
}

#[test]
fn test_sphere_edit_spans_chunks_and_dedupes_regeneration() {
    let mut world = VoxelWorld::new(editing_config());
    let a = IVec3::new(0, 0, 0);
    let b = IVec3::new(1, 0, 0);
    ready_solid_chunk(&mut world, a, Material::Stone);
    ready_solid_chunk(&mut world, b, Material::Stone);

    let gen_a = world.chunk_at(a).expect("a").generation();
    let gen_b = world.chunk_at(b).expect("b").generation();

    // Sphere centred on the shared face, reaching into both chunks.
    let center = Vec3::new(32.0 * 25.0, 8.0 * 25.0, 8.0 * 25.0);
    world.set_voxel_sphere(center, 3.0 * 25.0, Material::Air);
    pump(&mut world);

    // Air was carved on both sides of the boundary.
    assert_eq!(
        world.get_voxel(center - Vec3::new(25.0, 0.0, 0.0)),
        Material::Air
    );
    assert_eq!(
        world.get_voxel(center + Vec3::new(25.0, 0.0, 0.0)),
        Material::Air
    );

    // Each chunk regenerated exactly once: one dispatch per chunk.
    assert_eq!(world.chunk_at(a).expect("a").generation(), gen_a + 1);
    assert_eq!(world.chunk_at(b).expect("b").generation(), gen_b + 1);
}

#[test]
fn test_box_edit_fills_exact_extent() {
    let mut world = VoxelWorld::new(editing_config());
    ready_solid_chunk(&mut world, IVec3::ZERO, Material::Air);

    world.set_voxel_box(
        Vec3::new(2.0 * 25.0, 2.0 * 25.0, 2.0 * 25.0),
        Vec3::new(4.0 * 25.0, 4.0 * 25.0, 4.0 * 25.0),
        Material::Stone,
    );
    pump(&mut world);

    let chunk = world.chunk_at(IVec3::ZERO).expect("chunk");
    // Voxels 2..=4 per axis were filled.
    assert_eq!(chunk.data().solid_count(), 27);
    assert_eq!(chunk.data().get(3, 3, 3), Material::Stone);
    assert_eq!(chunk.data().get(1, 3, 3), Material::Air);
    assert_eq!(chunk.data().get(5, 3, 3), Material::Air);
}

#[test]
fn test_authored_chunks_survive_streaming_without_refill() {
    let mut world = VoxelWorld::new(WorldConfig {
        // Procedural generation on, so an unauthored chunk here would be
        // refilled with terrain.
        disable_dynamic_generation: false,
        preserve_editor_chunks: true,
        chunk_size: 16,
        view_distance_chunks: 1,
        use_multithreading: false,
        ..WorldConfig::default()
    });

    // Adopt an all-air editor chunk at the origin.
    let empty = ChunkData::new(IVec3::ZERO, ChunkSize::cube(16));
    world.adopt_chunk(empty).expect("adopt");
    assert!(world.chunk_at(IVec3::ZERO).expect("chunk").is_authored());

    // Streaming over the area must not refill the authored chunk, even
    // though all its voxels are air.
    world.stream_chunks(Vec3::splat(200.0));
    let chunk = world.chunk_at(IVec3::ZERO).expect("chunk");
    assert!(chunk.is_authored());
    assert_eq!(chunk.data().solid_count(), 0, "authored chunk was refilled");

    // A non-adopted neighbour does get procedural terrain.
    let neighbour = world.chunk_at(IVec3::new(1, 0, 0)).expect("neighbour");
    assert!(!neighbour.is_authored());
    assert!(neighbour.data().solid_count() > 0);
}
