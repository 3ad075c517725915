//! Quad-to-mesh conversion: corner placement, winding, UVs, tangents,
//! vertex welding, and material sectioning.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use strata_core::constants::WELD_QUANTIZE_SCALE;
use strata_core::Material;

use crate::error::MeshError;
use crate::face::Face;
use crate::mesh_data::{MaterialSection, MeshData};
use crate::quad::GreedyQuad;

/// Welding key: quantized position (0.01 world-unit granularity) plus the
/// face direction. Keying on the face keeps vertices with distinct normals
/// separate where two faces share a corner position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    x: i32,
    y: i32,
    z: i32,
    face: u8,
}

impl VertexKey {
    #[inline]
    fn new(pos: Vec3, face: Face) -> Self {
        Self {
            x: (pos.x * WELD_QUANTIZE_SCALE).round() as i32,
            y: (pos.y * WELD_QUANTIZE_SCALE).round() as i32,
            z: (pos.z * WELD_QUANTIZE_SCALE).round() as i32,
            face: face as u8,
        }
    }
}

/// Result of a conversion: the mesh plus welding statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertStats {
    pub corner_count: u32,
    pub welded_vertex_count: u32,
    /// Fraction of corners that reused an existing vertex.
    pub weld_efficiency: f32,
}

/// Four corner positions of a quad, in emission order `c0..c3`.
///
/// `e` is the voxel edge length, `w`/`h` the quad's u/v extents in world
/// units. The plane offset along the primary axis is always one voxel edge
/// for positive faces and zero for negative faces, regardless of quad size.
fn corner_positions(quad: &GreedyQuad, e: f32) -> [Vec3; 4] {
    let base = quad.base.as_vec3() * e;
    let w = quad.size_uv.0 as f32 * e;
    let h = quad.size_uv.1 as f32 * e;

    let offsets = match quad.face {
        // +Y: u spans X, v spans Z, face plane at y = e.
        Face::Front => [
            Vec3::new(0.0, e, 0.0),
            Vec3::new(w, e, 0.0),
            Vec3::new(w, e, h),
            Vec3::new(0.0, e, h),
        ],
        // -Y: plane at y = 0, circulation mirrored to stay outward-facing.
        Face::Back => [
            Vec3::new(w, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, h),
            Vec3::new(w, 0.0, h),
        ],
        // +X: u spans Y, v spans Z, plane at x = e.
        Face::Right => [
            Vec3::new(e, w, 0.0),
            Vec3::new(e, 0.0, 0.0),
            Vec3::new(e, 0.0, h),
            Vec3::new(e, w, h),
        ],
        // -X: plane at x = 0.
        Face::Left => [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, w, 0.0),
            Vec3::new(0.0, w, h),
            Vec3::new(0.0, 0.0, h),
        ],
        // +Z: u spans X, v spans Y, plane at z = e.
        Face::Top => [
            Vec3::new(0.0, 0.0, e),
            Vec3::new(w, 0.0, e),
            Vec3::new(w, h, e),
            Vec3::new(0.0, h, e),
        ],
        // -Z: plane at z = 0.
        Face::Bottom => [
            Vec3::new(0.0, h, 0.0),
            Vec3::new(w, h, 0.0),
            Vec3::new(w, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ],
    };

    [
        base + offsets[0],
        base + offsets[1],
        base + offsets[2],
        base + offsets[3],
    ]
}

/// Tiling UV: project the position onto the face's (u, v) plane in voxel
/// units and keep the fractional part, so texture coordinates stay
/// continuous across merged quads.
#[inline]
fn tiling_uv(pos: Vec3, face: Face, e: f32) -> Vec2 {
    let (_, u_axis, v_axis) = face.axes();
    Vec2::new(
        (pos[u_axis] / e).rem_euclid(1.0),
        (pos[v_axis] / e).rem_euclid(1.0),
    )
}

/// Convert a quad stream into welded, sectioned mesh buffers.
///
/// Vertices are appended in quad order; indices are grouped per material
/// section in first-seen order. The mesh is validated before it is returned;
/// a validation failure discards the whole mesh.
pub fn convert_quads(
    quads: &[GreedyQuad],
    voxel_size: f32,
    max_chunk_extent: i32,
) -> Result<(MeshData, ConvertStats), MeshError> {
    let mut mesh = MeshData::new();
    mesh.reserve(quads.len() * 2, quads.len() * 6);

    let mut vertex_map: HashMap<VertexKey, u32> = HashMap::with_capacity(quads.len() * 2);
    let mut section_ids: HashMap<Material, usize> = HashMap::new();
    let mut section_order: Vec<Material> = Vec::new();
    let mut section_indices: Vec<Vec<u32>> = Vec::new();
    let mut reused_corners = 0u32;

    for quad in quads {
        let corners = corner_positions(quad, voxel_size);
        let normal = quad.face.normal();
        // Tangent follows the u axis; c0 -> c1 is the u edge on every face.
        let tangent = (corners[1] - corners[0]).normalize();

        let mut quad_indices = [0u32; 4];
        for (i, corner) in corners.iter().enumerate() {
            let key = VertexKey::new(*corner, quad.face);
            if let Some(&existing) = vertex_map.get(&key) {
                quad_indices[i] = existing;
                reused_corners += 1;
            } else {
                let index = mesh.positions.len() as u32;
                mesh.positions.push(*corner);
                mesh.normals.push(normal);
                mesh.uvs.push(tiling_uv(*corner, quad.face, voxel_size));
                mesh.tangents.push(tangent);
                mesh.colors.push([255, 255, 255, 255]);
                vertex_map.insert(key, index);
                quad_indices[i] = index;
            }
        }

        let section = *section_ids.entry(quad.material).or_insert_with(|| {
            section_order.push(quad.material);
            section_indices.push(Vec::new());
            section_order.len() - 1
        });

        let [i0, i1, i2, i3] = quad_indices;
        let indices = &mut section_indices[section];
        if quad.face == Face::Top {
            // Top faces are authored in the opposite circulation; inverse
            // winding keeps them outward-facing.
            indices.extend([i0, i3, i1, i1, i3, i2]);
        } else {
            indices.extend([i0, i1, i2, i0, i2, i3]);
        }
    }

    // Flatten per-section index lists, recording contiguous ranges.
    for (section_id, (material, indices)) in
        section_order.iter().zip(section_indices.iter()).enumerate()
    {
        let first_index = mesh.indices.len() as u32;
        mesh.indices.extend_from_slice(indices);
        mesh.sections.push(MaterialSection {
            material: *material,
            section_id: section_id as u32,
            first_index,
            index_count: indices.len() as u32,
        });
    }

    let coordinate_limit = 2.0 * max_chunk_extent as f32 * voxel_size;
    mesh.validate(coordinate_limit)?;

    let corner_count = quads.len() as u32 * 4;
    let stats = ConvertStats {
        corner_count,
        welded_vertex_count: mesh.vertex_count() as u32,
        weld_efficiency: if corner_count == 0 {
            0.0
        } else {
            reused_corners as f32 / corner_count as f32
        },
    };

    Ok((mesh, stats))
}
