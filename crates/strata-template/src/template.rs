use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use strata_core::constants::VOXEL_SIZE;

use crate::compress;

/// A named world position that seed variation must not disturb.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: String,
    pub world_pos: Vec3,
    pub protection_radius: f32,
    pub description: String,
    /// Optional identifier of something the host should spawn here.
    pub spawnable: Option<String>,
}

/// Seed-variation tuning knobs stored alongside the template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariationParams {
    pub grass_variation: f32,
    pub flower_density: f32,
    pub tree_variation: f32,
    pub terrain_noise_scale: f32,
    pub terrain_noise_height: f32,
    pub allow_path_variation: bool,
    pub allow_water_variation: bool,
}

impl Default for VariationParams {
    fn default() -> Self {
        Self {
            grass_variation: 0.3,
            flower_density: 0.2,
            tree_variation: 0.4,
            terrain_noise_scale: 10.0,
            terrain_noise_height: 25.0,
            allow_path_variation: false,
            allow_water_variation: false,
        }
    }
}

/// One chunk's packed voxels inside a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateChunk {
    pub chunk_pos: IVec3,
    pub uncompressed_size: u32,
    pub compressed: Vec<u8>,
}

/// A packaged hand-authored world: metadata, compressed chunk payloads,
/// protected landmarks, and variation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldTemplate {
    pub name: String,
    pub description: String,
    /// Creation time as seconds since the Unix epoch.
    pub created_at: u64,
    pub creator: String,
    /// Cube edge length in voxels of every stored chunk.
    pub chunk_size: u32,
    pub min_chunk: IVec3,
    pub max_chunk: IVec3,
    pub chunks: Vec<TemplateChunk>,
    pub landmarks: Vec<Landmark>,
    pub variation: VariationParams,
    pub allow_seed_variations: bool,
}

impl WorldTemplate {
    pub fn new(name: impl Into<String>, chunk_size: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            created_at: 0,
            creator: String::new(),
            chunk_size,
            min_chunk: IVec3::ZERO,
            max_chunk: IVec3::ZERO,
            chunks: Vec::new(),
            landmarks: Vec::new(),
            variation: VariationParams::default(),
            allow_seed_variations: true,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn has_chunk(&self, chunk_pos: IVec3) -> bool {
        self.entry(chunk_pos).is_some()
    }

    pub fn entry(&self, chunk_pos: IVec3) -> Option<&TemplateChunk> {
        self.chunks.iter().find(|c| c.chunk_pos == chunk_pos)
    }

    /// Compress and store a chunk's packed voxel bytes, replacing any
    /// existing entry at the same position and widening the chunk bounds.
    pub fn insert_chunk(&mut self, chunk_pos: IVec3, voxel_ids: &[u8]) {
        let record = TemplateChunk {
            chunk_pos,
            uncompressed_size: voxel_ids.len() as u32,
            compressed: compress::compress_voxels(voxel_ids),
        };

        if let Some(existing) = self.chunks.iter_mut().find(|c| c.chunk_pos == chunk_pos) {
            *existing = record;
        } else {
            if self.chunks.is_empty() {
                self.min_chunk = chunk_pos;
                self.max_chunk = chunk_pos;
            } else {
                self.min_chunk = self.min_chunk.min(chunk_pos);
                self.max_chunk = self.max_chunk.max(chunk_pos);
            }
            self.chunks.push(record);
        }
    }

    /// Extent of the authored region in world units.
    pub fn world_size(&self) -> Vec3 {
        if self.chunks.is_empty() {
            return Vec3::ZERO;
        }
        let span = self.max_chunk - self.min_chunk + IVec3::ONE;
        span.as_vec3() * self.chunk_size as f32 * VOXEL_SIZE
    }

    pub fn landmarks_in_radius(&self, world_pos: Vec3, radius: f32) -> Vec<&Landmark> {
        let radius_sq = radius * radius;
        self.landmarks
            .iter()
            .filter(|l| l.world_pos.distance_squared(world_pos) <= radius_sq)
            .collect()
    }

    pub fn is_position_protected(&self, world_pos: Vec3) -> bool {
        self.landmarks.iter().any(|l| {
            l.world_pos.distance_squared(world_pos) <= l.protection_radius * l.protection_radius
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut template = WorldTemplate::new("garden", 16);
        assert!(!template.has_chunk(IVec3::ZERO));

        let ids = vec![1u8; 16 * 16 * 16];
        template.insert_chunk(IVec3::ZERO, &ids);
        template.insert_chunk(IVec3::new(2, -1, 0), &ids);

        assert!(template.has_chunk(IVec3::ZERO));
        assert!(template.has_chunk(IVec3::new(2, -1, 0)));
        assert!(!template.has_chunk(IVec3::new(1, 0, 0)));
        assert_eq!(template.chunk_count(), 2);
        assert_eq!(template.min_chunk, IVec3::new(0, -1, 0));
        assert_eq!(template.max_chunk, IVec3::new(2, 0, 0));
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let mut template = WorldTemplate::new("garden", 16);
        let a = vec![1u8; 4096];
        let b = vec![2u8; 4096];
        template.insert_chunk(IVec3::ZERO, &a);
        template.insert_chunk(IVec3::ZERO, &b);
        assert_eq!(template.chunk_count(), 1);

        let entry = template.entry(IVec3::ZERO).expect("entry");
        let bytes = compress::decompress_voxels(&entry.compressed, 4096).expect("decompress");
        assert_eq!(bytes[0], 2);
    }

    #[test]
    fn test_world_size() {
        let mut template = WorldTemplate::new("garden", 32);
        assert_eq!(template.world_size(), Vec3::ZERO);

        let ids = vec![0u8; 32 * 32 * 32];
        template.insert_chunk(IVec3::ZERO, &ids);
        template.insert_chunk(IVec3::new(1, 0, 0), &ids);
        // Two chunks wide, one deep/tall: 1600 x 800 x 800 units.
        assert_eq!(template.world_size(), Vec3::new(1600.0, 800.0, 800.0));
    }

    #[test]
    fn test_landmark_protection() {
        let mut template = WorldTemplate::new("garden", 32);
        template.landmarks.push(Landmark {
            name: "well".into(),
            world_pos: Vec3::new(100.0, 100.0, 0.0),
            protection_radius: 50.0,
            description: String::new(),
            spawnable: None,
        });

        assert!(template.is_position_protected(Vec3::new(120.0, 100.0, 0.0)));
        assert!(!template.is_position_protected(Vec3::new(200.0, 100.0, 0.0)));
        assert_eq!(
            template
                .landmarks_in_radius(Vec3::new(150.0, 100.0, 0.0), 60.0)
                .len(),
            1
        );
        assert!(template
            .landmarks_in_radius(Vec3::new(500.0, 0.0, 0.0), 60.0)
            .is_empty());
    }
}
