//! Binary template asset format.
//!
//! Layout: fixed header, then the three metadata strings, then landmark
//! records, then the chunk table, then the LZ4 data blocks the table points
//! at. All integers are little-endian; strings are u32-length-prefixed
//! UTF-8.

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};

use crate::error::TemplateError;
use crate::template::{Landmark, TemplateChunk, VariationParams, WorldTemplate};

/// Magic bytes identifying a strata template asset.
pub const MAGIC: [u8; 4] = *b"STRA";

/// Current template format version.
pub const FORMAT_VERSION: u16 = 1;

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = std::mem::size_of::<TemplateHeader>();

/// Bytes per chunk table entry: position (12) + uncompressed size (4) +
/// data offset (8) + compressed size (4).
pub const CHUNK_TABLE_ENTRY_SIZE: usize = 28;

const FLAG_SEED_VARIATIONS: u32 = 1 << 0;
const VAR_FLAG_PATH: u32 = 1 << 0;
const VAR_FLAG_WATER: u32 = 1 << 1;

/// Fixed-size template header, repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TemplateHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub _pad0: u16,
    pub created_at: u64,
    pub chunk_size: u32,
    pub chunk_count: u32,
    pub landmark_count: u32,
    pub flags: u32,
    pub min_chunk: [i32; 3],
    pub max_chunk: [i32; 3],
    pub grass_variation: f32,
    pub flower_density: f32,
    pub tree_variation: f32,
    pub terrain_noise_scale: f32,
    pub terrain_noise_height: f32,
    pub var_flags: u32,
}

/// Serialize a template into its binary asset form.
pub fn encode(template: &WorldTemplate) -> Vec<u8> {
    let mut strings = Vec::new();
    write_string(&mut strings, &template.name);
    write_string(&mut strings, &template.description);
    write_string(&mut strings, &template.creator);

    let mut landmarks = Vec::new();
    for landmark in &template.landmarks {
        write_string(&mut landmarks, &landmark.name);
        for value in [
            landmark.world_pos.x,
            landmark.world_pos.y,
            landmark.world_pos.z,
            landmark.protection_radius,
        ] {
            landmarks.extend_from_slice(&value.to_le_bytes());
        }
        write_string(&mut landmarks, &landmark.description);
        match &landmark.spawnable {
            Some(spawnable) => {
                landmarks.push(1);
                write_string(&mut landmarks, spawnable);
            }
            None => landmarks.push(0),
        }
    }

    let table_size = template.chunks.len() * CHUNK_TABLE_ENTRY_SIZE;
    let data_start = HEADER_SIZE + strings.len() + landmarks.len() + table_size;

    let mut flags = 0;
    if template.allow_seed_variations {
        flags |= FLAG_SEED_VARIATIONS;
    }
    let mut var_flags = 0;
    if template.variation.allow_path_variation {
        var_flags |= VAR_FLAG_PATH;
    }
    if template.variation.allow_water_variation {
        var_flags |= VAR_FLAG_WATER;
    }

    let header = TemplateHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        _pad0: 0,
        created_at: template.created_at,
        chunk_size: template.chunk_size,
        chunk_count: template.chunks.len() as u32,
        landmark_count: template.landmarks.len() as u32,
        flags,
        min_chunk: template.min_chunk.to_array(),
        max_chunk: template.max_chunk.to_array(),
        grass_variation: template.variation.grass_variation,
        flower_density: template.variation.flower_density,
        tree_variation: template.variation.tree_variation,
        terrain_noise_scale: template.variation.terrain_noise_scale,
        terrain_noise_height: template.variation.terrain_noise_height,
        var_flags,
    };

    let total_data: usize = template.chunks.iter().map(|c| c.compressed.len()).sum();
    let mut output = Vec::with_capacity(data_start + total_data);
    output.extend_from_slice(bytemuck::bytes_of(&header));
    output.extend_from_slice(&strings);
    output.extend_from_slice(&landmarks);

    let mut offset = data_start as u64;
    for chunk in &template.chunks {
        for value in chunk.chunk_pos.to_array() {
            output.extend_from_slice(&value.to_le_bytes());
        }
        output.extend_from_slice(&chunk.uncompressed_size.to_le_bytes());
        output.extend_from_slice(&offset.to_le_bytes());
        output.extend_from_slice(&(chunk.compressed.len() as u32).to_le_bytes());
        offset += chunk.compressed.len() as u64;
    }

    for chunk in &template.chunks {
        output.extend_from_slice(&chunk.compressed);
    }

    output
}

/// Parse a binary template asset.
pub fn decode(bytes: &[u8]) -> Result<WorldTemplate, TemplateError> {
    if bytes.len() < HEADER_SIZE {
        return Err(TemplateError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let header: TemplateHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    if header.magic != MAGIC {
        return Err(TemplateError::InvalidMagic);
    }
    if header.version != FORMAT_VERSION {
        return Err(TemplateError::UnsupportedVersion(header.version));
    }

    let mut reader = Reader {
        bytes,
        offset: HEADER_SIZE,
    };

    let name = reader.read_string()?;
    let description = reader.read_string()?;
    let creator = reader.read_string()?;

    let mut landmarks = Vec::with_capacity(header.landmark_count as usize);
    for _ in 0..header.landmark_count {
        let name = reader.read_string()?;
        let x = reader.read_f32()?;
        let y = reader.read_f32()?;
        let z = reader.read_f32()?;
        let protection_radius = reader.read_f32()?;
        let description = reader.read_string()?;
        let spawnable = if reader.read_u8()? != 0 {
            Some(reader.read_string()?)
        } else {
            None
        };
        landmarks.push(Landmark {
            name,
            world_pos: Vec3::new(x, y, z),
            protection_radius,
            description,
            spawnable,
        });
    }

    let mut chunks = Vec::with_capacity(header.chunk_count as usize);
    for _ in 0..header.chunk_count {
        let px = reader.read_i32()?;
        let py = reader.read_i32()?;
        let pz = reader.read_i32()?;
        let uncompressed_size = reader.read_u32()?;
        let data_offset = reader.read_u64()? as usize;
        let compressed_size = reader.read_u32()? as usize;

        let end = data_offset
            .checked_add(compressed_size)
            .ok_or(TemplateError::Truncated {
                expected: usize::MAX,
                actual: bytes.len(),
            })?;
        if end > bytes.len() {
            return Err(TemplateError::Truncated {
                expected: end,
                actual: bytes.len(),
            });
        }

        chunks.push(TemplateChunk {
            chunk_pos: IVec3::new(px, py, pz),
            uncompressed_size,
            compressed: bytes[data_offset..end].to_vec(),
        });
    }

    Ok(WorldTemplate {
        name,
        description,
        created_at: header.created_at,
        creator,
        chunk_size: header.chunk_size,
        min_chunk: IVec3::from_array(header.min_chunk),
        max_chunk: IVec3::from_array(header.max_chunk),
        chunks,
        landmarks,
        variation: VariationParams {
            grass_variation: header.grass_variation,
            flower_density: header.flower_density,
            tree_variation: header.tree_variation,
            terrain_noise_scale: header.terrain_noise_scale,
            terrain_noise_height: header.terrain_noise_height,
            allow_path_variation: header.var_flags & VAR_FLAG_PATH != 0,
            allow_water_variation: header.var_flags & VAR_FLAG_WATER != 0,
        },
        allow_seed_variations: header.flags & FLAG_SEED_VARIATIONS != 0,
    })
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], TemplateError> {
        let end = self.offset.checked_add(n).ok_or(TemplateError::Truncated {
            expected: usize::MAX,
            actual: self.bytes.len(),
        })?;
        if end > self.bytes.len() {
            return Err(TemplateError::Truncated {
                expected: end,
                actual: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, TemplateError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, TemplateError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_i32(&mut self) -> Result<i32, TemplateError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_u64(&mut self) -> Result<u64, TemplateError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
    }

    fn read_f32(&mut self) -> Result<f32, TemplateError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_string(&mut self) -> Result<String, TemplateError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| TemplateError::InvalidString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> WorldTemplate {
        let mut template = WorldTemplate::new("meadow", 16);
        template.description = "rolling meadow with a well".into();
        template.creator = "worldsmith".into();
        template.created_at = 1_700_000_000;
        template.allow_seed_variations = true;
        template.variation.flower_density = 0.5;
        template.variation.allow_water_variation = true;

        let mut ids = vec![0u8; 16 * 16 * 16];
        ids[0] = 1;
        ids[4095] = 3;
        template.insert_chunk(IVec3::new(-1, 0, 0), &ids);
        template.insert_chunk(IVec3::new(0, 0, 0), &vec![2u8; 4096]);

        template.landmarks.push(Landmark {
            name: "old well".into(),
            world_pos: Vec3::new(120.0, 40.0, 0.0),
            protection_radius: 300.0,
            description: "stone well at the meadow center".into(),
            spawnable: Some("npc_keeper".into()),
        });
        template.landmarks.push(Landmark {
            name: "oak".into(),
            world_pos: Vec3::new(-200.0, 0.0, 0.0),
            protection_radius: 100.0,
            description: String::new(),
            spawnable: None,
        });
        template
    }

    #[test]
    fn test_header_size_is_stable() {
        assert_eq!(HEADER_SIZE, 80);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let template = sample_template();
        let bytes = encode(&template);
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(decoded, template);
    }

    #[test]
    fn test_empty_template_roundtrip() {
        let template = WorldTemplate::new("empty", 32);
        let decoded = decode(&encode(&template)).expect("decode");
        assert_eq!(decoded, template);
        assert_eq!(decoded.chunk_count(), 0);
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut bytes = encode(&sample_template());
        bytes[0..4].copy_from_slice(b"NOPE");
        assert!(matches!(decode(&bytes), Err(TemplateError::InvalidMagic)));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut bytes = encode(&sample_template());
        bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(TemplateError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let bytes = encode(&sample_template());
        for cut in [10, HEADER_SIZE + 3, bytes.len() - 1] {
            assert!(
                matches!(decode(&bytes[..cut]), Err(TemplateError::Truncated { .. })),
                "cut at {cut} should fail"
            );
        }
    }

    #[test]
    fn test_decoded_chunks_decompress() {
        let template = sample_template();
        let decoded = decode(&encode(&template)).expect("decode");
        let entry = decoded.entry(IVec3::new(-1, 0, 0)).expect("entry");
        let bytes = crate::compress::decompress_voxels(&entry.compressed, 4096).expect("payload");
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[4095], 3);
    }
}
