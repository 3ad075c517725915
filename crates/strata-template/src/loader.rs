use glam::IVec3;
use strata_core::{ChunkData, ChunkSize};
use tracing::debug;

use crate::compress;
use crate::error::TemplateError;
use crate::template::WorldTemplate;
use crate::variation;

/// Materialize one chunk's voxels from a template entry.
///
/// Returns `Ok(None)` when the template has no entry at `chunk_pos`; the
/// caller falls back to procedural generation. A stored payload whose size
/// does not match the template's chunk volume is an error, not a fallback.
pub fn load_chunk(
    template: &WorldTemplate,
    chunk_pos: IVec3,
) -> Result<Option<ChunkData>, TemplateError> {
    let Some(entry) = template.entry(chunk_pos) else {
        return Ok(None);
    };

    let size = ChunkSize::cube(template.chunk_size as i32);
    let expected = size.voxel_count();
    if entry.uncompressed_size as usize != expected {
        return Err(TemplateError::SizeMismatch {
            expected,
            actual: entry.uncompressed_size as usize,
        });
    }

    let ids = compress::decompress_voxels(&entry.compressed, expected)?;

    let mut chunk = ChunkData::new(chunk_pos, size);
    let filled = chunk.fill_from_ids(&ids);
    debug_assert!(filled, "payload length was validated above");
    chunk.mark_dirty();

    debug!(?chunk_pos, "loaded chunk from template");
    Ok(Some(chunk))
}

/// Load a chunk and apply the template's seed variations when allowed.
pub fn materialize(
    template: &WorldTemplate,
    chunk_pos: IVec3,
    seed: u64,
) -> Result<Option<ChunkData>, TemplateError> {
    let Some(mut chunk) = load_chunk(template, chunk_pos)? else {
        return Ok(None);
    };
    variation::apply_seed_variation(&mut chunk, template, seed);
    Ok(Some(chunk))
}
