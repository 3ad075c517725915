use crate::error::TemplateError;

/// Compress a packed voxel payload with LZ4, prepending the uncompressed
/// size so decompression can allocate up front.
pub fn compress_voxels(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress an LZ4 block and validate it against the expected voxel count.
pub fn decompress_voxels(compressed: &[u8], expected_size: usize) -> Result<Vec<u8>, TemplateError> {
    let decompressed = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| TemplateError::DecompressError(e.to_string()))?;

    if decompressed.len() != expected_size {
        return Err(TemplateError::SizeMismatch {
            expected: expected_size,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let data: Vec<u8> = (0..32 * 32 * 32).map(|i| (i % 7) as u8).collect();
        let compressed = compress_voxels(&data);
        let decompressed = decompress_voxels(&compressed, data.len()).expect("decompress");
        assert_eq!(data, decompressed);
    }

    #[test]
    fn test_uniform_payload_compresses_well() {
        let data = vec![3u8; 32 * 32 * 32];
        let compressed = compress_voxels(&data);
        assert!(compressed.len() < data.len() / 10);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let data = vec![0u8; 64];
        let compressed = compress_voxels(&data);
        let result = decompress_voxels(&compressed, 65);
        assert!(matches!(
            result,
            Err(TemplateError::SizeMismatch { expected: 65, actual: 64 })
        ));
    }

    #[test]
    fn test_garbage_input_rejected() {
        let result = decompress_voxels(&[0xFF, 0xFF, 0xFF, 0xFF, 1, 2, 3], 4096);
        assert!(matches!(result, Err(TemplateError::DecompressError(_))));
    }
}
