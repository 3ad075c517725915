use crate::constants::{
    LOD0_MAX_DISTANCE, LOD1_MAX_DISTANCE, LOD2_MAX_DISTANCE, LOD3_MAX_DISTANCE,
};

/// Level of detail for one chunk. `Lod0` is full-detail greedy meshing;
/// `Lod1`/`Lod2` are basic meshes over down-sampled volumes; `Lod3` is a
/// billboard sentinel resolved by the host; `Unloaded` keeps the chunk but
/// clears its mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkLod {
    Unloaded,
    Lod0,
    Lod1,
    Lod2,
    Lod3,
}

impl ChunkLod {
    /// Down-sampling factor applied to the voxel volume before meshing.
    pub fn scale_factor(self) -> i32 {
        match self {
            ChunkLod::Lod0 => 1,
            ChunkLod::Lod1 => 2,
            ChunkLod::Lod2 => 4,
            ChunkLod::Lod3 | ChunkLod::Unloaded => 1,
        }
    }
}

/// Distance-band LOD selection. Distances are in world units.
pub fn lod_for_distance(distance: f32) -> ChunkLod {
    if distance < LOD0_MAX_DISTANCE {
        ChunkLod::Lod0
    } else if distance < LOD1_MAX_DISTANCE {
        ChunkLod::Lod1
    } else if distance < LOD2_MAX_DISTANCE {
        ChunkLod::Lod2
    } else if distance < LOD3_MAX_DISTANCE {
        ChunkLod::Lod3
    } else {
        ChunkLod::Unloaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lod_bands() {
        assert_eq!(lod_for_distance(0.0), ChunkLod::Lod0);
        assert_eq!(lod_for_distance(4_999.0), ChunkLod::Lod0);
        assert_eq!(lod_for_distance(5_000.0), ChunkLod::Lod1);
        assert_eq!(lod_for_distance(10_000.0), ChunkLod::Lod2);
        assert_eq!(lod_for_distance(20_000.0), ChunkLod::Lod3);
        assert_eq!(lod_for_distance(30_000.0), ChunkLod::Unloaded);
        assert_eq!(lod_for_distance(1e9), ChunkLod::Unloaded);
    }
}
