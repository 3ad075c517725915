use serde::{Deserialize, Serialize};

/// Number of distinct materials, including `Air`. Material ids are dense in
/// `0..MATERIAL_COUNT`, which lets callers index per-material tables directly.
pub const MATERIAL_COUNT: usize = 10;

/// One-byte voxel material identifier. Id 0 is reserved for `Air`.
///
/// Two voxels are face-equal when their ids are equal; the transparent set
/// ({Water, Ice}) additionally lets faces of *different* materials show
/// through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Material {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Wood = 4,
    Leaves = 5,
    Sand = 6,
    Water = 7,
    Snow = 8,
    Ice = 9,
}

impl Material {
    /// Numeric id, as stored in packed template bytes.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Decode a packed byte. Unknown ids decode to `Air` rather than failing,
    /// so a truncated material table in old assets degrades to empty space.
    #[inline]
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Material::Grass,
            2 => Material::Dirt,
            3 => Material::Stone,
            4 => Material::Wood,
            5 => Material::Leaves,
            6 => Material::Sand,
            7 => Material::Water,
            8 => Material::Snow,
            9 => Material::Ice,
            _ => Material::Air,
        }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == Material::Air
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self != Material::Air
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        matches!(self, Material::Water | Material::Ice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        for id in 0..MATERIAL_COUNT as u8 {
            assert_eq!(Material::from_id(id).id(), id);
        }
    }

    #[test]
    fn test_unknown_id_decodes_to_air() {
        assert_eq!(Material::from_id(200), Material::Air);
        assert_eq!(Material::from_id(10), Material::Air);
    }

    #[test]
    fn test_predicates() {
        assert!(Material::Air.is_air());
        assert!(!Material::Air.is_solid());
        assert!(Material::Stone.is_solid());
        assert!(Material::Water.is_transparent());
        assert!(Material::Ice.is_transparent());
        assert!(!Material::Stone.is_transparent());
        // Transparent materials still count as solid for face culling.
        assert!(Material::Water.is_solid());
    }
}
