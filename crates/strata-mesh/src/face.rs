use glam::{IVec3, Vec3};

/// One of the six axis-aligned voxel faces.
///
/// Naming follows the host convention: the world is right-handed with Z up,
/// so `Front` looks along +Y and `Top` along +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +Y
    Front = 0,
    /// -Y
    Back = 1,
    /// +X
    Right = 2,
    /// -X
    Left = 3,
    /// +Z
    Top = 4,
    /// -Z
    Bottom = 5,
}

pub const ALL_FACES: [Face; 6] = [
    Face::Front,
    Face::Back,
    Face::Right,
    Face::Left,
    Face::Top,
    Face::Bottom,
];

impl Face {
    /// Outward unit normal.
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Front => Vec3::Y,
            Face::Back => Vec3::NEG_Y,
            Face::Right => Vec3::X,
            Face::Left => Vec3::NEG_X,
            Face::Top => Vec3::Z,
            Face::Bottom => Vec3::NEG_Z,
        }
    }

    /// Offset to the face-adjacent neighbour voxel.
    #[inline]
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Front => IVec3::new(0, 1, 0),
            Face::Back => IVec3::new(0, -1, 0),
            Face::Right => IVec3::new(1, 0, 0),
            Face::Left => IVec3::new(-1, 0, 0),
            Face::Top => IVec3::new(0, 0, 1),
            Face::Bottom => IVec3::new(0, 0, -1),
        }
    }

    /// `(primary, u, v)` axis indices for slicing. The fixed mapping:
    ///
    /// | face    | primary | u | v |
    /// |---------|---------|---|---|
    /// | +X / -X | X       | Y | Z |
    /// | +Y / -Y | Y       | X | Z |
    /// | +Z / -Z | Z       | X | Y |
    #[inline]
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            Face::Right | Face::Left => (0, 1, 2),
            Face::Front | Face::Back => (1, 0, 2),
            Face::Top | Face::Bottom => (2, 0, 1),
        }
    }

    /// Invert the slice mapping: reconstruct a voxel position from
    /// `(slice, u, v)` mask coordinates.
    #[inline]
    pub fn voxel_pos(self, slice: i32, u: i32, v: i32) -> IVec3 {
        match self {
            Face::Front | Face::Back => IVec3::new(u, slice, v),
            Face::Right | Face::Left => IVec3::new(slice, u, v),
            Face::Top | Face::Bottom => IVec3::new(u, v, slice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_match_offsets() {
        for face in ALL_FACES {
            let n = face.normal();
            let o = face.offset().as_vec3();
            assert_eq!(n, o, "{face:?} normal and offset disagree");
        }
    }

    #[test]
    fn test_voxel_pos_inverts_axes() {
        for face in ALL_FACES {
            let (pa, ua, va) = face.axes();
            let pos = face.voxel_pos(7, 3, 5);
            assert_eq!(pos[pa], 7);
            assert_eq!(pos[ua], 3);
            assert_eq!(pos[va], 5);
        }
    }
}
