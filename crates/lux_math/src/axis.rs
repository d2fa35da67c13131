use crate::Vec3;

/// A principal coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Axis from an index (0=X, 1=Y, anything else=Z).
    pub fn from_index(n: usize) -> Self {
        match n {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }

    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::X.component(v), 1.0);
        assert_eq!(Axis::Y.component(v), 2.0);
        assert_eq!(Axis::Z.component(v), 3.0);
    }

    #[test]
    fn test_axis_from_index() {
        assert_eq!(Axis::from_index(0), Axis::X);
        assert_eq!(Axis::from_index(1), Axis::Y);
        assert_eq!(Axis::from_index(2), Axis::Z);
        assert_eq!(Axis::Y.unit(), Vec3::Y);
    }
}
