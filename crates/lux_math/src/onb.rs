use crate::Vec3;

/// Orthonormal basis built around a single direction `w`.
///
/// Used to express hemisphere samples, generated around +Z, in the frame
/// of a surface normal or of the direction toward a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis is the normalised input.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        // Any helper vector not parallel to w will do
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Map local coordinates (a.x along u, a.y along v, a.z along w) to world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
