//! Axis-aligned rectangles, the building block of boxes and area lights.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::gen_range_f32;
use crate::Material;
use lux_math::{Aabb, Axis, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Below this, a rectangle seen edge-on contributes no light-sampling density.
const MIN_PROJECTED_AREA: f32 = 1e-8;

/// Orientation of a rectangle, named by the two axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y at a fixed z.
    XY,
    /// Spans x and z at a fixed y.
    XZ,
    /// Spans y and z at a fixed x.
    YZ,
}

impl Plane {
    /// (first spanned axis, second spanned axis, fixed axis)
    fn axes(self) -> (Axis, Axis, Axis) {
        match self {
            Plane::XY => (Axis::X, Axis::Y, Axis::Z),
            Plane::XZ => (Axis::X, Axis::Z, Axis::Y),
            Plane::YZ => (Axis::Y, Axis::Z, Axis::X),
        }
    }
}

/// A rectangle `[a0, a1] x [b0, b1]` lying in the plane `fixed axis = k`.
///
/// The outward normal is the positive fixed axis.
pub struct AaRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            plane,
            a0: a0.min(a1),
            a1: a0.max(a1),
            b0: b0.min(b1),
            b1: b0.max(b1),
            k,
            material,
        }
    }

    /// Rectangle in the plane z = k.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::XY, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle in the plane y = k.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::XZ, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle in the plane x = k.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::YZ, (y0, y1), (z0, z1), k, material)
    }

    pub fn area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    /// World point from in-plane coordinates.
    fn point(&self, a: f32, b: f32) -> Vec3 {
        let mut p = [0.0f32; 3];
        let (a_axis, b_axis, k_axis) = self.plane.axes();
        p[a_axis as usize] = a;
        p[b_axis as usize] = b;
        p[k_axis as usize] = self.k;
        Vec3::from_array(p)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (a_axis, b_axis, k_axis) = self.plane.axes();

        // Rays parallel to the plane give an infinite or NaN t and are rejected here
        let t = (self.k - k_axis.component(ray.origin())) / k_axis.component(ray.direction());
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let (a, b) = (a_axis.component(p), b_axis.component(p));
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        let u = (a - self.a0) / (self.a1 - self.a0);
        let v = (b - self.b0) / (self.b1 - self.b0);
        Some(HitRecord::new(ray, t, k_axis.unit(), (u, v), &self.material))
    }
}

impl Hittable for AaRect {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        self.intersect(ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        // Aabb pads the zero-width fixed axis
        Some(Aabb::from_points(
            self.point(self.a0, self.b0),
            self.point(self.a1, self.b1),
        ))
    }

    /// distance^2 / (|cos(theta_light)| * area), zero when the rectangle is missed.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let toward = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.intersect(&toward, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let length = direction.length();
        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / length).abs();
        let projected_area = cosine * self.area();
        if projected_area <= MIN_PROJECTED_AREA {
            return 0.0;
        }

        distance_squared / projected_area
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = gen_range_f32(rng, self.a0, self.a1);
        let b = gen_range_f32(rng, self.b0, self.b1);
        self.point(a, b) - origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn white() -> Arc<Material> {
        Arc::new(Lambertian::new(Vec3::ONE).into())
    }

    #[test]
    fn test_xy_rect_hit_uv() {
        let rect = AaRect::xy(0.0, 2.0, 0.0, 4.0, -3.0, white());
        let ray = Ray::new(Vec3::new(0.5, 3.0, 0.0), -Vec3::Z, 0.0);

        let rec = rect.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut test_rng()).unwrap();

        assert!((rec.t - 3.0).abs() < 1e-6);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
        // The ray arrives from the +z side, which the rectangle faces
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_rect_rejects_outside_extent_and_parallel_rays() {
        let rect = AaRect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, white());
        let ray_t = Interval::new(0.001, f32::INFINITY);

        let outside = Ray::new(Vec3::new(1.5, 0.0, 0.0), Vec3::Y, 0.0);
        assert!(rect.hit(&outside, ray_t, &mut test_rng()).is_none());

        let parallel = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z, 0.0);
        assert!(rect.hit(&parallel, ray_t, &mut test_rng()).is_none());

        let inside = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let rec = rect.hit(&inside, ray_t, &mut test_rng()).unwrap();
        assert_eq!(rec.normal, -Vec3::Y);
    }

    #[test]
    fn test_yz_rect_box_is_padded() {
        let rect = AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, white());
        let bbox = rect.bounding_box(0.0, 1.0).unwrap();

        assert!(bbox.x.min < 555.0 && bbox.x.max > 555.0);
        assert_eq!(bbox.y, Interval::new(0.0, 555.0));
        assert_eq!(bbox.z, Interval::new(0.0, 555.0));
    }

    #[test]
    fn test_rect_light_pdf_head_on() {
        // 2x2 light one unit above the origin, sampled straight up
        let rect = AaRect::xz(-1.0, 1.0, -1.0, 1.0, 1.0, white());
        let pdf = rect.pdf_value(Vec3::ZERO, Vec3::Y);

        assert!((pdf - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rect_random_direction_lands_on_rect() {
        let rect = AaRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, white());
        let origin = Vec3::new(278.0, 0.0, 278.0);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let direction = rect.random_direction(origin, &mut rng);
            let rec = rect
                .hit(&Ray::new(origin, direction, 0.0), Interval::new(0.001, 2.0), &mut rng)
                .unwrap();
            assert!((rec.t - 1.0).abs() < 1e-4);
        }
    }
}
