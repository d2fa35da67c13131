// Rotation utilities for Mat3
//
// Extends glam::Mat3 with the helpers the rotation wrapper needs.

use crate::{Aabb, Axis, Vec3};
use glam::Mat3;

/// Extension trait for Mat3 used by rotated instances.
pub trait Mat3Ext {
    /// Rotation of `degrees` about a principal axis (right handed).
    fn from_axis_rotation(axis: Axis, degrees: f32) -> Mat3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn from_axis_rotation(axis: Axis, degrees: f32) -> Mat3 {
        let radians = degrees.to_radians();
        match axis {
            Axis::X => Mat3::from_rotation_x(radians),
            Axis::Y => Mat3::from_rotation_y(radians),
            Axis::Z => Mat3::from_rotation_z(radians),
        }
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners().map(|corner| self.mul_vec3(corner));

        let (result_min, result_max) = corners[1..].iter().fold(
            (corners[0], corners[0]),
            |(lo, hi): (Vec3, Vec3), &c| (lo.min(c), hi.max(c)),
        );

        Aabb::from_points(result_min, result_max)
    }
}
