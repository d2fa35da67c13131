//! Lux math - vectors, rays and bounding volumes for the path tracer.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod axis;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use axis::Axis;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat3Ext;
