//! Random sampling helpers shared by materials, PDFs and the camera.
//!
//! Every function draws from the caller's generator so that each render
//! thread can own an independent stream.

use lux_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform value in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform value in [min, max).
#[inline]
pub fn gen_range_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniform point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f32(rng, -1.0, 1.0),
            gen_range_f32(rng, -1.0, 1.0),
            gen_range_f32(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point in the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f32(rng, -1.0, 1.0),
            gen_range_f32(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction on the +Z hemisphere.
///
/// Maps a uniform disk sample up onto the hemisphere, so the density is
/// cos(theta) / pi.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(x, y, z)
}

/// Direction around +Z, uniform over the cone subtended by a sphere of
/// `radius` at squared distance `distance_squared`.
pub fn random_to_sphere(radius: f32, distance_squared: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unit_vector_is_normalised() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_direction_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let v = random_cosine_direction(&mut rng);
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_direction_mean_height() {
        // E[cos(theta)] under a cos/pi density is 2/3
        let mut rng = StdRng::seed_from_u64(3);
        let n = 100_000;
        let mean = (0..n).map(|_| random_cosine_direction(&mut rng).z).sum::<f32>() / n as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean = {mean}");
    }

    #[test]
    fn test_to_sphere_stays_in_cone() {
        let mut rng = StdRng::seed_from_u64(4);
        let (radius, dist_sq) = (1.0, 16.0);
        let cos_theta_max = (1.0f32 - radius * radius / dist_sq).sqrt();
        for _ in 0..1000 {
            let v = random_to_sphere(radius, dist_sq, &mut rng);
            assert!(v.z >= cos_theta_max - 1e-5);
        }
    }

    #[test]
    fn test_in_unit_disk_is_flat() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }
}
