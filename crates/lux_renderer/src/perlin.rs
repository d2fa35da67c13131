//! Gradient (Perlin) noise over a 256-entry lattice.

use crate::sampling::gen_range_f32;
use lux_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Lattice noise with random unit gradients and per-axis permutations.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT)
            .map(|_| {
                loop {
                    let v = Vec3::new(
                        gen_range_f32(rng, -1.0, 1.0),
                        gen_range_f32(rng, -1.0, 1.0),
                        gen_range_f32(rng, -1.0, 1.0),
                    );
                    if v.length_squared() > 1e-6 {
                        break v.normalize();
                    }
                }
            })
            .collect();

        Self {
            ranvec,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Smooth noise value in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);
        let (i, j, k) = (floor.x as i64, floor.y as i64, floor.z as i64);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[Self::wrap(i + di as i64)]
                        ^ self.perm_y[Self::wrap(j + dj as i64)]
                        ^ self.perm_z[Self::wrap(k + dk as i64)];
                    *cell = self.ranvec[index];
                }
            }
        }

        Self::trilinear_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves of |noise|, each at double frequency and half weight.
    pub fn turbulence(&self, p: Vec3, depth: usize) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    #[inline]
    fn wrap(n: i64) -> usize {
        (n & (POINT_COUNT as i64 - 1)) as usize
    }

    fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
        // Hermite smoothing hides the lattice
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let mut accum = 0.0;
        for (i, plane) in c.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, gradient) in row.iter().enumerate() {
                    let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                    let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * gradient.dot(weight_v);
                }
            }
        }
        accum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_is_zero_on_lattice() {
        // Gradient noise vanishes at integer points
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(1));
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(255.0, 256.0, -1.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_bounded_and_continuous() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(2));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..1000 {
            let p = Vec3::new(
                gen_range_f32(&mut rng, -50.0, 50.0),
                gen_range_f32(&mut rng, -50.0, 50.0),
                gen_range_f32(&mut rng, -50.0, 50.0),
            );
            let n = perlin.noise(p);
            assert!(n.abs() <= 1.5);
            assert!((perlin.noise(p + Vec3::splat(1e-4)) - n).abs() < 1e-2);
        }
    }

    #[test]
    fn test_turbulence_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(4));
        for i in 0..100 {
            let p = Vec3::splat(i as f32 * 0.37);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
    }
}
