//! Gradient (Perlin) noise with turbulence.

use ember_math::sampling::random_on_sphere;
use ember_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default number of octaves summed by [`Perlin::turb`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Lattice noise generator: random unit gradients hashed through three
/// permutation tables.
#[derive(Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_on_sphere(rng)).collect();
        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothly interpolated noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;
        let (i, j, k) = (floor.x as i32, floor.y as i32, floor.z as i32);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let hash = self.perm_x[wrap(i + di as i32)]
                        ^ self.perm_y[wrap(j + dj as i32)]
                        ^ self.perm_z[wrap(k + dk as i32)];
                    *cell = self.gradients[hash];
                }
            }
        }

        interpolate(&c, frac)
    }

    /// Sum of `depth` octaves of noise, each at double the frequency and
    /// half the weight of the previous one. Always non-negative.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
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
}

impl std::fmt::Debug for Perlin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perlin").finish_non_exhaustive()
    }
}

#[inline]
fn wrap(i: i32) -> usize {
    (i & (POINT_COUNT as i32 - 1)) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Trilinear blend of the corner gradients with Hermite smoothing.
fn interpolate(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
    let mut accum = 0.0;

    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let corner = Vec3::new(i as f32, j as f32, k as f32);
                let weight_v = frac - corner;
                let blend = (corner * smooth + (Vec3::ONE - corner) * (Vec3::ONE - smooth))
                    .to_array()
                    .iter()
                    .product::<f32>();
                accum += blend * gradient.dot(weight_v);
            }
        }
    }

    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_zero_on_lattice() {
        let mut rng = StdRng::seed_from_u64(1);
        let perlin = Perlin::new(&mut rng);

        // Gradient noise vanishes at integer points
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-5.0, 1.0, 0.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_bounded_and_continuous() {
        let mut rng = StdRng::seed_from_u64(2);
        let perlin = Perlin::new(&mut rng);

        for i in 0..500 {
            let p = Vec3::new(i as f32 * 0.137, i as f32 * -0.071, i as f32 * 0.029);
            let n = perlin.noise(p);
            assert!(n.abs() <= 1.5, "noise out of range: {}", n);

            let nearby = perlin.noise(p + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.05);
        }
    }

    #[test]
    fn test_turb_non_negative() {
        let mut rng = StdRng::seed_from_u64(3);
        let perlin = Perlin::new(&mut rng);

        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.31, 1.7, i as f32 * -0.13);
            assert!(perlin.turb(p, DEFAULT_TURBULENCE_DEPTH) >= 0.0);
        }
        assert_eq!(perlin.turb(Vec3::new(0.3, 0.4, 0.5), 0), 0.0);
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(9));
        let b = Perlin::new(&mut StdRng::seed_from_u64(9));
        let p = Vec3::new(1.25, -0.5, 3.75);
        assert_eq!(a.noise(p), b.noise(p));
    }

    #[test]
    fn test_permutations_are_permutations() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(4));
        let mut sorted = perlin.perm_x.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
    }
}
