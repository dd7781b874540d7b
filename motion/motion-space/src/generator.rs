//! Unit-hypercube point generators behind configuration sampling.
//!
//! A [`PointGenerator`] fills a slice with numbers in `[0, 1)`. Spaces map
//! those numbers onto joint ranges, so swapping the generator changes sample
//! coverage without changing any sampling contract.

use motion_types::SampleSequence;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of points in the unit hypercube.
#[derive(Debug, Clone)]
pub enum PointGenerator {
    /// Independent uniform draws.
    Uniform(StdRng),
    /// Scrambled Halton sequence.
    Halton(GeneralizedHalton),
}

impl PointGenerator {
    /// Creates a generator of the given kind.
    ///
    /// With `seed == None` the generator is seeded from system entropy.
    #[must_use]
    pub fn new(sequence: SampleSequence, dimension: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        match sequence {
            SampleSequence::Uniform => Self::Uniform(rng),
            SampleSequence::Halton => Self::Halton(GeneralizedHalton::new(dimension, &mut rng)),
        }
    }

    /// Fills `out` with the next point.
    ///
    /// # Panics
    ///
    /// A Halton generator panics if `out` is longer than its dimension.
    pub fn fill(&mut self, out: &mut [f64]) {
        match self {
            Self::Uniform(rng) => {
                for v in out.iter_mut() {
                    *v = rng.gen_range(0.0..1.0);
                }
            }
            Self::Halton(halton) => halton.fill(out),
        }
    }
}

/// Halton sequence with per-dimension random digit permutations.
///
/// Dimension `i` uses the `i`-th prime as its base. Each base gets a random
/// permutation of its digits that keeps zero fixed, which breaks the strong
/// correlation between high-dimension plain Halton coordinates.
///
/// # Example
///
/// ```
/// use motion_space::GeneralizedHalton;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
/// let mut halton = GeneralizedHalton::new(4, &mut rng);
/// let mut point = [0.0; 4];
/// for _ in 0..100 {
///     halton.fill(&mut point);
///     assert!(point.iter().all(|&v| (0.0..1.0).contains(&v)));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GeneralizedHalton {
    bases: Vec<u64>,
    permutations: Vec<Vec<u64>>,
    index: u64,
}

impl GeneralizedHalton {
    /// Creates a sequence over `dimension` coordinates.
    pub fn new(dimension: usize, rng: &mut impl Rng) -> Self {
        let bases = first_primes(dimension);
        let permutations = bases
            .iter()
            .map(|&base| {
                let mut digits: Vec<u64> = (1..base).collect();
                digits.shuffle(rng);
                std::iter::once(0).chain(digits).collect()
            })
            .collect();
        Self {
            bases,
            permutations,
            index: 0,
        }
    }

    /// Number of coordinates.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.bases.len()
    }

    /// Fills `out` with the next point and advances the sequence.
    ///
    /// # Panics
    ///
    /// Panics if `out` is longer than [`dimension`](Self::dimension).
    pub fn fill(&mut self, out: &mut [f64]) {
        assert!(out.len() <= self.bases.len(), "point exceeds Halton dimension");
        self.index += 1;
        for ((v, &base), perm) in out.iter_mut().zip(&self.bases).zip(&self.permutations) {
            *v = radical_inverse(self.index, base, perm);
        }
    }
}

// Precision loss is fine: the result is a fraction in [0, 1)
#[allow(clippy::cast_precision_loss)]
fn radical_inverse(mut index: u64, base: u64, permutation: &[u64]) -> f64 {
    let inv_base = 1.0 / base as f64;
    let mut scale = inv_base;
    let mut value = 0.0;
    while index > 0 {
        let digit = permutation[(index % base) as usize];
        value += digit as f64 * scale;
        index /= base;
        scale *= inv_base;
    }
    value.min(1.0 - f64::EPSILON)
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(8), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert!(first_primes(0).is_empty());
    }

    #[test]
    fn test_identity_permutation_is_plain_halton() {
        let identity: Vec<u64> = (0..2).collect();
        assert_relative_eq!(radical_inverse(1, 2, &identity), 0.5);
        assert_relative_eq!(radical_inverse(2, 2, &identity), 0.25);
        assert_relative_eq!(radical_inverse(3, 2, &identity), 0.75);
    }

    #[test]
    fn test_halton_is_deterministic_per_seed() {
        let mut a = PointGenerator::new(SampleSequence::Halton, 3, Some(11));
        let mut b = PointGenerator::new(SampleSequence::Halton, 3, Some(11));
        let (mut pa, mut pb) = ([0.0; 3], [0.0; 3]);
        for _ in 0..20 {
            a.fill(&mut pa);
            b.fill(&mut pb);
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_halton_first_coordinate_covers_halves() {
        // Base 2 alternates between the two halves of the interval
        let mut rng = StdRng::seed_from_u64(0);
        let mut halton = GeneralizedHalton::new(1, &mut rng);
        let mut point = [0.0];
        let mut low = 0;
        for _ in 0..64 {
            halton.fill(&mut point);
            if point[0] < 0.5 {
                low += 1;
            }
        }
        assert_eq!(low, 32);
    }

    #[test]
    fn test_uniform_in_unit_interval() {
        let mut generator = PointGenerator::new(SampleSequence::Uniform, 5, Some(1));
        let mut point = [0.0; 5];
        for _ in 0..200 {
            generator.fill(&mut point);
            assert!(point.iter().all(|&v| (0.0..1.0).contains(&v)));
        }
    }
}
