//! Seedable randomness for spawn positions and phases

use crate::foundation::math::{Bounds, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source owned by one scene
///
/// A scene built with a seed replays the same spawn sequence; without one it
/// draws from OS entropy.
#[derive(Debug, Clone)]
pub struct SceneRng {
    inner: StdRng,
}

impl SceneRng {
    /// Create a generator from an optional seed
    pub fn new(seed: Option<u64>) -> Self {
        let inner = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { inner }
    }

    /// Deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Uniform value in `[min, max)`; returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.inner.gen_range(min..max)
        } else {
            min
        }
    }

    /// Uniform value in `[0, 1)`
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// `true` with the given probability
    pub fn chance(&mut self, probability: f32) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.inner.gen_bool(f64::from(probability))
    }

    /// Random signed value in `[-magnitude, magnitude)`
    pub fn signed(&mut self, magnitude: f32) -> f32 {
        self.range(-magnitude, magnitude)
    }

    /// Random point inside the bounds (flat axes stay at their minimum)
    pub fn point_in(&mut self, bounds: &Bounds) -> Vec3 {
        Vec3::new(
            self.range(bounds.min.x, bounds.max.x),
            self.range(bounds.min.y, bounds.max.y),
            self.range(bounds.min.z, bounds.max.z),
        )
    }

    /// Random index in `0..len`
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.inner.gen_range(0..len)
        }
    }
}
