//! Math utilities and types
//!
//! Provides the vector aliases, bounds and angle helpers used by the
//! per-frame update step.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Wrap an angle into `[0, 2π)`
///
/// Phase accumulators are wrapped every tick so they never grow without
/// bound over a long session.
pub fn wrap_phase(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a scalar toroidally into `[min, max)`
pub fn wrap_scalar(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 || !value.is_finite() {
        return min;
    }
    let wrapped = min + (value - min).rem_euclid(span);
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

/// A coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
    /// Depth axis
    Z,
}

impl Axis {
    /// Component index of this axis in a [`Vec3`]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Axis-aligned simulation bounds
///
/// The primary axis is the one entities travel along (falling rain travels
/// along `Y`, clouds along `X`, runner collectibles along `Z`). Out-of-bounds
/// tests only look at the primary axis; wrapping applies to every axis with
/// a non-empty extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
    /// Dominant travel axis
    pub primary_axis: Axis,
}

impl Bounds {
    /// Create bounds from two corners
    pub fn new(min: Vec3, max: Vec3, primary_axis: Axis) -> Self {
        Self { min, max, primary_axis }
    }

    /// Flat 2D bounds (`z` fixed at zero)
    pub fn planar(width: f32, height: f32, primary_axis: Axis) -> Self {
        Self::new(Vec3::zeros(), Vec3::new(width, height, 0.0), primary_axis)
    }

    /// Extent along one axis
    pub fn extent(&self, axis: Axis) -> f32 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// Center point of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether `value` lies inside the closed range of `axis`
    pub fn contains_on(&self, axis: Axis, value: f32) -> bool {
        let i = axis.index();
        value >= self.min[i] && value <= self.max[i]
    }

    /// Whether the point lies inside on the primary axis
    pub fn contains_primary(&self, point: &Vec3) -> bool {
        self.contains_on(self.primary_axis, point[self.primary_axis.index()])
    }

    /// Whether the point lies inside on every axis
    pub fn contains(&self, point: &Vec3) -> bool {
        self.contains_on(Axis::X, point.x)
            && self.contains_on(Axis::Y, point.y)
            && self.contains_on(Axis::Z, point.z)
    }

    /// Wrap the point toroidally on every axis with a non-empty extent
    pub fn wrap(&self, point: &Vec3) -> Vec3 {
        let mut wrapped = *point;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let i = axis.index();
            if self.extent(axis) > 0.0 {
                wrapped[i] = wrap_scalar(point[i], self.min[i], self.max[i]);
            } else {
                wrapped[i] = self.min[i];
            }
        }
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_phase_stays_in_range() {
        assert_relative_eq!(wrap_phase(TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(wrap_phase(-0.5), TAU - 0.5, epsilon = 1e-5);
        assert_eq!(wrap_phase(f32::NAN), 0.0);

        let mut phase = 0.0;
        for _ in 0..100_000 {
            phase = wrap_phase(phase + 0.37);
            assert!((0.0..TAU).contains(&phase));
        }
    }

    #[test]
    fn test_wrap_scalar() {
        assert_relative_eq!(wrap_scalar(1005.0, 0.0, 1000.0), 5.0);
        assert_relative_eq!(wrap_scalar(-5.0, 0.0, 1000.0), 995.0);
        assert_relative_eq!(wrap_scalar(500.0, 0.0, 1000.0), 500.0);
        assert_eq!(wrap_scalar(3.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_bounds_wrap_flat_axis() {
        let bounds = Bounds::planar(100.0, 50.0, Axis::Y);
        let wrapped = bounds.wrap(&Vec3::new(120.0, -10.0, 3.0));
        assert_relative_eq!(wrapped.x, 20.0);
        assert_relative_eq!(wrapped.y, 40.0);
        assert_relative_eq!(wrapped.z, 0.0);
        assert!(bounds.contains(&wrapped));
    }

    #[test]
    fn test_primary_axis_containment() {
        let bounds = Bounds::planar(100.0, 50.0, Axis::Y);
        assert!(bounds.contains_primary(&Vec3::new(500.0, 10.0, 0.0)));
        assert!(!bounds.contains_primary(&Vec3::new(10.0, 60.0, 0.0)));
    }
}
