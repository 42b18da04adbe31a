/// Unit quaternions for layer turns and camera orientation
use std::ops::Mul;

use nalgebra::{Matrix3, Vector3};

use crate::error::{CubeError, Result};

/// A rotation quaternion `w + xi + yj + zk`.
///
/// Values built with [`Quaternion::from_axis_angle`] have unit norm.
/// Composition with `*` is the Hamilton product, and `a * b` means
/// "apply `b`, then `a`", so that
/// `(a * b).to_rotation_matrix() == a.to_rotation_matrix() * b.to_rotation_matrix()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Rotation by `theta` radians about `axis`, counterclockwise when looking
    /// down the axis towards the origin.
    pub fn from_axis_angle(axis: &Vector3<f64>, theta: f64) -> Result<Self> {
        let norm = axis.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(CubeError::InvalidAxis);
        }

        let (sin_half, cos_half) = (theta / 2.0).sin_cos();
        let v = axis * (sin_half / norm);
        Ok(Self {
            w: cos_half,
            x: v.x,
            y: v.y,
            z: v.z,
        })
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Conjugate, which is the inverse rotation for a unit quaternion.
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Hamilton product `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let (a, b) = (self, other);
        Self {
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        }
    }

    /// Closed-form 3×3 rotation matrix. Acts on column vectors: `v' = M * v`.
    pub fn to_rotation_matrix(&self) -> Matrix3<f64> {
        let Self { w, x, y, z } = *self;
        Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        )
    }

    /// Rotates a single vector.
    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.to_rotation_matrix() * v
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.compose(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn axis_strategy() -> impl Strategy<Value = Vector3<f64>> {
        (-10.0..10.0f64, -10.0..10.0f64, -10.0..10.0f64)
            .prop_filter("axis must be non-zero", |(x, y, z)| x * x + y * y + z * z > 1e-6)
            .prop_map(|(x, y, z)| Vector3::new(x, y, z))
    }

    #[test]
    fn test_zero_axis_rejected() {
        assert_eq!(
            Quaternion::from_axis_angle(&Vector3::zeros(), 1.0),
            Err(CubeError::InvalidAxis)
        );
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let q = Quaternion::from_axis_angle(&Vector3::z(), FRAC_PI_2).unwrap();
        let rotated = q.rotate(&Vector3::x());
        assert_abs_diff_eq!(rotated, Vector3::y(), epsilon = TOLERANCE);
    }

    #[test]
    fn test_half_turn_about_y() {
        let q = Quaternion::from_axis_angle(&Vector3::new(0.0, 3.0, 0.0), PI).unwrap();
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(q.rotate(&Vector3::z()), -Vector3::z(), epsilon = TOLERANCE);
    }

    #[test]
    fn test_conjugate_undoes_rotation() {
        let q = Quaternion::from_axis_angle(&Vector3::new(1.0, -1.0, 0.5), 0.7).unwrap();
        let m = (q * q.conjugate()).to_rotation_matrix();
        assert_abs_diff_eq!(m, Matrix3::identity(), epsilon = TOLERANCE);
    }

    proptest! {
        #[test]
        fn proptest_rotation_matrix_is_orthonormal(axis in axis_strategy(), theta in -10.0..10.0f64) {
            let m = Quaternion::from_axis_angle(&axis, theta).unwrap().to_rotation_matrix();
            prop_assert!((m * m.transpose() - Matrix3::identity()).abs().max() < TOLERANCE);
            prop_assert!((m.determinant() - 1.0).abs() < TOLERANCE);
        }

        #[test]
        fn proptest_composition_matches_matrix_product(
            a in axis_strategy(),
            ta in -10.0..10.0f64,
            b in axis_strategy(),
            tb in -10.0..10.0f64,
        ) {
            let qa = Quaternion::from_axis_angle(&a, ta).unwrap();
            let qb = Quaternion::from_axis_angle(&b, tb).unwrap();
            let composed = (qa * qb).to_rotation_matrix();
            let product = qa.to_rotation_matrix() * qb.to_rotation_matrix();
            prop_assert!((composed - product).abs().max() < TOLERANCE);
        }
    }
}
