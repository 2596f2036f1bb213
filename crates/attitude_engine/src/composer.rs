//! Euler angles to rotation matrix, and vertex transformation.

use contracts::{AttitudeState, Vector3};
use nalgebra::{Matrix3, Vector3 as NVector3};

/// 3×3 rotation matrix, R = Rz(yaw) · Ry(pitch) · Rx(roll)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(Matrix3<f64>);

impl RotationMatrix {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Compose the rotation for an attitude (yaw, then pitch, then roll)
    pub fn compose(state: &AttitudeState) -> Self {
        let (sr, cr) = state.roll.sin_cos();
        let (sp, cp) = state.pitch.sin_cos();
        let (sy, cy) = state.yaw.sin_cos();

        #[rustfmt::skip]
        let m = Matrix3::new(
            cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr,
            sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr,
            -sp,     cp * sr,                cp * cr,
        );

        Self(m)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Row-major copy of the entries
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let m = &self.0;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    pub fn column(&self, index: usize) -> Vector3 {
        let c = self.0.column(index);
        Vector3::new(c[0], c[1], c[2])
    }

    /// Columns have unit norm and are pairwise orthogonal within `tol`
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let gram = self.0.transpose() * self.0;
        (gram - Matrix3::identity()).iter().all(|e| e.abs() <= tol)
    }

    pub fn apply(&self, v: Vector3) -> Vector3 {
        let r = self.0 * NVector3::new(v.x, v.y, v.z);
        Vector3::new(r.x, r.y, r.z)
    }

    /// Rotate every vertex, preserving order and count
    pub fn transform(&self, vertices: &[Vector3]) -> Vec<Vector3> {
        vertices.iter().map(|&v| self.apply(v)).collect()
    }

    /// Like [`transform`](Self::transform) but reuses `out`
    pub fn transform_into(&self, vertices: &[Vector3], out: &mut Vec<Vector3>) {
        out.clear();
        out.extend(vertices.iter().map(|&v| self.apply(v)));
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
