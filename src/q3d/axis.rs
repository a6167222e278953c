//! Conversion from the Z-up host convention to the Y-up document convention.
//!
//! The conversion swaps the second and third components of every vector. It
//! is not a rotation: handedness flips, and the document consumer accounts for
//! it.

use cgmath::{InnerSpace, Matrix3, Matrix4, Vector3, Vector4};

use crate::data::Bone;

/// Converts a position or direction to the document convention.
pub fn to_y_up(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, v.z, v.y)
}

/// Converts Euler angles (`x`, `y`, `z` components, decomposed in `ZXY` order)
/// to the document convention.
pub fn rotation_to_y_up(euler: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(-euler.x, euler.z, euler.y)
}

/// Decomposes a rotation matrix into Euler angles for `ZXY` order.
///
/// The rotation around Z is applied first, then X, then Y, i.e.
/// `m == Ry(y) * Rx(x) * Rz(z)`. The returned vector holds the angles in
/// radians as `(x, y, z)`.
pub fn euler_zxy(m: &Matrix3<f32>) -> Vector3<f32> {
    // `m[c][r]` is the element at row `r`, column `c`.
    let sin_x = (-m[2][1]).max(-1.0).min(1.0);
    let x = sin_x.asin();
    if sin_x.abs() < 1.0 - 1e-6 {
        let y = m[2][0].atan2(m[2][2]);
        let z = m[0][1].atan2(m[1][1]);
        Vector3::new(x, y, z)
    } else {
        // Gimbal lock: only `y - z` (or `y + z`) is determined, pin `z` to zero.
        let y = (-m[0][2]).atan2(m[0][0]);
        Vector3::new(x, y, 0.0)
    }
}

/// Returns the translation part of the transform matrix.
pub fn translation(m: &Matrix4<f32>) -> Vector3<f32> {
    m.w.truncate()
}

/// Returns the rotation part of the transform matrix, with scale removed.
pub fn rotation(m: &Matrix4<f32>) -> Matrix3<f32> {
    /// Normalizes the basis vector unless it is degenerate.
    fn axis(col: Vector4<f32>) -> Vector3<f32> {
        let v = col.truncate();
        if v.magnitude2() > 0.0 {
            v.normalize()
        } else {
            v
        }
    }
    Matrix3::from_cols(axis(m.x), axis(m.y), axis(m.z))
}

/// Bone axes in the document convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneAxes {
    /// X axis.
    pub x: Vector3<f32>,
    /// Y axis.
    pub y: Vector3<f32>,
    /// Z axis.
    pub z: Vector3<f32>,
}

impl BoneAxes {
    /// Converts the bone axes.
    ///
    /// The document Y axis is the host Z axis and vice versa; the host Y axis
    /// points from head to tail.
    pub fn from_bone(bone: &Bone) -> Self {
        Self {
            x: to_y_up(bone.x_axis.into()),
            y: to_y_up(bone.z_axis.into()),
            z: to_y_up(bone.y_axis.into()),
        }
    }
}
