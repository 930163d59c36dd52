//! # Transform Codec
//!
//! Converts between a node's stored position / Euler rotation / scale triple and
//! the 4x4 matrix the transform gizmo consumes and produces.
//!
//! Rotations are Euler angles in radians applied in XYZ order (intrinsic), i.e. the
//! rotation matrix is `Rx * Ry * Rz`. Composition order is Translation * Rotation * Scale.
//!
//! Decomposition recovers the same triple for matrices built by [`to_matrix`], up to
//! floating point error, as long as the Y rotation stays away from +/-90 degrees.
//! At gimbal lock the X and Z angles are not unique and X absorbs the combined turn.

use cgmath::{Euler, InnerSpace, Matrix3, Matrix4, Quaternion, Rad, SquareMatrix, Vector3};

use crate::gfx::scene::SceneNode;

/// Below this magnitude a column is treated as collapsed during decomposition.
const DEGENERATE_SCALE: f32 = 1.0e-6;

/// |m13| above this is treated as gimbal lock (Y rotation at +/-90 degrees).
const GIMBAL_LOCK_THRESHOLD: f32 = 0.999_999;

/// A decomposed local transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians, XYZ order
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Transform of a scene node; a missing rotation reads as zero.
    pub fn of(node: &SceneNode) -> Self {
        Self::new(node.position(), node.rotation(), node.scale())
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        to_matrix(self.position, self.rotation, self.scale)
    }

    pub fn from_matrix(matrix: &Matrix4<f32>) -> Self {
        from_matrix(matrix)
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        let close = |a: Vector3<f32>, b: Vector3<f32>| {
            (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon && (a.z - b.z).abs() <= epsilon
        };
        close(self.position, other.position)
            && close(self.rotation, other.rotation)
            && close(self.scale, other.scale)
    }
}

/// Composes `T * R * S` from a position, XYZ Euler rotation and scale.
pub fn to_matrix(position: Vector3<f32>, rotation: Vector3<f32>, scale: Vector3<f32>) -> Matrix4<f32> {
    let translation = Matrix4::from_translation(position);
    let rotation = Matrix4::from(euler_to_quaternion(rotation));
    let scale = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);

    translation * rotation * scale
}

/// Splits a `T * R * S` matrix back into position, XYZ Euler rotation and scale.
///
/// A negative determinant is attributed to the X axis scale.
pub fn from_matrix(matrix: &Matrix4<f32>) -> Transform {
    let position = matrix.w.truncate();

    let x_axis = matrix.x.truncate();
    let y_axis = matrix.y.truncate();
    let z_axis = matrix.z.truncate();

    let mut scale = Vector3::new(x_axis.magnitude(), y_axis.magnitude(), z_axis.magnitude());
    if matrix.determinant() < 0.0 {
        scale.x = -scale.x;
    }

    let unscale = |axis: Vector3<f32>, s: f32| {
        if s.abs() > DEGENERATE_SCALE {
            axis / s
        } else {
            axis
        }
    };
    let basis = Matrix3::from_cols(
        unscale(x_axis, scale.x),
        unscale(y_axis, scale.y),
        unscale(z_axis, scale.z),
    );
    let quaternion = Quaternion::from(basis).normalize();

    Transform {
        position,
        rotation: quaternion_to_euler(quaternion),
        scale,
    }
}

/// Quaternion for XYZ Euler angles in radians.
pub fn euler_to_quaternion(rotation: Vector3<f32>) -> Quaternion<f32> {
    Quaternion::from(Euler::new(Rad(rotation.x), Rad(rotation.y), Rad(rotation.z)))
}

/// XYZ Euler angles in radians for a unit quaternion.
pub fn quaternion_to_euler(quaternion: Quaternion<f32>) -> Vector3<f32> {
    // cgmath matrices are column-major: m.c.r
    let m = Matrix3::from(quaternion);
    let m13 = m.z.x;

    let y = m13.clamp(-1.0, 1.0).asin();
    let (x, z) = if m13.abs() < GIMBAL_LOCK_THRESHOLD {
        ((-m.z.y).atan2(m.z.z), (-m.y.x).atan2(m.x.x))
    } else {
        (m.y.z.atan2(m.y.y), 0.0)
    };

    Vector3::new(x, y, z)
}
