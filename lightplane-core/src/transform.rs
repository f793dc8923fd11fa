/// World transforms: rotation state and composed TRS matrices
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::TAU;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Same orientation with every angle brought into `[0, 2π)`
    pub fn wrapped(self) -> Self {
        Self {
            x: self.x.rem_euclid(TAU),
            y: self.y.rem_euclid(TAU),
            z: self.z.rem_euclid(TAU),
        }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state.
    ///
    /// Angles use the XYZ convention of the host engine: the matrix is
    /// `Rx * Ry * Rz`, so z is applied to a vertex first and x last.
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    pub fn translation_matrix(position: &Point3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(&position.coords)
    }

    pub fn scale_matrix(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(scale)
    }

    /// Local-to-world matrix: scale first, then rotate, then translate
    pub fn compose(
        position: &Point3<f32>,
        rotation: &RotationState,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Self::translation_matrix(position) * Self::rotation_matrix(rotation) * Self::scale_matrix(scale)
    }
}
