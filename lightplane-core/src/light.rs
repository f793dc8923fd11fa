/// Directional light and the orthographic camera that renders its shadow map
use nalgebra::{Matrix4, Point3, Vector3};
use tracing::warn;

use crate::frustum::OrthoExtents;

/// Orthographic camera attached to a directional light
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowCamera {
    pub extents: OrthoExtents,
    pub near: f32,
    pub far: f32,
    /// Set whenever the extents change; cleared by `update_projection_matrix`
    pub needs_update: bool,
    projection: Matrix4<f32>,
}

impl ShadowCamera {
    pub fn new(extents: OrthoExtents, near: f32, far: f32) -> Self {
        let mut camera = Self {
            extents,
            near,
            far,
            needs_update: true,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Write new extents and mark the projection dirty
    pub fn apply(&mut self, extents: OrthoExtents) {
        self.extents = extents;
        self.needs_update = true;
    }

    /// Rebuild the projection matrix from the current extents.
    ///
    /// Zero-area extents would divide by zero, so the previous matrix is kept.
    pub fn update_projection_matrix(&mut self) {
        let e = self.extents;
        if e.width() <= f32::EPSILON || e.height() <= f32::EPSILON || self.far <= self.near {
            warn!(?e, "degenerate shadow frustum, keeping previous projection");
        } else {
            self.projection =
                Matrix4::new_orthographic(e.left, e.right, e.bottom, e.top, self.near, self.far);
        }
        self.needs_update = false;
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self::new(
            OrthoExtents {
                left: -90.0,
                right: 90.0,
                top: 45.0,
                bottom: -45.0,
            },
            0.0,
            200.0,
        )
    }
}

/// A directional light aimed from `position` at `target`
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Packed `0xRRGGBB`
    pub color: u32,
    pub intensity: f32,
    pub shadow: ShadowCamera,
}

impl Light {
    pub fn new(position: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.target - self.position
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(100.0, 0.0, 0.0),
            target: Point3::origin(),
            color: 0xF5AF19,
            intensity: 1.0,
            shadow: ShadowCamera::default(),
        }
    }
}
