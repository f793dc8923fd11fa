/// Orthonormal frame of the light's image plane
use nalgebra::{Rotation3, Unit, Vector3};
use std::f32::consts::FRAC_PI_2;
use tracing::debug;

use crate::error::{ProjectionError, Result};
use crate::light::Light;

/// Reference up vector used to seed the first tangent axis
pub const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Substitute seed when the light looks straight up or down
pub const FALLBACK_UP: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Lengths below this are treated as zero
pub const DEGENERATE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBasis {
    pub normal: Vector3<f32>,
    pub p1: Vector3<f32>,
    pub p2: Vector3<f32>,
    /// True when `normal` was parallel to `WORLD_UP` and `FALLBACK_UP` seeded `p1`
    pub used_fallback: bool,
}

impl PlaneBasis {
    /// `normal = normalize(target - position)`, `p1 = normalize(normal × up)`,
    /// `p2 = p1` rotated by -90° about `normal`.
    pub fn from_light(light: &Light) -> Result<Self> {
        let direction = light.direction();
        let length = direction.norm();
        if length < DEGENERATE_EPSILON {
            return Err(ProjectionError::ZeroLengthDirection {
                position: light.position,
                target: light.target,
            });
        }
        Ok(Self::from_normal(direction / length))
    }

    /// Build the frame around an already normalised direction
    pub fn from_normal(normal: Vector3<f32>) -> Self {
        let mut used_fallback = false;
        let mut tangent = normal.cross(&WORLD_UP);
        if tangent.norm() < DEGENERATE_EPSILON {
            debug!(?normal, "light direction parallel to world up, seeding from fallback axis");
            tangent = normal.cross(&FALLBACK_UP);
            used_fallback = true;
        }
        let p1 = tangent.normalize();

        let axis = Unit::new_normalize(normal);
        let p2 = (Rotation3::from_axis_angle(&axis, -FRAC_PI_2) * p1).normalize();

        Self {
            normal,
            p1,
            p2,
            used_fallback,
        }
    }
}
