/// Scene state and the setter updates that drive it
use nalgebra::{Point3, Vector3};
use tracing::warn;

use crate::error::{ProjectionError, Result};
use crate::geometry::Mesh;
use crate::light::Light;
use crate::transform::RotationState;

/// Smallest scale a mesh axis may be set to
pub const MIN_SCALE: f32 = 0.1;

/// Lowest height the light target may be moved to
pub const MIN_TARGET_HEIGHT: f32 = 0.1;

/// Upper bounds for mesh sizes and light placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLimits {
    pub max_width: f32,
    pub max_height: f32,
    pub max_depth: f32,
}

impl Default for SceneLimits {
    fn default() -> Self {
        Self {
            max_width: 100.0,
            max_height: 100.0,
            max_depth: 100.0,
        }
    }
}

impl SceneLimits {
    /// Reject limits the clamps below cannot honour
    pub fn validate(self) -> Result<Self> {
        let checks = [
            ("max_width", self.max_width, MIN_SCALE),
            ("max_height", self.max_height, MIN_SCALE.max(MIN_TARGET_HEIGHT)),
            ("max_depth", self.max_depth, MIN_SCALE),
        ];
        for (name, value, min) in checks {
            if !value.is_finite() || value < min {
                return Err(ProjectionError::Config(format!(
                    "{name} must be a finite value of at least {min}, got {value}"
                )));
            }
        }
        Ok(self)
    }

    pub fn clamp_scale(&self, scale: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            scale.x.clamp(MIN_SCALE, self.max_width),
            scale.y.clamp(MIN_SCALE, self.max_height),
            scale.z.clamp(MIN_SCALE, self.max_depth),
        )
    }

    pub fn clamp_light_position(&self, p: Point3<f32>) -> Point3<f32> {
        Point3::new(
            p.x.clamp(-self.max_width, self.max_width),
            p.y.clamp(0.0, self.max_height),
            p.z.clamp(-self.max_depth, self.max_depth),
        )
    }

    pub fn clamp_light_target(&self, p: Point3<f32>) -> Point3<f32> {
        Point3::new(
            p.x.clamp(-self.max_width, self.max_width),
            p.y.clamp(MIN_TARGET_HEIGHT, self.max_height),
            p.z.clamp(-self.max_depth, self.max_depth),
        )
    }
}

/// One control-panel change
#[derive(Debug, Clone, PartialEq)]
pub enum SceneUpdate {
    MeshScale { mesh: usize, scale: Vector3<f32> },
    MeshRotation { mesh: usize, rotation: RotationState },
    MeshPosition { mesh: usize, position: Point3<f32> },
    Contribution { mesh: usize, contributes: bool },
    LightPosition(Point3<f32>),
    LightTarget(Point3<f32>),
    LightColor(u32),
    LightIntensity(f32),
    AmbientIntensity(f32),
}

impl SceneUpdate {
    /// False when any numeric component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        match self {
            SceneUpdate::MeshScale { scale, .. } => scale.iter().all(|v| v.is_finite()),
            SceneUpdate::MeshRotation { rotation, .. } => {
                rotation.x.is_finite() && rotation.y.is_finite() && rotation.z.is_finite()
            }
            SceneUpdate::MeshPosition { position, .. } => {
                position.coords.iter().all(|v| v.is_finite())
            }
            SceneUpdate::LightPosition(p) | SceneUpdate::LightTarget(p) => {
                p.coords.iter().all(|v| v.is_finite())
            }
            SceneUpdate::LightIntensity(v) | SceneUpdate::AmbientIntensity(v) => v.is_finite(),
            SceneUpdate::Contribution { .. } | SceneUpdate::LightColor(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub light: Light,
    pub ambient_intensity: f32,
    pub limits: SceneLimits,
}

impl Scene {
    pub fn new(meshes: Vec<Mesh>, light: Light) -> Self {
        Self {
            meshes,
            light,
            ambient_intensity: 0.15,
            limits: SceneLimits::default(),
        }
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn contributing(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().filter(|m| m.contributes)
    }

    /// Return the scene with `update` applied, clamping values to `limits`
    pub fn apply(mut self, update: SceneUpdate) -> Self {
        self.update(update);
        self
    }

    /// Apply `update` in place. Updates carrying NaN or infinite values are
    /// dropped and the scene is left as it was.
    pub fn update(&mut self, update: SceneUpdate) {
        if !update.is_finite() {
            warn!(?update, "ignoring update with a non-finite value");
            return;
        }

        let limits = self.limits;
        match update {
            SceneUpdate::MeshScale { mesh, scale } => {
                if let Some(m) = self.mesh_mut(mesh) {
                    m.scale = limits.clamp_scale(scale);
                    m.rest_on_ground();
                }
            }
            SceneUpdate::MeshRotation { mesh, rotation } => {
                if let Some(m) = self.mesh_mut(mesh) {
                    m.rotation = rotation.wrapped();
                }
            }
            SceneUpdate::MeshPosition { mesh, position } => {
                if let Some(m) = self.mesh_mut(mesh) {
                    m.position = position;
                    m.rest_on_ground();
                }
            }
            SceneUpdate::Contribution { mesh, contributes } => {
                if let Some(m) = self.mesh_mut(mesh) {
                    m.contributes = contributes;
                }
            }
            SceneUpdate::LightPosition(p) => {
                self.light.position = limits.clamp_light_position(p);
            }
            SceneUpdate::LightTarget(p) => {
                self.light.target = limits.clamp_light_target(p);
            }
            SceneUpdate::LightColor(color) => {
                self.light.color = color & 0xFF_FFFF;
            }
            SceneUpdate::LightIntensity(intensity) => {
                self.light.intensity = intensity.max(0.0);
            }
            SceneUpdate::AmbientIntensity(intensity) => {
                self.ambient_intensity = intensity.max(0.0);
            }
        }
    }

    fn mesh_mut(&mut self, index: usize) -> Option<&mut Mesh> {
        let count = self.meshes.len();
        let mesh = self.meshes.get_mut(index);
        if mesh.is_none() {
            warn!(index, count, "update names a mesh that does not exist");
        }
        mesh
    }
}

impl Default for Scene {
    /// Three boxes resting on the ground, lit from +x
    fn default() -> Self {
        let meshes = vec![
            Mesh::unit_box("box").grounded().with_scale(30.0, 30.0, 100.0),
            Mesh::unit_box("tower")
                .grounded()
                .with_scale(20.0, 60.0, 20.0)
                .with_position(-40.0, 0.0, 60.0),
            Mesh::unit_box("crate")
                .grounded()
                .with_scale(15.0, 15.0, 15.0)
                .with_position(35.0, 0.0, -55.0),
        ];
        Self::new(meshes, Light::default())
    }
}
