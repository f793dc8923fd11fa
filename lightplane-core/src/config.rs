/// TOML scene description
///
/// ```toml
/// policy = "tight"
/// ambient_intensity = 0.15
///
/// [light]
/// position = [100.0, 0.0, 0.0]
/// target = [0.0, 0.0, 0.0]
///
/// [[mesh]]
/// name = "box"
/// scale = [30.0, 30.0, 100.0]
/// grounded = true
/// ```
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ProjectionError, Result};
use crate::frustum::FitPolicy;
use crate::geometry::Mesh;
use crate::light::Light;
use crate::scene::{Scene, SceneLimits};
use crate::transform::RotationState;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    pub policy: Option<String>,
    pub ambient_intensity: Option<f32>,
    pub limits: Option<LimitsConfig>,
    pub light: Option<LightConfig>,
    #[serde(default, rename = "mesh")]
    pub meshes: Vec<MeshConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_width: f32,
    pub max_height: f32,
    pub max_depth: f32,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LightConfig {
    pub position: Option<[f32; 3]>,
    pub target: Option<[f32; 3]>,
    pub color: Option<u32>,
    pub intensity: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshConfig {
    pub name: String,
    #[serde(default = "unit")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in radians
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "yes")]
    pub contributes: bool,
    #[serde(default)]
    pub grounded: bool,
    /// Load vertices from an STL file instead of using the unit box
    pub stl: Option<PathBuf>,
}

fn unit() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn yes() -> bool {
    true
}

impl SceneConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ProjectionError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), meshes = config.meshes.len(), "loaded scene config");
        Ok(config)
    }

    pub fn policy(&self) -> Result<FitPolicy> {
        match &self.policy {
            Some(name) => name.parse().map_err(ProjectionError::Config),
            None => Ok(FitPolicy::default()),
        }
    }

    /// Build the scene; relative STL paths resolve against `base_dir`.
    ///
    /// With no `[[mesh]]` entries the default three-box scene is used.
    pub fn into_scene(self, base_dir: &Path) -> Result<Scene> {
        let mut scene = if self.meshes.is_empty() {
            Scene::default()
        } else {
            let meshes = self
                .meshes
                .into_iter()
                .map(|m| m.into_mesh(base_dir))
                .collect::<Result<Vec<_>>>()?;
            Scene::new(meshes, Light::default())
        };

        if let Some(limits) = self.limits {
            scene.limits = SceneLimits {
                max_width: limits.max_width,
                max_height: limits.max_height,
                max_depth: limits.max_depth,
            }
            .validate()?;
        }
        if let Some(ambient) = self.ambient_intensity {
            scene.ambient_intensity = ambient;
        }
        if let Some(light) = self.light {
            let limits = scene.limits;
            if let Some(position) = light.position {
                let [x, y, z] = finite("light.position", position)?;
                scene.light.position = limits.clamp_light_position(Point3::new(x, y, z));
            }
            if let Some(target) = light.target {
                let [x, y, z] = finite("light.target", target)?;
                scene.light.target = limits.clamp_light_target(Point3::new(x, y, z));
            }
            if let Some(color) = light.color {
                scene.light.color = color;
            }
            if let Some(intensity) = light.intensity {
                scene.light.intensity = intensity;
            }
        }

        for mesh in &mut scene.meshes {
            mesh.scale = scene.limits.clamp_scale(mesh.scale);
            mesh.rest_on_ground();
        }

        Ok(scene)
    }
}

impl MeshConfig {
    fn into_mesh(self, base_dir: &Path) -> Result<Mesh> {
        let mut mesh = match &self.stl {
            Some(path) => {
                let path = base_dir.join(path);
                let data = std::fs::read(&path).map_err(|e| ProjectionError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                Mesh::from_stl(self.name, &data)?
            }
            None => Mesh::unit_box(self.name),
        };

        let [sx, sy, sz] = finite("mesh.scale", self.scale)?;
        let [px, py, pz] = finite("mesh.position", self.position)?;
        let [rx, ry, rz] = finite("mesh.rotation", self.rotation)?;
        mesh.scale = Vector3::new(sx, sy, sz);
        mesh.position = Point3::new(px, py, pz);
        mesh.rotation = RotationState::new(rx, ry, rz).wrapped();
        mesh.contributes = self.contributes;
        mesh.grounded = self.grounded;
        Ok(mesh)
    }
}

fn finite(key: &str, values: [f32; 3]) -> Result<[f32; 3]> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(values)
    } else {
        Err(ProjectionError::Config(format!(
            "{key} must be finite, got {values:?}"
        )))
    }
}
