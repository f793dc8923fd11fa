/// Lightplane Core Library - planar light projection and shadow frustum fitting
///
/// This library projects scene meshes onto a directional light's image plane,
/// tracks the 2D bounds of the projected vertices and fits the light's
/// orthographic shadow camera around them.

pub mod basis;
pub mod config;
pub mod error;
pub mod frustum;
pub mod geometry;
pub mod light;
pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use basis::{PlaneBasis, FALLBACK_UP, WORLD_UP};
pub use config::SceneConfig;
pub use error::{ProjectionError, Result};
pub use frustum::{fit_orthographic_extents, FitPolicy, OrthoExtents};
pub use geometry::Mesh;
pub use light::{Light, ShadowCamera};
pub use pipeline::{PassOutcome, Pipeline, PreviewSurface};
pub use projection::{accumulate, project, Bounds2D, MeshSpan, ProjectionResult};
pub use scene::{Scene, SceneLimits, SceneUpdate};
pub use transform::{RotationState, Transform};
