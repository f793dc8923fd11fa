/// Recompute pipeline: basis → projection → frustum fit → shadow camera
use nalgebra::Point2;
use tracing::{debug, warn};

use crate::basis::PlaneBasis;
use crate::error::ProjectionError;
use crate::frustum::{fit_orthographic_extents, FitPolicy, OrthoExtents};
use crate::projection::{accumulate, ProjectionResult};
use crate::scene::{Scene, SceneUpdate};

/// Consumer of each pass's projected points
pub trait PreviewSurface {
    /// Redraw from scratch; coordinates are centred on the surface middle
    fn render(&mut self, points: &[Point2<f32>]);

    fn resize(&mut self, width: usize, height: usize);
}

/// What a single pass produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassOutcome {
    pub basis: Option<PlaneBasis>,
    pub result: ProjectionResult,
    /// Extents written to the shadow camera, if the pass updated it
    pub extents: Option<OrthoExtents>,
    /// Why the camera was left untouched
    pub skipped: Option<ProjectionError>,
}

/// Owns the scene and re-runs the full projection whenever it changes
#[derive(Debug, Clone)]
pub struct Pipeline {
    scene: Scene,
    policy: FitPolicy,
    last: PassOutcome,
}

impl Pipeline {
    pub fn new(scene: Scene, policy: FitPolicy) -> Self {
        let mut pipeline = Self {
            scene,
            policy,
            last: PassOutcome::default(),
        };
        pipeline.run_pass();
        pipeline
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    pub fn last_pass(&self) -> &PassOutcome {
        &self.last
    }

    /// Apply one control change, then recompute
    pub fn dispatch(&mut self, update: SceneUpdate) -> &PassOutcome {
        self.scene.update(update);
        self.run_pass()
    }

    pub fn set_policy(&mut self, policy: FitPolicy) -> &PassOutcome {
        self.policy = policy;
        self.run_pass()
    }

    /// Project the current scene and refit the shadow camera.
    ///
    /// A pass with no usable light direction or no contributing geometry
    /// leaves the previous extents in place.
    pub fn run_pass(&mut self) -> &PassOutcome {
        let basis = match PlaneBasis::from_light(&self.scene.light) {
            Ok(basis) => basis,
            Err(err) => {
                warn!(%err, "skipping projection pass");
                self.last = PassOutcome {
                    skipped: Some(err),
                    ..PassOutcome::default()
                };
                return &self.last;
            }
        };

        let result = accumulate(&self.scene.meshes, &basis, &self.scene.light.position);

        let extents = fit_orthographic_extents(&result.bounds, self.policy);
        let skipped = match extents {
            Some(extents) => {
                let shadow = &mut self.scene.light.shadow;
                shadow.apply(extents);
                shadow.update_projection_matrix();
                None
            }
            None => {
                warn!("no contributing geometry, keeping previous shadow extents");
                Some(ProjectionError::EmptyContribution)
            }
        };

        debug!(
            points = result.points.len(),
            meshes = result.spans.len(),
            policy = self.policy.name(),
            ?extents,
            "projection pass"
        );

        self.last = PassOutcome {
            basis: Some(basis),
            result,
            extents,
            skipped,
        };
        &self.last
    }

    /// Hand the latest projected points to a preview surface
    pub fn present(&self, surface: &mut dyn PreviewSurface) {
        surface.render(&self.last.result.points);
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Scene::default(), FitPolicy::default())
    }
}
