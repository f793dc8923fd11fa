/// Lightplane Web - WASM bindings and canvas preview
///
/// Exposes the projection pipeline's setters to a browser page and draws the
/// projected points onto a 2D canvas.
use lightplane_core::{FitPolicy, Pipeline, PreviewSurface, RotationState, SceneUpdate};
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const CANVAS_WIDTH: u32 = 350;
/// 16:9 of the width
pub const CANVAS_HEIGHT: u32 = 197;
const POINT_RADIUS: f64 = 5.0;

/// Draws points as filled discs around the canvas centre
pub struct CanvasPreview {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPreview {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(CANVAS_WIDTH);
        canvas.set_height(CANVAS_HEIGHT);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            context,
            width: CANVAS_WIDTH as f64,
            height: CANVAS_HEIGHT as f64,
        })
    }

    fn refresh(&self) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
        self.context.set_fill_style_str("#FFFFFF");
        self.context.fill_rect(0.0, 0.0, self.width, self.height);
    }
}

impl PreviewSurface for CanvasPreview {
    fn render(&mut self, points: &[Point2<f32>]) {
        self.refresh();

        let (ox, oy) = (self.width * 0.5, self.height * 0.5);
        self.context.set_fill_style_str("#000000");
        for point in points {
            self.context.begin_path();
            if self
                .context
                .arc(point.x as f64 + ox, point.y as f64 + oy, POINT_RADIUS, 0.0, TAU)
                .is_err()
            {
                continue;
            }
            self.context.close_path();
            self.context.fill();
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        let canvas = self.context.canvas();
        if let Some(canvas) = canvas {
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
        }
        self.width = width as f64;
        self.height = height as f64;
    }
}

#[wasm_bindgen]
pub struct WebPipeline {
    pipeline: Pipeline,
    preview: CanvasPreview,
}

#[wasm_bindgen]
impl WebPipeline {
    /// Attach to the `<canvas>` with the given id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebPipeline, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into::<HtmlCanvasElement>()?;

        Ok(WebPipeline {
            pipeline: Pipeline::default(),
            preview: CanvasPreview::new(&canvas)?,
        })
    }

    /// Redraw the preview from the latest pass; call once per frame
    pub fn render(&mut self) {
        self.pipeline.present(&mut self.preview);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.preview.resize(width, height);
    }

    pub fn mesh_count(&self) -> usize {
        self.pipeline.scene().meshes.len()
    }

    pub fn set_mesh_scale(&mut self, mesh: usize, x: f32, y: f32, z: f32) {
        self.pipeline.dispatch(SceneUpdate::MeshScale {
            mesh,
            scale: Vector3::new(x, y, z),
        });
    }

    /// Rotation about the vertical axis, radians
    pub fn set_mesh_rotation(&mut self, mesh: usize, y: f32) {
        self.pipeline.dispatch(SceneUpdate::MeshRotation {
            mesh,
            rotation: RotationState::new(0.0, y, 0.0),
        });
    }

    pub fn set_contributes(&mut self, mesh: usize, contributes: bool) {
        self.pipeline
            .dispatch(SceneUpdate::Contribution { mesh, contributes });
    }

    pub fn set_light_position(&mut self, x: f32, y: f32, z: f32) {
        self.pipeline
            .dispatch(SceneUpdate::LightPosition(Point3::new(x, y, z)));
    }

    pub fn set_light_target(&mut self, x: f32, y: f32, z: f32) {
        self.pipeline
            .dispatch(SceneUpdate::LightTarget(Point3::new(x, y, z)));
    }

    pub fn set_light_color(&mut self, color: u32) {
        self.pipeline.dispatch(SceneUpdate::LightColor(color));
    }

    pub fn set_light_intensity(&mut self, intensity: f32) {
        self.pipeline.dispatch(SceneUpdate::LightIntensity(intensity));
    }

    pub fn set_ambient_intensity(&mut self, intensity: f32) {
        self.pipeline.dispatch(SceneUpdate::AmbientIntensity(intensity));
    }

    /// "tight" or "symmetric"
    pub fn set_fit_policy(&mut self, policy: &str) -> Result<(), JsValue> {
        let policy: FitPolicy = policy.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.pipeline.set_policy(policy);
        Ok(())
    }

    /// Projected points as `[u0, v0, u1, v1, ...]`
    pub fn points(&self) -> Vec<f32> {
        flatten_points(&self.pipeline.last_pass().result.points)
    }

    /// Shadow camera `[left, right, top, bottom]`
    pub fn extents(&self) -> Vec<f32> {
        let e = self.pipeline.scene().light.shadow.extents;
        vec![e.left, e.right, e.top, e.bottom]
    }
}

fn flatten_points(points: &[Point2<f32>]) -> Vec<f32> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_points() {
        let flat = flatten_points(&[Point2::new(1.0, -2.0), Point2::new(3.5, 4.0)]);
        assert_eq!(flat, vec![1.0, -2.0, 3.5, 4.0]);
    }
}
