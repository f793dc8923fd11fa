/// Planar projection of scene geometry onto the light's image plane
use nalgebra::{Point2, Point3, Vector3};
use std::ops::Range;

use crate::basis::PlaneBasis;
use crate::geometry::Mesh;

/// Coordinates of `point` in the plane through `origin` spanned by `axis1`/`axis2`
pub fn project(
    origin: &Point3<f32>,
    point: &Point3<f32>,
    axis1: &Vector3<f32>,
    axis2: &Vector3<f32>,
) -> Point2<f32> {
    let offset = point - origin;
    Point2::new(offset.dot(axis1), offset.dot(axis2))
}

/// Running 2D bounding box; starts inverted at ±infinity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl Bounds2D {
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f32::INFINITY, f32::INFINITY),
            max: Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn include(&mut self, point: &Point2<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// No point has been folded in yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Inclusive containment
    pub fn contains(&self, point: &Point2<f32>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

impl Default for Bounds2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// Where one mesh's points sit inside `ProjectionResult::points`
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSpan {
    pub name: String,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionResult {
    /// Contributing-mesh order, then vertex order within each mesh
    pub points: Vec<Point2<f32>>,
    pub bounds: Bounds2D,
    pub spans: Vec<MeshSpan>,
}

impl ProjectionResult {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Project every vertex of every contributing mesh through `basis`
pub fn accumulate(meshes: &[Mesh], basis: &PlaneBasis, origin: &Point3<f32>) -> ProjectionResult {
    let mut result = ProjectionResult::default();

    for mesh in meshes.iter().filter(|m| m.contributes) {
        let start = result.points.len();
        for vertex in mesh.world_vertices() {
            let uv = project(origin, &vertex, &basis.p1, &basis.p2);
            result.bounds.include(&uv);
            result.points.push(uv);
        }
        result.spans.push(MeshSpan {
            name: mesh.name.clone(),
            range: start..result.points.len(),
        });
    }

    result
}
