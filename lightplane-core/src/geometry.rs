/// Scene meshes and world-space vertex sampling
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{ProjectionError, Result};
use crate::stl;
use crate::transform::{RotationState, Transform};

/// A named mesh: a flat local vertex buffer plus its placement in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    /// Local positions as consecutive `x, y, z` triples
    pub vertices: Vec<f32>,
    pub position: Point3<f32>,
    pub rotation: RotationState,
    pub scale: Vector3<f32>,
    /// Whether the mesh takes part in the projection pass
    pub contributes: bool,
    /// Keep the mesh resting on the ground plane when its height changes
    pub grounded: bool,
}

impl Mesh {
    pub fn from_vertex_buffer(name: impl Into<String>, vertices: Vec<f32>) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(ProjectionError::MalformedVertexBuffer(vertices.len()));
        }

        Ok(Self {
            name: name.into(),
            vertices,
            position: Point3::origin(),
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            contributes: true,
            grounded: false,
        })
    }

    /// Load an ASCII or binary STL file as a contributing mesh
    pub fn from_stl(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        Self::from_vertex_buffer(name, stl::parse_stl(data)?)
    }

    /// Unit cube centred on the origin, four vertices per face.
    ///
    /// Faces are emitted in the order +x, -x, +y, -y, +z, -z and each face
    /// walks its corners row by row, matching the box geometry of common
    /// scene-graph engines so projected point order lines up with theirs.
    pub fn unit_box(name: impl Into<String>) -> Self {
        let mut vertices = Vec::with_capacity(24 * 3);

        push_face(&mut vertices, [2, 1, 0], -1.0, -1.0, 0.5);
        push_face(&mut vertices, [2, 1, 0], 1.0, -1.0, -0.5);
        push_face(&mut vertices, [0, 2, 1], 1.0, 1.0, 0.5);
        push_face(&mut vertices, [0, 2, 1], 1.0, -1.0, -0.5);
        push_face(&mut vertices, [0, 1, 2], 1.0, -1.0, 0.5);
        push_face(&mut vertices, [0, 1, 2], -1.0, -1.0, -0.5);

        Self {
            name: name.into(),
            vertices,
            position: Point3::origin(),
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            contributes: true,
            grounded: false,
        }
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self.rest_on_ground();
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self.rest_on_ground();
        self
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation.wrapped();
        self
    }

    pub fn grounded(mut self) -> Self {
        self.grounded = true;
        self.rest_on_ground();
        self
    }

    /// Lift a grounded mesh so its base touches `y = 0`
    pub fn rest_on_ground(&mut self) {
        if self.grounded {
            self.position.y = self.scale.y * 0.5;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Local-to-world matrix built from the current position, rotation and scale
    pub fn world_matrix(&self) -> Matrix4<f32> {
        Transform::compose(&self.position, &self.rotation, &self.scale)
    }

    /// World-space positions in vertex-declaration order.
    ///
    /// The matrix is composed on every call, so the result always reflects
    /// the mesh's current placement.
    pub fn world_vertices(&self) -> Vec<Point3<f32>> {
        let world = self.world_matrix();
        self.vertices
            .chunks_exact(3)
            .map(|v| world.transform_point(&Point3::new(v[0], v[1], v[2])))
            .collect()
    }
}

/// Append one face of the unit box.
///
/// `axes` maps the face's (u, v, w) onto (x, y, z) indices; `w` is the fixed
/// coordinate of the face.
fn push_face(buffer: &mut Vec<f32>, axes: [usize; 3], u_dir: f32, v_dir: f32, w: f32) {
    let [u, v, w_axis] = axes;
    for iy in 0..2 {
        for ix in 0..2 {
            let mut corner = [0.0f32; 3];
            corner[u] = (ix as f32 - 0.5) * u_dir;
            corner[v] = (iy as f32 - 0.5) * v_dir;
            corner[w_axis] = w;
            buffer.extend_from_slice(&corner);
        }
    }
}
