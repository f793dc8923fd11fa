/// Error types shared by the projection pipeline
use nalgebra::Point3;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Light target coincides with the light position
    #[error("Light direction has zero length (position {position:?}, target {target:?})")]
    ZeroLengthDirection {
        position: Point3<f32>,
        target: Point3<f32>,
    },

    #[error("No mesh contributes to the projection")]
    EmptyContribution,

    #[error("Vertex buffer length {0} is not a multiple of 3")]
    MalformedVertexBuffer(usize),

    #[error("Failed to parse STL: {0}")]
    Stl(String),

    #[error("Invalid scene configuration: {0}")]
    Config(String),

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl From<toml::de::Error> for ProjectionError {
    fn from(err: toml::de::Error) -> Self {
        ProjectionError::Config(err.to_string())
    }
}
