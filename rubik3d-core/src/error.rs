/// Error types shared by every module of the crate
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = CubeError> = std::result::Result<T, E>;

/// Errors produced by cube construction, turns, projection and notation parsing.
///
/// All of these are caller-input errors. Any operation that returns one has
/// left the cube untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubeError {
    /// Cube size must be at least one layer
    #[error("cube size must be positive")]
    InvalidSize,
    /// Face letter is not one of `U`, `D`, `R`, `L`, `F`, `B`
    #[error("unknown face {0:?}")]
    UnknownFace(char),
    /// Rotation axis is the zero vector
    #[error("rotation axis must be non-zero")]
    InvalidAxis,
    /// Layer index is not smaller than the cube size
    #[error("layer {layer} out of range for a cube of size {n}")]
    LayerOutOfRange { layer: usize, n: usize },
    /// Camera configuration cannot produce a view
    #[error("degenerate view: {0}")]
    DegenerateView(ViewDegeneracy),
    /// Move notation could not be parsed
    #[error("invalid move {token:?} at byte {position}")]
    InvalidNotation { token: String, position: usize },
}

/// Reason a projection was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDegeneracy {
    /// The up vector is parallel to the camera vector (or the camera sits at the origin)
    #[error("up vector is parallel to the camera vector")]
    UpParallelToView,
    /// A point lies in the plane through the camera perpendicular to the view
    /// direction, so its perspective divisor is zero (or is not finite)
    #[error("point {index} lies in the camera's eye plane")]
    PointInEyePlane { index: usize },
}
