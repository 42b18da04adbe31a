/// Rubik3D Core Library - geometry and move logic for N×N×N twisty cubes
///
/// This library keeps every sticker and face plate of a cube in 3D, turns
/// layers with quaternion rotations, records a canonical move history and
/// projects points onto a 2D view plane for a renderer to draw.

pub mod cube;
pub mod error;
pub mod face;
pub mod geometry;
pub mod moves;
pub mod notation;
pub mod projection;
pub mod quaternion;
pub mod solver;

// Re-export commonly used types
pub use cube::CubeState;
pub use error::{CubeError, Result, ViewDegeneracy};
pub use face::{Face, Palette};
pub use geometry::{PlateOutline, StickerOutline, StickerStyle};
pub use moves::{canon, Move, MoveList};
pub use projection::{draw_order, project_points, project_polygons, Camera, Projected};
pub use quaternion::Quaternion;
pub use solver::{solve_with, SolveError, Solver};
