/// Boundary to an external solving library
use thiserror::Error;

use crate::cube::CubeState;
use crate::error::CubeError;
use crate::moves::Move;
use crate::notation::parse_moves;

/// A solver that speaks the compact move notation.
///
/// Given the scramble applied to a solved cube (e.g. `"R U' F2"`), returns a
/// sequence in the same notation that solves it.
pub trait Solver {
    type Error: std::error::Error + 'static;

    fn solve(&self, scramble: &str) -> Result<String, Self::Error>;
}

/// Failure while asking a [`Solver`] for a solution.
#[derive(Error, Debug)]
pub enum SolveError<E: std::error::Error + 'static> {
    #[error("solver failed: {0}")]
    Solver(#[source] E),
    #[error("solver returned unreadable moves: {0}")]
    Reply(#[source] CubeError),
}

/// Hands the cube's move history to `solver` and parses its answer into moves
/// ready for [`CubeState::apply_moves`]. The cube itself is not touched.
pub fn solve_with<S: Solver>(cube: &CubeState, solver: &S) -> Result<Vec<Move>, SolveError<S::Error>> {
    let scramble = cube.moves().to_notation();
    log::debug!("asking solver to solve {scramble:?}");
    let reply = solver.solve(&scramble).map_err(SolveError::Solver)?;
    parse_moves(&reply).map_err(SolveError::Reply)
}
