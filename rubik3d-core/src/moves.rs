/// Move records and the canonical move history
use std::fmt;

use crate::face::Face;

/// Reduces a quarter-turn count to the canonical range `(-2, 2]`.
///
/// | `n mod 4` | result |
/// |-----------|--------|
/// | 0         | 0      |
/// | 1         | 1      |
/// | 2         | 2      |
/// | 3         | -1     |
///
/// So `-4 → 0`, `-3 → 1`, `-2 → 2`, `-1 → -1` and `4 → 0`.
pub fn canon(n: i32) -> i32 {
    match n.rem_euclid(4) {
        3 => -1,
        r => r,
    }
}

/// A turn of one layer: `turns` quarter turns, clockwise seen from outside `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub face: Face,
    pub turns: i32,
    /// 0 is the outer layer on `face`
    pub layer: usize,
}

impl Move {
    pub fn new(face: Face, turns: i32, layer: usize) -> Self {
        Self { face, turns, layer }
    }

    /// The move that undoes this one, with its turn in canonical form.
    pub fn inverse(self) -> Self {
        Self {
            turns: -canon(self.turns),
            ..self
        }
    }

    fn same_slice(&self, other: &Self) -> bool {
        self.face == other.face && self.layer == other.layer
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::notation::format_move(self))
    }
}

/// Minimal log of the moves applied since creation or the last clear.
///
/// No two neighbouring entries turn the same slice, and no entry has a net
/// turn of zero: pushing a move onto a matching last entry merges them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move, merging it into the last entry when both turn the same slice.
    pub fn push(&mut self, mv: Move) {
        match self.moves.last_mut() {
            Some(last) if last.same_slice(&mv) => {
                let total = canon(last.turns + canon(mv.turns));
                if total == 0 {
                    log::trace!("{mv:?} cancels {last:?}");
                    self.moves.pop();
                } else {
                    log::trace!("{mv:?} merges into {last:?}");
                    last.turns = total;
                }
            }
            _ => {
                let turns = canon(mv.turns);
                if turns != 0 {
                    self.moves.push(Move { turns, ..mv });
                }
            }
        }
    }

    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Moves that undo the whole history, in the order they must be applied.
    pub fn inverse(&self) -> Vec<Move> {
        self.moves.iter().rev().map(|mv| mv.inverse()).collect()
    }

    /// Compact notation for the whole history, e.g. `"R U' F2"`.
    pub fn to_notation(&self) -> String {
        crate::notation::format_moves(&self.moves)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl Extend<Move> for MoveList {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        for mv in iter {
            self.push(mv);
        }
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
