/// Cube state: geometry of every sticker and plate, layer turns and move history
use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix3, Vector3};
use rand::Rng;

use crate::error::{CubeError, Result};
use crate::face::Face;
use crate::geometry::{face_tiles, PlateOutline, StickerOutline, StickerStyle};
use crate::moves::{Move, MoveList};
use crate::quaternion::Quaternion;

/// Sort keys are snapped to this grid so rounding noise never decides the order
const KEY_SCALE: f64 = 1e6;

/// Margin added to each side of a layer band, capped at a quarter layer
const LAYER_MARGIN: f64 = 0.1;

/// Tolerance when checking whether a sticker lies on a face
const SOLVED_TOLERANCE: f64 = 1e-6;

/// An N×N×N cube, stored as parallel arrays with one entry per sticker.
///
/// Entry `i` of every array describes the same piece of surface: plate
/// outline, sticker outline, plate centroid, sticker centroid and the
/// face-id (colour group) of the sticker. Construction puts the arrays in
/// ascending (x, y, z, face-id) order of the plate centroids; turns move
/// coordinates in place and never reorder entries, so an index keeps naming
/// the same sticker for the life of the cube.
#[derive(Debug, Clone)]
pub struct CubeState {
    n: usize,
    style: StickerStyle,
    plates: Vec<PlateOutline>,
    stickers: Vec<StickerOutline>,
    plate_centroids: Vec<Vector3<f64>>,
    sticker_centroids: Vec<Vector3<f64>>,
    face_ids: Vec<u8>,
    moves: MoveList,
}

impl CubeState {
    /// A solved cube with `n` layers per axis and default sticker proportions.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_style(n, StickerStyle::default())
    }

    pub fn with_style(n: usize, style: StickerStyle) -> Result<Self> {
        if n == 0 {
            return Err(CubeError::InvalidSize);
        }

        let count = 6 * n * n;
        let mut cube = Self {
            n,
            style,
            plates: Vec::with_capacity(count),
            stickers: Vec::with_capacity(count),
            plate_centroids: Vec::with_capacity(count),
            sticker_centroids: Vec::with_capacity(count),
            face_ids: Vec::with_capacity(count),
            moves: MoveList::new(),
        };

        let tiles = face_tiles(n, &style);
        for id in 0..6 {
            let Some(face) = Face::from_id(id) else {
                continue;
            };
            let (axis, angle) = face.orientation();
            let m = Quaternion::from_axis_angle(&axis, angle)?.to_rotation_matrix();
            for tile in &tiles {
                cube.plates.push(tile.plate.map(|v| m * v));
                cube.stickers.push(tile.sticker.map(|v| m * v));
                cube.plate_centroids.push(m * tile.plate_centroid);
                cube.sticker_centroids.push(m * tile.sticker_centroid);
                cube.face_ids.push(id);
            }
        }

        cube.sort_canonically();
        log::debug!("built {n}x{n}x{n} cube with {count} stickers");
        Ok(cube)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of stickers, `6·n²`.
    pub fn len(&self) -> usize {
        self.face_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face_ids.is_empty()
    }

    pub fn style(&self) -> &StickerStyle {
        &self.style
    }

    pub fn plates(&self) -> &[PlateOutline] {
        &self.plates
    }

    pub fn stickers(&self) -> &[StickerOutline] {
        &self.stickers
    }

    pub fn plate_centroids(&self) -> &[Vector3<f64>] {
        &self.plate_centroids
    }

    pub fn sticker_centroids(&self) -> &[Vector3<f64>] {
        &self.sticker_centroids
    }

    pub fn face_ids(&self) -> &[u8] {
        &self.face_ids
    }

    pub fn moves(&self) -> &MoveList {
        &self.moves
    }

    /// Forgets the move history without touching the geometry.
    pub fn clear_moves(&mut self) {
        self.moves.clear();
    }

    /// Turns layer `layer` (0 = outermost) under the face named by `face` by
    /// `turns` clockwise quarter turns and records the move.
    pub fn rotate_face(&mut self, face: char, turns: i32, layer: usize) -> Result<()> {
        let face = Face::from_letter(face)?;
        self.apply_move(Move::new(face, turns, layer))
    }

    pub fn apply_move(&mut self, mv: Move) -> Result<()> {
        self.check_layer(mv.layer)?;
        log::debug!("turning {mv:?}");
        self.turn_layer(mv.face, f64::from(mv.turns), mv.layer)?;
        self.moves.push(mv);
        Ok(())
    }

    /// Applies a sequence of moves. Every layer is validated before anything turns.
    pub fn apply_moves(&mut self, moves: &[Move]) -> Result<()> {
        for mv in moves {
            self.check_layer(mv.layer)?;
        }
        moves.iter().try_for_each(|&mv| self.apply_move(mv))
    }

    /// Turns a layer in `steps` equal partial turns, calling `on_step` after
    /// each one, and records a single move. Used to animate a turn.
    pub fn rotate_face_stepped(
        &mut self,
        mv: Move,
        steps: usize,
        mut on_step: impl FnMut(&CubeState),
    ) -> Result<()> {
        self.check_layer(mv.layer)?;
        let steps = steps.max(1);
        let fraction = f64::from(mv.turns) / steps as f64;
        log::debug!("turning {mv:?} in {steps} steps");
        for _ in 0..steps {
            self.turn_layer(mv.face, fraction, mv.layer)?;
            on_step(&*self);
        }
        self.moves.push(mv);
        Ok(())
    }

    /// Applies `count` random outer-layer quarter turns.
    pub fn scramble<R: Rng>(&mut self, rng: &mut R, count: usize) -> Result<()> {
        for _ in 0..count {
            let face = Face::ALL[rng.random_range(0..Face::ALL.len())];
            let turns = if rng.random_bool(0.5) { 1 } else { -1 };
            self.apply_move(Move::new(face, turns, 0))?;
        }
        Ok(())
    }

    /// Undoes the whole move history at once and clears it.
    pub fn undo_all(&mut self) -> Result<()> {
        for mv in self.moves.inverse() {
            self.turn_layer(mv.face, f64::from(mv.turns), mv.layer)?;
        }
        self.moves.clear();
        Ok(())
    }

    /// Undoes the last recorded move, returning it.
    pub fn undo_last(&mut self) -> Result<Option<Move>> {
        let Some(mv) = self.moves.pop() else {
            return Ok(None);
        };
        let inverse = mv.inverse();
        self.turn_layer(inverse.face, f64::from(inverse.turns), inverse.layer)?;
        Ok(Some(mv))
    }

    /// Indices of the stickers whose plates lie in layer `layer` under `face`,
    /// judged from their current positions.
    ///
    /// A plate belongs to the layer when the projection of its centroid on the
    /// face axis falls in `(1 - m - (layer + 1)·w, 1 + m - layer·w]`, with
    /// `w = 2/n` the width of one layer and `m = min(0.1, w/4)`. For `n <= 5`
    /// that is `(0.9 - (layer + 1)·w, 1.1 - layer·w]`.
    pub fn layer_indices(&self, face: Face, layer: usize) -> Vec<usize> {
        let axis = face.axis();
        let width = 2.0 / self.n as f64;
        let margin = LAYER_MARGIN.min(width / 4.0);
        let lower = 1.0 - margin - (layer + 1) as f64 * width;
        let upper = 1.0 + margin - layer as f64 * width;

        self.plate_centroids
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                let proj = c.dot(&axis);
                proj > lower && proj <= upper
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether every colour group lies entirely on one face.
    pub fn is_solved(&self) -> bool {
        let surface = 1.0 + self.style.thickness;
        (0..6u8).all(|id| {
            let group = self
                .face_ids
                .iter()
                .zip(&self.sticker_centroids)
                .filter(|(&face_id, _)| face_id == id)
                .map(|(_, c)| c);
            Face::ALL.iter().any(|face| {
                let axis = face.axis();
                group
                    .clone()
                    .all(|c| (c.dot(&axis) - surface).abs() < SOLVED_TOLERANCE)
            })
        })
    }

    /// Permutation that would sort the arrays by (x, y, z, face-id) of the
    /// plate centroids, with coordinates snapped to a 1e-6 grid.
    pub fn canonical_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.compare_keys(a, b));
        order
    }

    pub fn is_canonically_sorted(&self) -> bool {
        (1..self.len()).all(|i| self.compare_keys(i - 1, i) != Ordering::Greater)
    }

    fn sort_key(&self, i: usize) -> (i64, i64, i64, u8) {
        let snap = |v: f64| (v * KEY_SCALE).round() as i64;
        let c = &self.plate_centroids[i];
        (snap(c.x), snap(c.y), snap(c.z), self.face_ids[i])
    }

    fn compare_keys(&self, a: usize, b: usize) -> Ordering {
        self.sort_key(a).cmp(&self.sort_key(b))
    }

    fn sort_canonically(&mut self) {
        let order = self.canonical_order();
        self.plates = order.iter().map(|&i| self.plates[i]).collect();
        self.stickers = order.iter().map(|&i| self.stickers[i]).collect();
        self.plate_centroids = order.iter().map(|&i| self.plate_centroids[i]).collect();
        self.sticker_centroids = order.iter().map(|&i| self.sticker_centroids[i]).collect();
        self.face_ids = order.iter().map(|&i| self.face_ids[i]).collect();
    }

    fn check_layer(&self, layer: usize) -> Result<()> {
        if layer >= self.n {
            return Err(CubeError::LayerOutOfRange { layer, n: self.n });
        }
        Ok(())
    }

    /// Rotates the geometry of one layer without touching the move history.
    fn turn_layer(&mut self, face: Face, quarter_turns: f64, layer: usize) -> Result<()> {
        // Clockwise seen from outside the face is negative about its outward axis
        let rotation = Quaternion::from_axis_angle(&face.axis(), -quarter_turns * FRAC_PI_2)?;
        let m = rotation.to_rotation_matrix();
        let selected = self.layer_indices(face, layer);
        log::trace!("rotating {} pieces of layer {layer} under {face}", selected.len());

        for &i in &selected {
            rotate_all(&m, &mut self.stickers[i]);
            rotate_all(&m, &mut self.plates[i]);
            self.sticker_centroids[i] = m * self.sticker_centroids[i];
            self.plate_centroids[i] = m * self.plate_centroids[i];
        }
        Ok(())
    }
}

fn rotate_all(m: &Matrix3<f64>, points: &mut [Vector3<f64>]) {
    for p in points {
        *p = m * *p;
    }
}
