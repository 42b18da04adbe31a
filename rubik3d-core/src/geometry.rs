/// Sticker and face-plate templates
use nalgebra::Vector3;

/// Closed outline of one sticker: eight corners of a bevelled square plus the
/// first corner repeated.
pub type StickerOutline = [Vector3<f64>; 9];

/// Closed outline of one face plate: four corners plus the first repeated.
pub type PlateOutline = [Vector3<f64>; 5];

/// Unit face plate on the `+z` face, spanning the whole face.
const BASE_PLATE: [[f64; 3]; 5] = [
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Size of the coloured stickers relative to the plates they sit on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickerStyle {
    /// Fraction of a plate's width covered by its sticker
    pub width: f64,
    /// Outward offset of stickers from the plate surface
    pub thickness: f64,
}

impl StickerStyle {
    /// Gap between a sticker's edge and its plate's edge, in template units.
    pub fn edge(&self) -> f64 {
        0.5 * (1.0 - self.width)
    }

    /// Full-face sticker on the `+z` face.
    fn base_sticker(&self) -> StickerOutline {
        let edge = self.edge();
        let (d1, d2, d3) = (1.0 - edge, 1.0 - 2.0 * edge, 1.0 + self.thickness);
        [
            Vector3::new(d1, d2, d3),
            Vector3::new(d2, d1, d3),
            Vector3::new(-d2, d1, d3),
            Vector3::new(-d1, d2, d3),
            Vector3::new(-d1, -d2, d3),
            Vector3::new(-d2, -d1, d3),
            Vector3::new(d2, -d1, d3),
            Vector3::new(d1, -d2, d3),
            Vector3::new(d1, d2, d3),
        ]
    }
}

impl Default for StickerStyle {
    fn default() -> Self {
        Self {
            width: 0.88,
            thickness: 0.01,
        }
    }
}

/// One grid cell of the `+z` face before it is turned into place.
#[derive(Debug, Clone)]
pub(crate) struct Tile {
    pub plate: PlateOutline,
    pub sticker: StickerOutline,
    pub plate_centroid: Vector3<f64>,
    pub sticker_centroid: Vector3<f64>,
}

/// Splits the `+z` face into an `n`×`n` grid of tiles, row-major over (x, y).
pub(crate) fn face_tiles(n: usize, style: &StickerStyle) -> Vec<Tile> {
    let cell = 2.0 / n as f64;
    let shrink = |v: &Vector3<f64>| Vector3::new(v.x / n as f64, v.y / n as f64, v.z);
    let base_sticker = style.base_sticker();

    let mut tiles = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let offset = Vector3::new(
                -1.0 + (i as f64 + 0.5) * cell,
                -1.0 + (j as f64 + 0.5) * cell,
                0.0,
            );
            tiles.push(Tile {
                plate: BASE_PLATE.map(|p| shrink(&Vector3::from(p)) + offset),
                sticker: base_sticker.map(|p| shrink(&p) + offset),
                plate_centroid: Vector3::z() + offset,
                sticker_centroid: Vector3::new(0.0, 0.0, 1.0 + style.thickness) + offset,
            });
        }
    }
    tiles
}

/// Mean of the distinct corners of a closed outline.
pub fn outline_centroid(outline: &[Vector3<f64>]) -> Vector3<f64> {
    let corners = &outline[..outline.len().saturating_sub(1)];
    if corners.is_empty() {
        return Vector3::zeros();
    }
    corners.iter().sum::<Vector3<f64>>() / corners.len() as f64
}
