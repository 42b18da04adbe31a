/// The six faces of the cube, their axes and colours
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use nalgebra::Vector3;

use crate::error::{CubeError, Result};

/// One of the six outer faces, named by standard cube notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    U,
    D,
    R,
    L,
    F,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::D, Face::R, Face::L, Face::F, Face::B];

    /// Faces in face-id (colour group) order.
    const BY_ID: [Face; 6] = [Face::D, Face::U, Face::R, Face::L, Face::B, Face::F];

    pub fn from_letter(letter: char) -> Result<Self> {
        match letter {
            'U' => Ok(Face::U),
            'D' => Ok(Face::D),
            'R' => Ok(Face::R),
            'L' => Ok(Face::L),
            'F' => Ok(Face::F),
            'B' => Ok(Face::B),
            other => Err(CubeError::UnknownFace(other)),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::D => 'D',
            Face::R => 'R',
            Face::L => 'L',
            Face::F => 'F',
            Face::B => 'B',
        }
    }

    /// Outward unit normal of this face.
    pub fn axis(self) -> Vector3<f64> {
        match self {
            Face::U => Vector3::y(),
            Face::D => -Vector3::y(),
            Face::R => Vector3::x(),
            Face::L => -Vector3::x(),
            Face::F => Vector3::z(),
            Face::B => -Vector3::z(),
        }
    }

    /// Colour group of the stickers that start on this face.
    pub fn id(self) -> u8 {
        match self {
            Face::D => 0,
            Face::U => 1,
            Face::R => 2,
            Face::L => 3,
            Face::B => 4,
            Face::F => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::BY_ID.get(id as usize).copied()
    }

    /// Axis and angle that carry the `+z` face template onto this face.
    pub(crate) fn orientation(self) -> (Vector3<f64>, f64) {
        match self {
            Face::D => (Vector3::x(), FRAC_PI_2),
            Face::U => (Vector3::x(), -FRAC_PI_2),
            Face::R => (Vector3::y(), FRAC_PI_2),
            Face::L => (Vector3::y(), -FRAC_PI_2),
            Face::B => (Vector3::y(), PI),
            Face::F => (Vector3::y(), 2.0 * PI),
        }
    }
}

impl TryFrom<char> for Face {
    type Error = CubeError;

    fn try_from(letter: char) -> Result<Self> {
        Self::from_letter(letter)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// RGB colours for stickers (indexed by face-id) and the face plates behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    pub faces: [[u8; 3]; 6],
    pub plate: [u8; 3],
}

impl Palette {
    pub fn sticker_color(&self, face_id: u8) -> Option<[u8; 3]> {
        self.faces.get(face_id as usize).copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            faces: [
                [0xff, 0xff, 0xff], // D
                [0xff, 0xde, 0x24], // U
                [0x00, 0x00, 0xb3], // R
                [0x00, 0x9f, 0x0f], // L
                [0xff, 0x82, 0x14], // B
                [0xe0, 0x00, 0x00], // F
            ],
            plate: [0, 0, 0],
        }
    }
}
