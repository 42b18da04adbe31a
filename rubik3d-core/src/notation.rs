/// Compact move notation used to talk to external solvers
///
/// A move is written as an optional layer prefix, a face letter and an
/// optional turn suffix: `R` (one clockwise quarter turn), `R'` (one
/// counterclockwise), `R2` (half turn), `2R'` (second layer from `R`,
/// counterclockwise). Moves are separated by whitespace.
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, multispace1, one_of},
    combinator::{eof, map, map_res, opt, peek, value, verify},
    sequence::{terminated, tuple},
    IResult,
};

use crate::error::{CubeError, Result};
use crate::face::Face;
use crate::moves::{canon, Move};

/// Writes one move, e.g. `R`, `U'`, `F2` or `3L`. A net-zero turn writes nothing.
pub fn format_move(mv: &Move) -> String {
    let mut out = String::new();
    if canon(mv.turns) == 0 {
        return out;
    }
    if mv.layer > 0 {
        out.push_str(&(mv.layer + 1).to_string());
    }
    out.push(mv.face.letter());
    match canon(mv.turns) {
        -1 => out.push('\''),
        2 => out.push('2'),
        _ => {}
    }
    out
}

/// Writes a sequence of moves separated by single spaces. Zero turns are skipped.
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .filter(|mv| canon(mv.turns) != 0)
        .map(format_move)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a whitespace-separated move sequence. Empty input gives no moves.
pub fn parse_moves(input: &str) -> Result<Vec<Move>> {
    let mut moves = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        match parse_token(rest) {
            Ok((remaining, mv)) => {
                moves.push(mv);
                rest = remaining.trim_start();
            }
            Err(_) => {
                return Err(CubeError::InvalidNotation {
                    token: rest.split_whitespace().next().unwrap_or_default().to_string(),
                    position: input.len() - rest.len(),
                });
            }
        }
    }

    Ok(moves)
}

fn parse_token(input: &str) -> IResult<&str, Move> {
    let (input, (layer, face, turns)) = terminated(
        tuple((opt(parse_layer), parse_face, opt(parse_suffix))),
        peek(alt((multispace1, eof))),
    )(input)?;

    Ok((input, Move::new(face, turns.unwrap_or(1), layer.unwrap_or(0))))
}

fn parse_layer(input: &str) -> IResult<&str, usize> {
    map(
        verify(map_res(digit1, str::parse::<usize>), |n: &usize| *n >= 1),
        |n| n - 1,
    )(input)
}

fn parse_face(input: &str) -> IResult<&str, Face> {
    map_res(one_of("UDRLFB"), Face::from_letter)(input)
}

fn parse_suffix(input: &str) -> IResult<&str, i32> {
    alt((
        value(2, tag("2'")),
        value(-1, tag("'")),
        value(2, tag("2")),
        value(-1, tag("3")),
    ))(input)
}
