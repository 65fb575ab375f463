//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square/bitboard representations reused by FEN and move-text components.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Bitboard, Square};

#[rustfmt::skip]
const SQUARE_NAMES: [&str; 64] = [
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
];

/// Name of a square index. Indices above 63 wrap onto the board.
#[inline]
pub fn square_name(square: Square) -> &'static str {
    SQUARE_NAMES[(square & 63) as usize]
}

/// Convert algebraic notation (for example: "e4") to a square index.
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert algebraic notation to a one-hot bitboard.
#[inline]
pub fn algebraic_to_bitboard(square: &str) -> ChessResult<Bitboard> {
    Ok(1u64 << algebraic_to_square(square)?)
}

/// Names of every set square, low to high. Handy in test failure output.
pub fn bitboard_to_names(mut bitboard: Bitboard) -> Vec<&'static str> {
    let mut out = Vec::with_capacity(bitboard.count_ones() as usize);
    while bitboard != 0 {
        let sq = bitboard.trailing_zeros() as Square;
        out.push(square_name(sq));
        bitboard &= bitboard - 1;
    }
    out
}
