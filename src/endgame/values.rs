//! Value and scale-factor units shared by the endgame functions.

use crate::game_state::chess_types::PieceKind;

/// Centipawn-like score.
pub type Value = i32;

pub const VALUE_DRAW: Value = 0;
pub const VALUE_KNOWN_WIN: Value = 15_000;

pub const PAWN_VALUE_EG: Value = 258;
pub const KNIGHT_VALUE_EG: Value = 846;
pub const BISHOP_VALUE_EG: Value = 857;
pub const ROOK_VALUE_EG: Value = 1_278;
pub const QUEEN_VALUE_EG: Value = 2_558;

pub const PAWN_VALUE_MG: Value = 198;
pub const KNIGHT_VALUE_MG: Value = 817;
pub const BISHOP_VALUE_MG: Value = 836;
pub const ROOK_VALUE_MG: Value = 1_270;
pub const QUEEN_VALUE_MG: Value = 2_521;

/// Multiplier in `0..=SCALE_FACTOR_MAX` applied to an endgame score,
/// `SCALE_FACTOR_NORMAL` meaning unchanged.
pub type ScaleFactor = u8;

pub const SCALE_FACTOR_DRAW: ScaleFactor = 0;
pub const SCALE_FACTOR_NORMAL: ScaleFactor = 64;
pub const SCALE_FACTOR_MAX: ScaleFactor = 128;
/// The scaler did not recognise its pattern.
pub const SCALE_FACTOR_NONE: ScaleFactor = 255;

#[inline]
pub const fn piece_value_mg(kind: PieceKind) -> Value {
    match kind {
        PieceKind::Pawn => PAWN_VALUE_MG,
        PieceKind::Knight => KNIGHT_VALUE_MG,
        PieceKind::Bishop => BISHOP_VALUE_MG,
        PieceKind::Rook => ROOK_VALUE_MG,
        PieceKind::Queen => QUEEN_VALUE_MG,
        PieceKind::King => 0,
    }
}

#[inline]
pub const fn piece_value_eg(kind: PieceKind) -> Value {
    match kind {
        PieceKind::Pawn => PAWN_VALUE_EG,
        PieceKind::Knight => KNIGHT_VALUE_EG,
        PieceKind::Bishop => BISHOP_VALUE_EG,
        PieceKind::Rook => ROOK_VALUE_EG,
        PieceKind::Queen => QUEEN_VALUE_EG,
        PieceKind::King => 0,
    }
}
