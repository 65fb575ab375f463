//! Packed move value.
//!
//! A move is 16 bits: source square, destination square and a 4-bit special
//! tag. Equality is structural, so two moves are equal iff all three match.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_name;

const FROM_SHIFT: u16 = 0;
const TO_SHIFT: u16 = 6;
const SPECIAL_SHIFT: u16 = 12;

const SQUARE_MASK: u16 = 0x3F;
const SPECIAL_MASK: u16 = 0xF;

const TAG_NONE: u16 = 0;
const TAG_EN_PASSANT: u16 = 1;
const TAG_CASTLE: u16 = 2;
/// Promotions use `TAG_PROMOTION | (kind.index() - 1)` for knight..queen.
const TAG_PROMOTION: u16 = 0x8;

/// Special tag carried by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMove {
    None,
    EnPassant,
    Castle,
    Promotion(PieceKind),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self::pack(from, to, TAG_NONE)
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self::pack(from, to, TAG_EN_PASSANT)
    }

    #[inline]
    pub const fn castle(from: Square, to: Square) -> Self {
        Self::pack(from, to, TAG_CASTLE)
    }

    /// `piece` must be a knight, bishop, rook or queen.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Self {
        Self::pack(from, to, TAG_PROMOTION | (piece.index() as u16 - 1))
    }

    #[inline]
    const fn pack(from: Square, to: Square, tag: u16) -> Self {
        Move(
            ((from as u16 & SQUARE_MASK) << FROM_SHIFT)
                | ((to as u16 & SQUARE_MASK) << TO_SHIFT)
                | (tag << SPECIAL_SHIFT),
        )
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    const fn tag(self) -> u16 {
        (self.0 >> SPECIAL_SHIFT) & SPECIAL_MASK
    }

    pub fn special(self) -> SpecialMove {
        match self.tag() {
            TAG_EN_PASSANT => SpecialMove::EnPassant,
            TAG_CASTLE => SpecialMove::Castle,
            tag if tag & TAG_PROMOTION != 0 => self
                .promotion_piece()
                .map_or(SpecialMove::None, SpecialMove::Promotion),
            _ => SpecialMove::None,
        }
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.tag() == TAG_EN_PASSANT
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.tag() == TAG_CASTLE
    }

    #[inline]
    pub fn promotion_piece(self) -> Option<PieceKind> {
        let tag = self.tag();
        if tag & TAG_PROMOTION == 0 {
            return None;
        }
        PieceKind::from_index(((tag & 0x3) + 1) as usize)
    }

    /// Raw 16-bit encoding.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.special() {
            SpecialMove::None => write!(f, "Move({self})"),
            SpecialMove::EnPassant => write!(f, "Move({self} ep)"),
            SpecialMove::Castle => write!(f, "Move({self} castle)"),
            SpecialMove::Promotion(_) => write!(f, "Move({self} promo)"),
        }
    }
}
