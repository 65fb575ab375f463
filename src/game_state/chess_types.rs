/// Core value types shared by the board, the attack tables and move generation.
///
/// Squares are `rank * 8 + file` with `0 == a1` and `63 == h8`. A bitboard has
/// bit `i` set iff square `i` carries whatever property the board describes.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices in the order generation emits them.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<PieceKind> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase FEN letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    #[inline]
    pub fn from_fen_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

pub type Bitboard = u64;

/// Board square index (`0..=63`).
pub type Square = u8;

/// Compact castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0x0F;

#[inline]
pub const fn kingside_right(color: Color) -> CastlingRights {
    match color {
        Color::Light => CASTLE_LIGHT_KINGSIDE,
        Color::Dark => CASTLE_DARK_KINGSIDE,
    }
}

#[inline]
pub const fn queenside_right(color: Color) -> CastlingRights {
    match color {
        Color::Light => CASTLE_LIGHT_QUEENSIDE,
        Color::Dark => CASTLE_DARK_QUEENSIDE,
    }
}

#[inline]
pub const fn square_bit(square: Square) -> Bitboard {
    1u64 << square
}

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square & 7
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square >> 3
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// Mirror a1 <-> a8.
#[inline]
pub const fn flip_vertical(square: Square) -> Square {
    square ^ 56
}

/// Mirror a1 <-> h1.
#[inline]
pub const fn flip_horizontal(square: Square) -> Square {
    square ^ 7
}

/// True when the two squares have different colors on the checkerboard.
#[inline]
pub const fn opposite_colors(a: Square, b: Square) -> bool {
    ((file_of(a) + rank_of(a)) ^ (file_of(b) + rank_of(b))) & 1 != 0
}

/// Index of the least significant set bit; clears it from `bitboard`.
#[inline]
pub fn pop_lsb(bitboard: &mut Bitboard) -> Square {
    let square = bitboard.trailing_zeros() as Square;
    *bitboard &= *bitboard - 1;
    square
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_helpers_agree_on_corners() {
        assert_eq!(make_square(0, 0), 0);
        assert_eq!(make_square(7, 7), 63);
        assert_eq!(file_of(28), 4);
        assert_eq!(rank_of(28), 3);
        assert_eq!(flip_vertical(0), 56);
        assert_eq!(flip_horizontal(0), 7);
    }

    #[test]
    fn a1_and_h8_share_a_color_but_not_h1() {
        assert!(!opposite_colors(0, 63));
        assert!(opposite_colors(0, 7));
        assert!(opposite_colors(0, 56));
    }

    #[test]
    fn pop_lsb_walks_bits_low_to_high() {
        let mut bb = square_bit(3) | square_bit(40);
        assert_eq!(pop_lsb(&mut bb), 3);
        assert_eq!(pop_lsb(&mut bb), 40);
        assert_eq!(bb, 0);
    }

    #[test]
    fn piece_index_round_trips() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_index(kind.index()), Some(kind));
            assert_eq!(PieceKind::from_fen_char(kind.fen_char()), Some(kind));
        }
    }
}
