//! Canonical chess-rule constants.
//!
//! Static rule literals: the standard starting position and the fixed squares
//! castling touches for each color.

use crate::game_state::chess_types::Square;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// King home square per color (`e1`, `e8`).
pub const KING_HOME: [Square; 2] = [4, 60];

/// Kingside rook `[from, to]` per color.
pub const KINGSIDE_ROOK: [[Square; 2]; 2] = [[7, 5], [63, 61]];

/// Queenside rook `[from, to]` per color.
pub const QUEENSIDE_ROOK: [[Square; 2]; 2] = [[0, 3], [56, 59]];

/// King destination when castling `[kingside, queenside]` per color.
pub const CASTLE_KING_TO: [[Square; 2]; 2] = [[6, 2], [62, 58]];

/// Squares that must be empty: kingside f..g, queenside b..d.
pub const KINGSIDE_VACANT: [u64; 2] = [(1 << 5) | (1 << 6), (1 << 61) | (1 << 62)];
pub const QUEENSIDE_VACANT: [u64; 2] = [
    (1 << 1) | (1 << 2) | (1 << 3),
    (1 << 57) | (1 << 58) | (1 << 59),
];

/// Squares the king stands on or crosses, which must not be attacked:
/// kingside e..g, queenside c..e.
pub const KINGSIDE_TRANSIT: [u64; 2] = [
    (1 << 4) | (1 << 5) | (1 << 6),
    (1 << 60) | (1 << 61) | (1 << 62),
];
pub const QUEENSIDE_TRANSIT: [u64; 2] = [
    (1 << 2) | (1 << 3) | (1 << 4),
    (1 << 58) | (1 << 59) | (1 << 60),
];

