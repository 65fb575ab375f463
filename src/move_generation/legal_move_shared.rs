use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// One plain move from `from` to every square in `targets`.
#[inline]
pub fn push_moves_to(from: Square, mut targets: Bitboard, out: &mut Vec<Move>) {
    while targets != 0 {
        out.push(Move::new(from, pop_lsb(&mut targets)));
    }
}

/// A pawn move, expanded into the four promotions when it reaches the last rank.
#[inline]
pub fn push_pawn_move(from: Square, to: Square, promotes: bool, out: &mut Vec<Move>) {
    if promotes {
        for piece in PieceKind::PROMOTIONS {
            out.push(Move::promotion(from, to, piece));
        }
    } else {
        out.push(Move::new(from, to));
    }
}
