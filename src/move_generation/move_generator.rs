//! Pseudo-legal move generation entry points.
//!
//! Each call writes into a sequence the caller owns, so a nested generation
//! (for example a legality probe inside an outer move loop) can never
//! overwrite moves an outer caller is still reading.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::move_descriptions::Move;

/// Typical upper bound for one position; only a capacity hint.
pub const MOVE_LIST_CAPACITY: usize = 128;

/// Append pseudo-legal moves whose destination is in `target` and return the
/// new length of `out`. King moves, castling included, are only generated when
/// `include_king` is set.
pub fn generate_moves_into(
    game_state: &GameState,
    target: Bitboard,
    include_king: bool,
    out: &mut Vec<Move>,
) -> usize {
    generate_pawn_moves(game_state, target, out);
    generate_knight_moves(game_state, target, out);
    generate_bishop_moves(game_state, target, out);
    generate_rook_moves(game_state, target, out);
    generate_queen_moves(game_state, target, out);
    if include_king {
        generate_king_moves(game_state, target, out);
    }
    out.len()
}

/// Fresh list of pseudo-legal moves into `target`.
pub fn generate_moves(game_state: &GameState, target: Bitboard, include_king: bool) -> Vec<Move> {
    let mut out = Vec::with_capacity(MOVE_LIST_CAPACITY);
    generate_moves_into(game_state, target, include_king, &mut out);
    out
}

/// Every pseudo-legal move for the side to move.
#[inline]
pub fn generate_all_moves(game_state: &GameState) -> Vec<Move> {
    generate_moves(game_state, !game_state.occupancy(game_state.side_to_move()), true)
}

/// Pseudo-legal captures, en passant included.
#[inline]
pub fn generate_captures(game_state: &GameState) -> Vec<Move> {
    generate_moves(
        game_state,
        game_state.occupancy(game_state.side_to_move().opposite()),
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::position;

    #[test]
    fn starting_position_has_twenty_quiet_moves() {
        let game = position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let moves = generate_all_moves(&game);

        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|mv| game.piece_on(mv.to()).is_none()));
        assert!(!moves.iter().any(|mv| mv.is_castle()));
        let knights = moves
            .iter()
            .filter(|mv| game.piece_on(mv.from()) == Some(PieceKind::Knight))
            .count();
        assert_eq!(knights, 4);
        assert!(generate_captures(&game).is_empty());
    }

    #[test]
    fn appending_keeps_earlier_moves_and_reports_the_end() {
        let game = position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let mut out = vec![Move::new(0, 0)];
        let end = generate_moves_into(&game, !0, true, &mut out);
        assert_eq!(end, 21);
        assert_eq!(out[0], Move::new(0, 0));
    }

    #[test]
    fn king_moves_can_be_left_out() {
        let game = position("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let with_king = generate_moves(&game, !game.occupancy(Color::Light), true);
        let without_king = generate_moves(&game, !game.occupancy(Color::Light), false);
        // rook: 7 up the file + d1, c1, b1; king: d1 d2 e2 f2 f1 and castling
        assert_eq!(without_king.len(), 10);
        assert_eq!(with_king.len(), 16);
    }

    #[test]
    fn targets_restrict_every_piece() {
        let game = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let target = 1u64 << 63;
        // no white piece reaches h8
        assert!(generate_moves(&game, target, true).is_empty());

        let captures = generate_captures(&game);
        assert_eq!(captures.len(), 8);
    }
}
