//! Pawn pushes, captures, promotions and en passant.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_pawn_move;
use crate::moves::geometry::{backward_square, relative_rank};
use crate::moves::move_descriptions::Move;

/// Pseudo-legal pawn moves landing in `target`.
///
/// A double push needs its intermediate square empty, whether or not that
/// square is itself in `target`. En passant is offered when either the target
/// square or the captured pawn's square is in `target`, so a capture-only
/// target set still sees it.
pub fn generate_pawn_moves(game_state: &GameState, target: Bitboard, out: &mut Vec<Move>) {
    let side = game_state.side_to_move();
    let them = side.opposite();
    let tables = game_state.tables();
    let empty = !game_state.occupied();
    let enemies = game_state.occupancy(them);
    let en_passant = en_passant_capture(game_state, target);

    let mut pawns = game_state.pieces(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pop_lsb(&mut pawns);

        let single = tables.pawn_push(side, from) & empty;
        if single != 0 {
            let to = single.trailing_zeros() as Square;
            if single & target != 0 {
                push_pawn_move(from, to, relative_rank(side, to) == 7, out);
            }

            let double = tables.pawn_double_push(side, from) & empty & target;
            if double != 0 {
                out.push(Move::new(from, double.trailing_zeros() as Square));
            }
        }

        let attacks = tables.pawn_attacks(side, from);
        let mut captures = attacks & enemies & target;
        while captures != 0 {
            let to = pop_lsb(&mut captures);
            push_pawn_move(from, to, relative_rank(side, to) == 7, out);
        }

        if let Some(ep) = en_passant {
            if attacks & square_bit(ep) != 0 {
                out.push(Move::en_passant(from, ep));
            }
        }
    }
}

/// The en-passant target if a capture onto it is available and wanted.
fn en_passant_capture(game_state: &GameState, target: Bitboard) -> Option<Square> {
    let side = game_state.side_to_move();
    let ep = game_state.en_passant_square()?;
    let victim = backward_square(side, ep)?;

    let enemy_pawn_behind =
        game_state.pieces(side.opposite(), PieceKind::Pawn) & square_bit(victim) != 0;
    let wanted = target & (square_bit(ep) | square_bit(victim)) != 0;

    (enemy_pawn_behind && wanted && game_state.occupied() & square_bit(ep) == 0).then_some(ep)
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::*;
    use crate::test_support::position;

    fn pawn_moves(fen: &str, target: Bitboard) -> Vec<String> {
        let game = position(fen);
        let mut out = Vec::new();
        generate_pawn_moves(&game, target, &mut out);
        let mut text: Vec<String> = out.iter().map(|mv| mv.to_string()).collect();
        text.sort();
        text
    }

    #[test]
    fn blocked_pawn_cannot_double_push() {
        let moves = pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", !0);
        assert!(moves.is_empty(), "{moves:?}");
    }

    #[test]
    fn double_push_ignores_whether_the_middle_square_is_targeted() {
        let moves = pawn_moves("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", 1u64 << 28);
        assert_eq!(moves, vec!["e2e4"]);
    }

    #[test]
    fn promotions_expand_to_four_pieces() {
        let moves = pawn_moves("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1", !0);
        assert_eq!(moves, vec!["e7d8b", "e7d8n", "e7d8q", "e7d8r"]);
    }

    #[test]
    fn en_passant_needs_the_pushed_pawn_and_a_wanted_square() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        assert_eq!(pawn_moves(fen, !0), vec!["e5d6", "e5e6"]);

        // capture-only target: the victim on d5 is an enemy square
        let game = position(fen);
        let captures = game.occupancy(Color::Dark);
        assert_eq!(pawn_moves(fen, captures), vec!["e5d6"]);

        // only the push square wanted
        assert_eq!(pawn_moves(fen, 1u64 << 44), vec!["e5e6"]);
    }
}
