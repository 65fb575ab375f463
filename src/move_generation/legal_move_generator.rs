//! Legality on top of pseudo-legal generation.
//!
//! A pseudo-legal move is legal iff, after making it, the mover's king is not
//! attacked. Everything here applies that test literally with make/unmake on
//! the caller's position, which is left exactly as it was found.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::{checkers, is_in_check};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::move_generation::move_generator::{generate_all_moves, MOVE_LIST_CAPACITY};
use crate::moves::move_descriptions::Move;

/// Game-end classification of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MateStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// True iff `mv` does not leave the mover's own king attacked.
pub fn is_legal_move(game_state: &mut GameState, mv: Move) -> bool {
    let mover = game_state.side_to_move();
    make_move(game_state, mv);
    let legal = !is_in_check(game_state, mover);
    unmake_move(game_state, mv);
    legal
}

pub fn generate_legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let mut moves = generate_all_moves(game_state);
    moves.retain(|&mv| is_legal_move(game_state, mv));
    moves
}

pub fn count_legal_moves(game_state: &mut GameState) -> usize {
    generate_all_moves(game_state)
        .into_iter()
        .filter(|&mv| is_legal_move(game_state, mv))
        .count()
}

/// Ongoing if any pseudo-legal move survives the self-check test; otherwise
/// checkmate when the side to move is in check, stalemate when it is not.
pub fn mate_status(game_state: &mut GameState) -> MateStatus {
    let has_legal_move = generate_all_moves(game_state)
        .into_iter()
        .any(|mv| is_legal_move(game_state, mv));

    if has_legal_move {
        MateStatus::Ongoing
    } else if is_in_check(game_state, game_state.side_to_move()) {
        MateStatus::Checkmate
    } else {
        MateStatus::Stalemate
    }
}

/// Pseudo-legal check evasions.
///
/// Under a single check the non-king pieces only move to the checker's square
/// or onto the squares between it and the king; en passant still works when
/// the checker is the pawn that just double-pushed. Under double check only
/// the king moves. Outside of check this is plain full generation.
///
/// The legal subset of the result equals the legal subset of
/// `generate_all_moves`.
pub fn generate_evasions(game_state: &GameState) -> Vec<Move> {
    let attackers = checkers(game_state);
    if attackers == 0 {
        return generate_all_moves(game_state);
    }

    let side = game_state.side_to_move();
    let king = game_state.king_square(side);
    let mut out = Vec::with_capacity(MOVE_LIST_CAPACITY);

    generate_king_moves(game_state, !game_state.occupancy(side), &mut out);

    if attackers.count_ones() > 1 {
        return out;
    }

    let checker = attackers.trailing_zeros() as Square;
    let target = game_state.tables().between(king, checker) | square_bit(checker);

    generate_pawn_moves(game_state, target, &mut out);
    generate_knight_moves(game_state, target, &mut out);
    generate_bishop_moves(game_state, target, &mut out);
    generate_rook_moves(game_state, target, &mut out);
    generate_queen_moves(game_state, target, &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::position;

    fn sorted(moves: impl IntoIterator<Item = Move>) -> Vec<String> {
        let mut text: Vec<String> = moves.into_iter().map(|mv| mv.to_string()).collect();
        text.sort();
        text
    }

    #[test]
    fn starting_position_is_ongoing_with_twenty_legal_moves() {
        let mut game = position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let before = game.clone();
        assert_eq!(count_legal_moves(&mut game), 20);
        assert_eq!(mate_status(&mut game), MateStatus::Ongoing);
        assert_eq!(game, before);
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut game = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(mate_status(&mut game), MateStatus::Checkmate);
        assert!(generate_legal_moves(&mut game).is_empty());
    }

    #[test]
    fn cornered_king_is_stalemated() {
        let mut game = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(mate_status(&mut game), MateStatus::Stalemate);
    }

    #[test]
    fn pinned_piece_moves_are_filtered() {
        // the e2 knight is pinned by the e8 rook
        let mut game = position("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let legal = generate_legal_moves(&mut game);
        assert!(legal.iter().all(|mv| mv.from() != 12));
        assert_eq!(legal.len(), 4);
    }

    #[test]
    fn evasions_keep_every_legal_reply() {
        for fen in [
            // single slider check, block or capture
            "4k3/8/8/8/1b6/8/8/RN2K3 w Q - 0 1",
            // knight check
            "4k3/8/8/8/8/3n4/8/R3K2R w KQ - 0 1",
            // double check
            "4k3/8/8/8/1b6/8/8/R3K1r1 w Q - 0 1",
            // checking pawn that can be taken en passant
            "8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1",
        ] {
            let mut game = position(fen);
            let legal_all = sorted(generate_legal_moves(&mut game));
            let legal_evasions = sorted(
                generate_evasions(&game)
                    .into_iter()
                    .filter(|&mv| is_legal_move(&mut game, mv))
                    .collect::<Vec<_>>(),
            );
            assert_eq!(legal_evasions, legal_all, "{fen}");
        }
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let game = position("4k3/8/8/8/1b6/8/8/R3K1r1 w Q - 0 1");
        assert!(generate_evasions(&game)
            .iter()
            .all(|mv| mv.from() == game.king_square(Color::Light)));
    }

    #[test]
    fn en_passant_evasion_is_offered() {
        let mut game = position("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1");
        let evasions = sorted(
            generate_evasions(&game)
                .into_iter()
                .filter(|&mv| is_legal_move(&mut game, mv))
                .collect::<Vec<_>>(),
        );
        assert!(evasions.contains(&"e4d3".to_owned()), "{evasions:?}");
    }
}
