//! Move-path enumeration for validating generation and make/unmake together.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::{count_legal_moves, generate_legal_moves};
use crate::moves::move_descriptions::Move;

/// Leaf statistics. Every field except `nodes` describes the move that led to
/// the leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    pub fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf count at `depth` plies.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(game_state);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in moves {
        make_move(game_state, mv);
        nodes += perft(game_state, depth - 1);
        unmake_move(game_state, mv);
    }
    nodes
}

/// Leaf count with per-leaf move statistics.
pub fn perft_counts(game_state: &mut GameState, depth: u8) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }

    for mv in generate_legal_moves(game_state) {
        let captured = game_state.piece_on(mv.to()).is_some() || mv.is_en_passant();
        make_move(game_state, mv);

        if depth == 1 {
            total.merge(leaf_counts(game_state, mv, captured));
        } else {
            total.merge(perft_counts(game_state, depth - 1));
        }

        unmake_move(game_state, mv);
    }

    total
}

fn leaf_counts(game_state: &mut GameState, mv: Move, captured: bool) -> PerftCounts {
    let gives_check = is_in_check(game_state, game_state.side_to_move());

    PerftCounts {
        nodes: 1,
        captures: usize::from(captured),
        en_passant: usize::from(mv.is_en_passant()),
        castles: usize::from(mv.is_castle()),
        promotions: usize::from(mv.promotion_piece().is_some()),
        checks: usize::from(gives_check),
        checkmates: usize::from(gives_check && count_legal_moves(game_state) == 0),
    }
}

/// Leaf count below each legal root move, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    generate_legal_moves(game_state)
        .into_iter()
        .map(|mv| {
            make_move(game_state, mv);
            let nodes = perft(game_state, depth - 1);
            unmake_move(game_state, mv);
            (mv, nodes)
        })
        .collect()
}
