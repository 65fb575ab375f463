//! Long algebraic move text (`e2e4`, `e7e8q`, `e1g1`).
//!
//! Text is resolved against the position's pseudo-legal moves, so the special
//! tag (castle, en passant) comes from generation rather than from guessing.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::generate_all_moves;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::algebraic_to_square;

/// Resolve `text` to the pseudo-legal move it names in `game_state`.
pub fn parse_long_algebraic(game_state: &GameState, text: &str) -> ChessResult<Move> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::InvalidMoveText(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])
        .map_err(|_| ChessError::InvalidMoveText(text.to_owned()))?;
    let to = algebraic_to_square(&text[2..4])
        .map_err(|_| ChessError::InvalidMoveText(text.to_owned()))?;

    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_fen_char(ch) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) && ch.is_ascii_lowercase() => {
                Some(kind)
            }
            _ => return Err(ChessError::InvalidMoveText(text.to_owned())),
        },
    };

    generate_all_moves(game_state)
        .into_iter()
        .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
        .ok_or_else(|| ChessError::InvalidMoveText(format!("{text} is not playable here")))
}

/// Space-separated long algebraic text for a move sequence.
pub fn format_move_list(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
