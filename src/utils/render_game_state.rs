//! Terminal-oriented letter board renderer.
//!
//! Used by `Display for GameState`; diagnostics only.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::fen_generator::piece_letter_on_square;

/// Render the board as an 8x8 letter grid, rank 8 on top.
///
/// Uppercase letters are Light pieces, lowercase Dark, `.` an empty square.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));

        for file in 0..8u8 {
            out.push(' ');
            out.push(piece_letter_on_square(game_state, make_square(file, rank)).unwrap_or('.'));
        }

        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}
