use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_name;

pub fn generate_fen(game_state: &GameState) -> String {
    let board = generate_board_field(game_state);
    let side_to_move = match game_state.side_to_move() {
        Color::Light => "w",
        Color::Dark => "b",
    };
    let castling = generate_castling_field(game_state.castling_rights());
    let en_passant = game_state.en_passant_square().map_or("-", square_name);

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        game_state.halfmove_clock(),
        game_state.fullmove_number()
    )
}

fn generate_board_field(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let sq = make_square(file, rank);
            if let Some(ch) = piece_letter_on_square(game_state, sq) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(ch);
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

/// FEN letter for the piece on `square`, uppercase for Light.
pub(crate) fn piece_letter_on_square(game_state: &GameState, square: Square) -> Option<char> {
    let kind = game_state.piece_on(square)?;
    let letter = kind.fen_char();
    match game_state.color_on(square)? {
        Color::Light => Some(letter.to_ascii_uppercase()),
        Color::Dark => Some(letter),
    }
}

fn generate_castling_field(castling_rights: CastlingRights) -> String {
    let mut out = String::new();

    if castling_rights & CASTLE_LIGHT_KINGSIDE != 0 {
        out.push('K');
    }
    if castling_rights & CASTLE_LIGHT_QUEENSIDE != 0 {
        out.push('Q');
    }
    if castling_rights & CASTLE_DARK_KINGSIDE != 0 {
        out.push('k');
    }
    if castling_rights & CASTLE_DARK_QUEENSIDE != 0 {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::game_state::GameState;
    use crate::test_support::shared_tables;

    #[test]
    fn generated_fen_matches_loaded_text() {
        for fen in [
            STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b Kq e3 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
        ] {
            let game_state = GameState::from_fen(fen, shared_tables()).expect("FEN should parse");
            assert_eq!(generate_fen(&game_state), fen);
        }
    }
}
