use crate::game_state::chess_rules::{
    CASTLE_KING_TO, KINGSIDE_TRANSIT, KINGSIDE_VACANT, KING_HOME, QUEENSIDE_TRANSIT,
    QUEENSIDE_VACANT,
};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_set_attacked;
use crate::move_generation::legal_move_shared::push_moves_to;
use crate::moves::move_descriptions::Move;

/// King steps into `target` plus castling moves whose destination is in `target`.
pub fn generate_king_moves(game_state: &GameState, target: Bitboard, out: &mut Vec<Move>) {
    let side = game_state.side_to_move();
    let from = game_state.king_square(side);
    let allowed = target & !game_state.occupancy(side);

    push_moves_to(from, game_state.tables().king_attacks(from) & allowed, out);
    generate_castling_moves(game_state, from, allowed, out);
}

/// Castling needs the right, an empty path between king and rook, and no
/// attacked square among the king's start, transit and destination.
fn generate_castling_moves(
    game_state: &GameState,
    king_from: Square,
    allowed: Bitboard,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move();
    let c = side.index();
    if king_from != KING_HOME[c] {
        return;
    }

    let enemy = side.opposite();
    let occupied = game_state.occupied();

    for (right, vacant, transit, king_to) in [
        (kingside_right(side), KINGSIDE_VACANT[c], KINGSIDE_TRANSIT[c], CASTLE_KING_TO[c][0]),
        (queenside_right(side), QUEENSIDE_VACANT[c], QUEENSIDE_TRANSIT[c], CASTLE_KING_TO[c][1]),
    ] {
        if game_state.castling_rights() & right != 0
            && occupied & vacant == 0
            && allowed & square_bit(king_to) != 0
            && !is_square_set_attacked(game_state, transit, enemy)
        {
            out.push(Move::castle(king_from, king_to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::test_support::position;

    fn castles(fen: &str) -> Vec<String> {
        let game = position(fen);
        let mut out = Vec::new();
        generate_king_moves(&game, !0, &mut out);
        let mut text: Vec<String> = out
            .iter()
            .filter(|mv| mv.is_castle())
            .map(|mv| mv.to_string())
            .collect();
        text.sort();
        text
    }

    #[test]
    fn both_sides_available_on_open_back_rank() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["e1c1", "e1g1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), vec!["e8c8", "e8g8"]);
    }

    #[test]
    fn missing_right_blocks_castling() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1"), vec!["e1c1"]);
        assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").is_empty());
    }

    #[test]
    fn occupied_path_blocks_castling() {
        // knight on b1 blocks queenside even though the king never crosses b1
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1"), vec!["e1g1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3KB1R w KQkq - 0 1"), vec!["e1c1"]);
    }

    #[test]
    fn attacked_transit_blocks_castling() {
        // rook on f8 covers f1
        assert_eq!(castles("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1"), vec!["e1c1"]);
        // rook on b8 covers only b1, which the king does not cross
        assert_eq!(castles("1r2k2r/8/8/8/8/8/8/R3K2R w KQk - 0 1"), vec!["e1c1", "e1g1"]);
        // destination attacked
        assert_eq!(castles("2r1k2r/8/8/8/8/8/8/R3K2R w KQk - 0 1"), vec!["e1g1"]);
        // in check: no castling at all
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
    }
}
