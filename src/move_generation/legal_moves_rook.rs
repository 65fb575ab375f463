use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_moves_to;
use crate::moves::move_descriptions::Move;

pub fn generate_rook_moves(game_state: &GameState, target: Bitboard, out: &mut Vec<Move>) {
    let side = game_state.side_to_move();
    let tables = game_state.tables();
    let occupied = game_state.occupied();
    let allowed = target & !game_state.occupancy(side);

    let mut rooks = game_state.pieces(side, PieceKind::Rook);
    while rooks != 0 {
        let from = pop_lsb(&mut rooks);
        push_moves_to(from, tables.rook_attacks(from, occupied) & allowed, out);
    }
}
