use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// Single undo record for `make_move` / `unmake_move`.
///
/// Holds only what cannot be recomputed from the move itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub mv: Move,
    pub captured_piece: Option<PieceKind>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
}
