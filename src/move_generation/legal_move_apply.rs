//! In-place make/unmake.
//!
//! `make_move` pushes one `UndoState` and mutates the position; `unmake_move`
//! pops it and reverses every effect. Both are O(1) and never allocate beyond
//! the undo stack's own growth. Neither validates legality: the caller (move
//! generation, search) guarantees the move is pseudo-legal for the side to
//! move. A broken sequencing contract panics.

use crate::errors::ChessError;
use crate::game_state::chess_rules::{CASTLE_KING_TO, KINGSIDE_ROOK, QUEENSIDE_ROOK};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{Move, SpecialMove};

/// Rights that survive a move touching the square. Any move from or to a king
/// or rook home square clears the matching rights.
const CASTLING_RIGHTS_MASK: [CastlingRights; 64] = {
    let mut mask = [CASTLE_ALL; 64];
    mask[0] = CASTLE_ALL & !CASTLE_LIGHT_QUEENSIDE;
    mask[4] = CASTLE_ALL & !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE);
    mask[7] = CASTLE_ALL & !CASTLE_LIGHT_KINGSIDE;
    mask[56] = CASTLE_ALL & !CASTLE_DARK_QUEENSIDE;
    mask[60] = CASTLE_ALL & !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);
    mask[63] = CASTLE_ALL & !CASTLE_DARK_KINGSIDE;
    mask
};

/// Square of the pawn taken en passant: one rank behind the target, which for
/// targets on ranks 3 and 6 is a flip of bit 3.
#[inline]
const fn en_passant_victim(target: Square) -> Square {
    target ^ 8
}

/// Rook `[from, to]` for a castling king landing on `king_to`.
#[inline]
fn castling_rook(color: Color, king_to: Square) -> [Square; 2] {
    let c = color.index();
    if king_to == CASTLE_KING_TO[c][0] {
        KINGSIDE_ROOK[c]
    } else {
        QUEENSIDE_ROOK[c]
    }
}

#[cold]
#[inline(never)]
fn contract_violation(detail: String) -> ! {
    panic!("{}", ChessError::ContractViolation(detail))
}

/// Apply a pseudo-legal move in place.
///
/// Panics if the source square is empty.
pub fn make_move(game_state: &mut GameState, mv: Move) {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let from = mv.from();
    let to = mv.to();

    let Some(moved_piece) = game_state.board[from as usize] else {
        contract_violation(format!("make_move({mv}) with no piece on the source square"));
    };

    let mut captured_piece = None;

    match mv.special() {
        SpecialMove::EnPassant => {
            game_state.remove_piece(them, PieceKind::Pawn, en_passant_victim(to));
            captured_piece = Some(PieceKind::Pawn);
            game_state.move_piece(us, PieceKind::Pawn, from, to);
        }
        SpecialMove::Castle => {
            let [rook_from, rook_to] = castling_rook(us, to);
            game_state.move_piece(us, PieceKind::King, from, to);
            game_state.move_piece(us, PieceKind::Rook, rook_from, rook_to);
        }
        SpecialMove::Promotion(promoted) => {
            if let Some(victim) = game_state.board[to as usize] {
                game_state.remove_piece(them, victim, to);
                captured_piece = Some(victim);
            }
            game_state.remove_piece(us, PieceKind::Pawn, from);
            game_state.put_piece(us, promoted, to);
        }
        SpecialMove::None => {
            if let Some(victim) = game_state.board[to as usize] {
                game_state.remove_piece(them, victim, to);
                captured_piece = Some(victim);
            }
            game_state.move_piece(us, moved_piece, from, to);
        }
    }

    game_state.undo_stack.push(UndoState {
        mv,
        captured_piece,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
    });

    game_state.castling_rights &=
        CASTLING_RIGHTS_MASK[from as usize] & CASTLING_RIGHTS_MASK[to as usize];

    game_state.en_passant_square = if moved_piece == PieceKind::Pawn && from.abs_diff(to) == 16 {
        Some((from + to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || captured_piece.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if us == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = them;

    debug_assert!(game_state.is_consistent(), "caches diverged after {mv}");
}

/// Reverse `mv`, which must be the most recently applied move.
///
/// Panics if no move is pending or `mv` is not the last applied one.
pub fn unmake_move(game_state: &mut GameState, mv: Move) {
    match game_state.last_move() {
        None => contract_violation(format!("unmake_move({mv}) with no move pending")),
        Some(last) if last != mv => contract_violation(format!(
            "unmake_move({mv}) but the last applied move is {last}"
        )),
        Some(_) => undo_last_move(game_state),
    }
}

/// Pop and reverse whatever move was applied last.
///
/// Panics if no move is pending.
pub fn undo_last_move(game_state: &mut GameState) {
    let Some(undo) = game_state.undo_stack.pop() else {
        contract_violation("undo_last_move with no move pending".to_owned());
    };

    let us = game_state.side_to_move.opposite();
    let them = game_state.side_to_move;
    let mv = undo.mv;
    let from = mv.from();
    let to = mv.to();

    match mv.special() {
        SpecialMove::EnPassant => {
            game_state.move_piece(us, PieceKind::Pawn, to, from);
            game_state.put_piece(them, PieceKind::Pawn, en_passant_victim(to));
        }
        SpecialMove::Castle => {
            let [rook_from, rook_to] = castling_rook(us, to);
            game_state.move_piece(us, PieceKind::Rook, rook_to, rook_from);
            game_state.move_piece(us, PieceKind::King, to, from);
        }
        SpecialMove::Promotion(promoted) => {
            game_state.remove_piece(us, promoted, to);
            game_state.put_piece(us, PieceKind::Pawn, from);
            if let Some(victim) = undo.captured_piece {
                game_state.put_piece(them, victim, to);
            }
        }
        SpecialMove::None => {
            let Some(moved_piece) = game_state.board[to as usize] else {
                contract_violation(format!("undo of {mv} found an empty destination"));
            };
            game_state.move_piece(us, moved_piece, to, from);
            if let Some(victim) = undo.captured_piece {
                game_state.put_piece(them, victim, to);
            }
        }
    }

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    if us == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_sub(1);
    }
    game_state.side_to_move = us;

    debug_assert!(game_state.is_consistent(), "caches diverged undoing {mv}");
}
