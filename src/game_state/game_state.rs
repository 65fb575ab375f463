//! Core incremental board state representation.
//!
//! `GameState` stores one bitboard per `(color, kind)`, the per-color and
//! global occupancy unions, a square-indexed mailbox, piece counts and the
//! material signature. All of them are updated together by the three
//! placement primitives at the bottom of this file, which is what keeps them
//! in agreement through make/unmake.

use std::fmt;
use std::sync::Arc;

use crate::endgame::material_key::{material_key_for_counts, material_piece_key};
use crate::endgame::values::{piece_value_eg, piece_value_mg, Value};
use crate::errors::ChessResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::AttackTables;
use crate::moves::move_descriptions::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::render_game_state::render_game_state;

/// Incremental game state optimized for fast move making/unmaking.
///
/// Cloning gives an independent position sharing only the immutable tables,
/// which is how parallel workers are expected to get their own copy.
#[derive(Debug, Clone)]
pub struct GameState {
    tables: Arc<AttackTables>,

    // --- Bitboard representation ---
    // [color][piece_kind]
    pub(crate) pieces: [[Bitboard; 6]; 2],

    // Occupancy caches.
    pub(crate) occupancy_by_color: [Bitboard; 2],
    pub(crate) occupancy_all: Bitboard,

    // Mailbox; color comes from the occupancy caches.
    pub(crate) board: [Option<PieceKind>; 64],
    pub(crate) piece_counts: [[u8; 6]; 2],
    pub(crate) material_key: u64,

    // --- Side and state flags ---
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,

    // --- Make/unmake stack ---
    pub(crate) undo_stack: Vec<UndoState>,
}

impl GameState {
    /// Empty board, Light to move, no rights. Only the FEN parser starts here.
    pub(crate) fn empty(tables: &Arc<AttackTables>) -> Self {
        Self {
            tables: Arc::clone(tables),
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            board: [None; 64],
            piece_counts: [[0; 6]; 2],
            material_key: 0,
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            undo_stack: Vec::new(),
        }
    }

    #[inline]
    pub fn new_game(tables: &Arc<AttackTables>) -> Self {
        parse_fen(STARTING_POSITION_FEN, tables).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str, tables: &Arc<AttackTables>) -> ChessResult<Self> {
        parse_fen(fen, tables)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn tables(&self) -> &AttackTables {
        &self.tables
    }

    #[inline]
    pub fn shared_tables(&self) -> &Arc<AttackTables> {
        &self.tables
    }

    // --- Read-only queries ---

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<PieceKind> {
        self.board[square as usize]
    }

    #[inline]
    pub fn color_on(&self, square: Square) -> Option<Color> {
        let bit = square_bit(square);
        if self.occupancy_by_color[Color::Light.index()] & bit != 0 {
            Some(Color::Light)
        } else if self.occupancy_by_color[Color::Dark.index()] & bit != 0 {
            Some(Color::Dark)
        } else {
            None
        }
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Both colors' pieces of one kind.
    #[inline]
    pub fn pieces_of_kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces[0][kind.index()] | self.pieces[1][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy_by_color[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy_all
    }

    #[inline]
    pub fn piece_count(&self, color: Color, kind: PieceKind) -> u8 {
        self.piece_counts[color.index()][kind.index()]
    }

    /// Squares holding `color`'s pieces of `kind`, lowest square first.
    pub fn piece_squares(&self, color: Color, kind: PieceKind) -> Vec<Square> {
        let mut bb = self.pieces(color, kind);
        let mut squares = Vec::with_capacity(bb.count_ones() as usize);
        while bb != 0 {
            squares.push(pop_lsb(&mut bb));
        }
        squares
    }

    /// The king square. Every loaded position has exactly one king per side.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, PieceKind::King).trailing_zeros() as Square
    }

    /// Middlegame value of knights, bishops, rooks and queens.
    pub fn non_pawn_material(&self, color: Color) -> Value {
        [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ]
        .iter()
        .map(|&kind| piece_value_mg(kind) * Value::from(self.piece_count(color, kind)))
        .sum()
    }

    #[inline]
    pub fn pawn_material(&self, color: Color) -> Value {
        piece_value_eg(PieceKind::Pawn) * Value::from(self.piece_count(color, PieceKind::Pawn))
    }

    /// Signature of the piece counts on both sides; see `endgame::material_key`.
    #[inline]
    pub fn material_key(&self) -> u64 {
        self.material_key
    }

    /// Number of applied, not yet reversed moves.
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Most recently applied move, if any.
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.undo_stack.last().map(|undo| undo.mv)
    }

    /// Cross-check every cached structure against the piece bitboards.
    pub fn is_consistent(&self) -> bool {
        let mut all = 0u64;
        for color in Color::ALL {
            let c = color.index();
            let mut union = 0u64;
            for kind in PieceKind::ALL {
                let bb = self.pieces[c][kind.index()];
                if union & bb != 0 {
                    return false;
                }
                if bb.count_ones() != u32::from(self.piece_counts[c][kind.index()]) {
                    return false;
                }
                union |= bb;
            }
            if union != self.occupancy_by_color[c] || all & union != 0 {
                return false;
            }
            all |= union;
        }
        if all != self.occupancy_all {
            return false;
        }

        let mailbox_agrees = (0..64u8).all(|sq| match self.board[sq as usize] {
            Some(kind) => self.pieces_of_kind(kind) & square_bit(sq) != 0,
            None => all & square_bit(sq) == 0,
        });

        mailbox_agrees
            && self.material_key == material_key_for_counts(&self.piece_counts)
    }

    // --- Placement primitives ---

    #[inline]
    pub(crate) fn put_piece(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bit = square_bit(square);
        let c = color.index();
        let k = kind.index();
        self.pieces[c][k] |= bit;
        self.occupancy_by_color[c] |= bit;
        self.occupancy_all |= bit;
        self.board[square as usize] = Some(kind);
        self.material_key ^= material_piece_key(color, kind, self.piece_counts[c][k]);
        self.piece_counts[c][k] += 1;
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bit = square_bit(square);
        let c = color.index();
        let k = kind.index();
        self.pieces[c][k] &= !bit;
        self.occupancy_by_color[c] &= !bit;
        self.occupancy_all &= !bit;
        self.board[square as usize] = None;
        self.piece_counts[c][k] -= 1;
        self.material_key ^= material_piece_key(color, kind, self.piece_counts[c][k]);
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, color: Color, kind: PieceKind, from: Square, to: Square) {
        let from_to = square_bit(from) | square_bit(to);
        let c = color.index();
        self.pieces[c][kind.index()] ^= from_to;
        self.occupancy_by_color[c] ^= from_to;
        self.occupancy_all ^= from_to;
        self.board[from as usize] = None;
        self.board[to as usize] = Some(kind);
    }
}

impl PartialEq for GameState {
    /// Positions compare by board, flags, clocks and pending undo history;
    /// the shared tables are not part of a position's identity.
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.occupancy_by_color == other.occupancy_by_color
            && self.occupancy_all == other.occupancy_all
            && self.board == other.board
            && self.piece_counts == other.piece_counts
            && self.material_key == other.material_key
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.undo_stack == other.undo_stack
    }
}

impl Eq for GameState {}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_game_state(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::shared_tables;

    #[test]
    fn new_game_has_consistent_caches() {
        let game = GameState::new_game(shared_tables());
        assert!(game.is_consistent());
        assert_eq!(game.occupied().count_ones(), 32);
        assert_eq!(game.piece_count(Color::Light, PieceKind::Pawn), 8);
        assert_eq!(game.king_square(Color::Dark), 60);
        assert_eq!(game.piece_on(3), Some(PieceKind::Queen));
        assert_eq!(game.color_on(3), Some(Color::Light));
        assert_eq!(game.color_on(35), None);
        assert_eq!(game.piece_squares(Color::Dark, PieceKind::Knight), vec![57, 62]);
    }

    #[test]
    fn non_pawn_material_counts_minor_and_major_pieces() {
        let game = GameState::new_game(shared_tables());
        assert_eq!(game.non_pawn_material(Color::Light), 2 * 817 + 2 * 836 + 2 * 1270 + 2521);
        assert_eq!(game.pawn_material(Color::Dark), 8 * 258);
    }

    #[test]
    fn material_key_ignores_placement() {
        let a = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", shared_tables())
            .expect("FEN should parse");
        let b = GameState::from_fen("4k3/8/8/3R4/8/8/8/4K3 b - - 0 1", shared_tables())
            .expect("FEN should parse");
        let c = GameState::from_fen("r3k3/8/8/8/8/8/8/4K3 w - - 0 1", shared_tables())
            .expect("FEN should parse");

        assert_eq!(a.material_key(), b.material_key());
        assert_ne!(a.material_key(), c.material_key());
    }

    #[test]
    fn display_uses_letters_with_labels() {
        let game = GameState::new_game(shared_tables());
        let text = game.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }
}
