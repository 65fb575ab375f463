//! FEN-to-GameState parser.
//!
//! Builds a fully populated position from a Forsyth-Edwards Notation string.
//! Every field is validated and a few cross-field rules are checked after the
//! board is placed; any failure is a `ChessError::Load` naming the field.

use std::sync::Arc;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{KING_HOME, KINGSIDE_ROOK, QUEENSIDE_ROOK};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::moves::attack_tables::AttackTables;
use crate::moves::geometry::backward_square;
use crate::utils::algebraic::algebraic_to_square;

const MAX_PIECES_PER_SIDE: u32 = 16;
const MAX_PAWNS_PER_SIDE: u32 = 8;
const BACK_RANKS: Bitboard = 0xFF00_0000_0000_00FF;

pub fn parse_fen(fen: &str, tables: &Arc<AttackTables>) -> ChessResult<GameState> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ChessError::load(
            "position",
            format!("expected 6 fields, found {}", fields.len()),
        ));
    }

    let mut game_state = GameState::empty(tables);

    parse_board(fields[0], &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(fields[1])?;
    game_state.castling_rights = parse_castling_rights(fields[2])?;
    game_state.en_passant_square = parse_en_passant_square(fields[3])?;
    game_state.halfmove_clock = fields[4]
        .parse::<u16>()
        .map_err(|_| ChessError::load("halfmove", format!("not a counter: {}", fields[4])))?;
    game_state.fullmove_number = fields[5]
        .parse::<u16>()
        .map_err(|_| ChessError::load("fullmove", format!("not a counter: {}", fields[5])))?;

    validate_material(&game_state)?;
    validate_castling(&game_state)?;
    validate_en_passant(&game_state)?;

    let waiting = game_state.side_to_move.opposite();
    if is_in_check(&game_state, waiting) {
        return Err(ChessError::load(
            "position",
            "the side not to move is in check",
        ));
    }

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::load(
            "board",
            format!("expected 8 ranks, found {}", ranks.len()),
        ));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::load(
                        "board",
                        format!("invalid empty-square count '{ch}'"),
                    ));
                }
                file += empty_count as u8;
                if file > 8 {
                    break;
                }
                continue;
            }

            let (color, piece) = piece_from_fen_char(ch).ok_or_else(|| {
                ChessError::load("board", format!("invalid piece character '{ch}'"))
            })?;

            if file >= 8 {
                file += 1;
                break;
            }

            game_state.put_piece(color, piece, make_square(file, board_rank));
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::load(
                "board",
                format!("rank {} does not cover 8 files", board_rank + 1),
            ));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(ChessError::load(
            "side",
            format!("expected 'w' or 'b', got '{side_part}'"),
        )),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        let flag = match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => {
                return Err(ChessError::load(
                    "castling",
                    format!("invalid character '{ch}'"),
                ))
            }
        };
        if rights & flag != 0 {
            return Err(ChessError::load("castling", format!("repeated '{ch}'")));
        }
        rights |= flag;
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|err| ChessError::load("en_passant", err.to_string()))
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    PieceKind::from_fen_char(ch).map(|piece| (color, piece))
}

fn validate_material(game_state: &GameState) -> ChessResult<()> {
    for color in Color::ALL {
        let kings = game_state.piece_count(color, PieceKind::King);
        if kings != 1 {
            return Err(ChessError::load(
                "board",
                format!("{color:?} has {kings} kings"),
            ));
        }

        let pawns = game_state.pieces(color, PieceKind::Pawn);
        if pawns & BACK_RANKS != 0 {
            return Err(ChessError::load(
                "board",
                format!("{color:?} pawn on the first or last rank"),
            ));
        }
        if pawns.count_ones() > MAX_PAWNS_PER_SIDE {
            return Err(ChessError::load(
                "board",
                format!("{color:?} has more than {MAX_PAWNS_PER_SIDE} pawns"),
            ));
        }
        if game_state.occupancy(color).count_ones() > MAX_PIECES_PER_SIDE {
            return Err(ChessError::load(
                "board",
                format!("{color:?} has more than {MAX_PIECES_PER_SIDE} pieces"),
            ));
        }
    }

    Ok(())
}

fn validate_castling(game_state: &GameState) -> ChessResult<()> {
    for color in Color::ALL {
        let c = color.index();
        let king_home = game_state.pieces(color, PieceKind::King) & square_bit(KING_HOME[c]) != 0;
        let rooks = game_state.pieces(color, PieceKind::Rook);

        for (right, rook_home) in [
            (kingside_right(color), KINGSIDE_ROOK[c][0]),
            (queenside_right(color), QUEENSIDE_ROOK[c][0]),
        ] {
            if game_state.castling_rights & right != 0
                && (!king_home || rooks & square_bit(rook_home) == 0)
            {
                return Err(ChessError::load(
                    "castling",
                    format!("{color:?} king or rook is not on its home square"),
                ));
            }
        }
    }

    Ok(())
}

fn validate_en_passant(game_state: &GameState) -> ChessResult<()> {
    let Some(ep) = game_state.en_passant_square else {
        return Ok(());
    };

    // Light to move captures onto rank 6, Dark onto rank 3.
    let mover = game_state.side_to_move;
    let expected_rank = match mover {
        Color::Light => 5,
        Color::Dark => 2,
    };
    if rank_of(ep) != expected_rank {
        return Err(ChessError::load(
            "en_passant",
            format!("target on rank {} with {mover:?} to move", rank_of(ep) + 1),
        ));
    }

    let pawn_behind = match backward_square(mover, ep) {
        Some(sq) => game_state.pieces(mover.opposite(), PieceKind::Pawn) & square_bit(sq) != 0,
        None => false,
    };
    if !pawn_behind || game_state.occupied() & square_bit(ep) != 0 {
        return Err(ChessError::load(
            "en_passant",
            "no double-pushed pawn behind the target",
        ));
    }

    Ok(())
}
