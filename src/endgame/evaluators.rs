//! Exact evaluation functions for elementary endgames.
//!
//! Each function is bound to a "strong" color when it is registered. The
//! score it computes is from the strong side's point of view and is negated
//! when the weak side is to move, so callers always receive a side-to-move
//! score.

use crate::endgame::values::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::attackers_to;
use crate::moves::geometry::{chebyshev_distance, relative_rank};
use crate::tables::endgame_tables::{
    distance_bonus, kbnk_mate_table, mate_table, KRKN_KING_KNIGHT_DISTANCE_PENALTY,
};
use crate::tables::kpk_bitbase::KpkBitbase;

/// Endgame patterns with an exact evaluation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluatorKind {
    /// Plenty of material against a bare king.
    Kxk,
    Kbnk,
    Kpk,
    Krkp,
    Krkb,
    Krkn,
    Kqkp,
    Kqkr,
    Kbbkn,
    Knnk,
    /// Pawnless minor-piece endings that cannot be won.
    Kmmkm,
}

/// Score of `game_state` for the side to move, `strong` being the side the
/// pattern favours.
pub fn evaluate(
    kind: EvaluatorKind,
    strong: Color,
    game_state: &GameState,
    kpk: &KpkBitbase,
) -> Value {
    let strong_score = match kind {
        EvaluatorKind::Kxk => {
            let weak_to_move = game_state.side_to_move() != strong;
            if weak_to_move && lone_king_stalemated(game_state, strong.opposite()) {
                return VALUE_DRAW;
            }
            kxk(strong, game_state)
        }
        EvaluatorKind::Kbnk => kbnk(strong, game_state),
        EvaluatorKind::Kpk => match kpk_score(strong, game_state, kpk) {
            Some(score) => score,
            None => return VALUE_DRAW,
        },
        EvaluatorKind::Krkp => krkp(strong, game_state),
        EvaluatorKind::Krkb => mate_table(game_state.king_square(strong.opposite())),
        EvaluatorKind::Krkn => krkn(strong, game_state),
        EvaluatorKind::Kqkp => kqkp(strong, game_state),
        EvaluatorKind::Kqkr => kqkr(strong, game_state),
        EvaluatorKind::Kbbkn => kbbkn(strong, game_state),
        EvaluatorKind::Knnk | EvaluatorKind::Kmmkm => return VALUE_DRAW,
    };

    if game_state.side_to_move() == strong {
        strong_score
    } else {
        -strong_score
    }
}

/// Square of the first `kind` of `color`; the pattern guarantees one exists.
#[inline]
pub(crate) fn first_square(game_state: &GameState, color: Color, kind: PieceKind) -> Square {
    game_state.pieces(color, kind).trailing_zeros() as Square
}

#[inline]
fn distance(a: Square, b: Square) -> Value {
    Value::from(chebyshev_distance(a, b))
}

/// True when `weak`, owning only its king, is not in check and has no safe
/// king step. Sliders see through the king's current square.
fn lone_king_stalemated(game_state: &GameState, weak: Color) -> bool {
    let strong = weak.opposite();
    let king = game_state.king_square(weak);
    debug_assert_eq!(game_state.occupancy(weak), square_bit(king));

    let occupied = game_state.occupied() & !square_bit(king);
    if attackers_to(game_state, king, strong, occupied) != 0 {
        return false;
    }

    let mut steps = game_state.tables().king_attacks(king) & !game_state.occupancy(weak);
    while steps != 0 {
        let to = pop_lsb(&mut steps);
        if attackers_to(game_state, to, strong, occupied) == 0 {
            return false;
        }
    }
    true
}

fn kxk(strong: Color, game_state: &GameState) -> Value {
    let winner_king = game_state.king_square(strong);
    let loser_king = game_state.king_square(strong.opposite());

    let mut result = game_state.non_pawn_material(strong)
        + game_state.pawn_material(strong)
        + mate_table(loser_king)
        + distance_bonus(chebyshev_distance(winner_king, loser_king));

    let bishops = game_state.pieces(strong, PieceKind::Bishop);
    let bishop_pair = bishops.count_ones() >= 2 && {
        let first = bishops.trailing_zeros() as Square;
        let second = (bishops & (bishops - 1)).trailing_zeros() as Square;
        opposite_colors(first, second)
    };

    if game_state.piece_count(strong, PieceKind::Queen) > 0
        || game_state.piece_count(strong, PieceKind::Rook) > 0
        || bishop_pair
    {
        result += VALUE_KNOWN_WIN;
    }

    result
}

fn kbnk(strong: Color, game_state: &GameState) -> Value {
    let mut winner_king = game_state.king_square(strong);
    let mut loser_king = game_state.king_square(strong.opposite());
    let bishop = first_square(game_state, strong, PieceKind::Bishop);

    // The table drives toward a1/h8; a bishop of the other color mates on a8/h1.
    if opposite_colors(bishop, 0) {
        winner_king = flip_horizontal(winner_king);
        loser_king = flip_horizontal(loser_king);
    }

    VALUE_KNOWN_WIN
        + distance_bonus(chebyshev_distance(winner_king, loser_king))
        + kbnk_mate_table(loser_king)
}

/// `None` when the bitbase says the pawn cannot be forced through.
fn kpk_score(strong: Color, game_state: &GameState, kpk: &KpkBitbase) -> Option<Value> {
    let weak = strong.opposite();
    let mut strong_king = game_state.king_square(strong);
    let mut weak_king = game_state.king_square(weak);
    let mut pawn = first_square(game_state, strong, PieceKind::Pawn);
    let mut us = game_state.side_to_move();

    if strong == Color::Dark {
        strong_king = flip_vertical(strong_king);
        weak_king = flip_vertical(weak_king);
        pawn = flip_vertical(pawn);
        us = us.opposite();
    }

    if file_of(pawn) >= 4 {
        strong_king = flip_horizontal(strong_king);
        weak_king = flip_horizontal(weak_king);
        pawn = flip_horizontal(pawn);
    }

    if !kpk.probe(strong_king, pawn, weak_king, us) {
        return None;
    }

    Some(VALUE_KNOWN_WIN + PAWN_VALUE_EG + Value::from(rank_of(pawn)))
}

fn krkp(strong: Color, game_state: &GameState) -> Value {
    let weak = strong.opposite();
    let tempo = Value::from(game_state.side_to_move() == strong);

    let mut wk = game_state.king_square(strong);
    let mut wr = first_square(game_state, strong, PieceKind::Rook);
    let mut bk = game_state.king_square(weak);
    let mut bp = first_square(game_state, weak, PieceKind::Pawn);

    // Orient so the pawn runs toward rank 1.
    if strong == Color::Dark {
        wk = flip_vertical(wk);
        wr = flip_vertical(wr);
        bk = flip_vertical(bk);
        bp = flip_vertical(bp);
    }

    let queening = make_square(file_of(bp), 0);
    let in_front = bp - 8;

    if wk < bp && file_of(wk) == file_of(bp) {
        ROOK_VALUE_EG - distance(wk, bp)
    } else if distance(bk, bp) - (tempo ^ 1) >= 3 && distance(bk, wr) >= 3 {
        ROOK_VALUE_EG - distance(wk, bp)
    } else if rank_of(bk) <= 2
        && distance(bk, bp) == 1
        && rank_of(wk) >= 3
        && distance(wk, bp) - tempo > 2
    {
        80 - distance(wk, bp) * 8
    } else {
        200 - distance(wk, in_front) * 8 + distance(bk, in_front) * 8 + distance(bp, queening) * 8
    }
}

fn krkn(strong: Color, game_state: &GameState) -> Value {
    let weak = strong.opposite();
    let weak_king = game_state.king_square(weak);
    let knight = first_square(game_state, weak, PieceKind::Knight);

    mate_table(weak_king)
        + KRKN_KING_KNIGHT_DISTANCE_PENALTY[chebyshev_distance(weak_king, knight) as usize]
}

fn kqkp(strong: Color, game_state: &GameState) -> Value {
    let weak = strong.opposite();
    let winner_king = game_state.king_square(strong);
    let loser_king = game_state.king_square(weak);
    let pawn = first_square(game_state, weak, PieceKind::Pawn);
    let king_bonus = distance_bonus(chebyshev_distance(winner_king, loser_king));

    // a, c, f and h pawns on the seventh with their king beside them hold
    if chebyshev_distance(loser_king, pawn) == 1
        && relative_rank(weak, pawn) == 6
        && matches!(file_of(pawn), 0 | 2 | 5 | 7)
    {
        return king_bonus;
    }

    QUEEN_VALUE_EG - PAWN_VALUE_EG + king_bonus
}

fn kqkr(strong: Color, game_state: &GameState) -> Value {
    let winner_king = game_state.king_square(strong);
    let loser_king = game_state.king_square(strong.opposite());

    QUEEN_VALUE_EG - ROOK_VALUE_EG
        + mate_table(loser_king)
        + distance_bonus(chebyshev_distance(winner_king, loser_king))
}

fn kbbkn(strong: Color, game_state: &GameState) -> Value {
    let weak = strong.opposite();
    let winner_king = game_state.king_square(strong);
    let loser_king = game_state.king_square(weak);
    let knight = first_square(game_state, weak, PieceKind::Knight);
    let knight_mobility = game_state.tables().knight_attacks(knight).count_ones() as Value;

    BISHOP_VALUE_EG
        + distance_bonus(chebyshev_distance(winner_king, loser_king))
        + distance(loser_king, knight) * 32
        + (8 - knight_mobility) * 8
}
