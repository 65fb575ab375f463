//! Scale factors for endgames that are often drawn despite a material edge.
//!
//! A scaler looks for one specific drawish configuration. When it finds it,
//! it returns a factor in `SCALE_FACTOR_DRAW..=SCALE_FACTOR_MAX`. When the
//! configuration is absent, it returns `SCALE_FACTOR_NONE` and the general
//! evaluation stands.

use crate::endgame::evaluators::first_square;
use crate::endgame::values::*;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::geometry::{
    chebyshev_distance, file_distance, forward_square, relative_rank, relative_square,
};

/// Endgame patterns with a scaling function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalerKind {
    /// Bishop and pawns against a king, possibly with pawns.
    Kbpsk,
    /// Queen against rook and pawns.
    Kqkrps,
    Krpkr,
    Krppkrp,
    Kbpkb,
    Kbppkb,
    Kbpkn,
    Knpk,
    Knpkb,
}

/// Factor for `game_state`, `strong` being the side the pattern favours.
pub fn scale(kind: ScalerKind, strong: Color, game_state: &GameState) -> ScaleFactor {
    match kind {
        ScalerKind::Kbpsk => kbpsk(strong, game_state),
        ScalerKind::Kqkrps => kqkrps(strong, game_state),
        ScalerKind::Krpkr => krpkr(strong, game_state),
        ScalerKind::Krppkrp => krppkrp(strong, game_state),
        ScalerKind::Kbpkb => kbpkb(strong, game_state),
        ScalerKind::Kbppkb => kbppkb(strong, game_state),
        ScalerKind::Kbpkn => kbpkn(strong, game_state),
        ScalerKind::Knpk => knpk(strong, game_state),
        ScalerKind::Knpkb => knpkb(strong, game_state),
    }
}

#[inline]
fn distance(a: Square, b: Square) -> i32 {
    i32::from(chebyshev_distance(a, b))
}

/// Frontmost relative rank among `pawns`, seen from `color`.
fn frontmost_rank(color: Color, mut pawns: Bitboard) -> u8 {
    let mut best = 0;
    while pawns != 0 {
        best = best.max(relative_rank(color, pop_lsb(&mut pawns)));
    }
    best
}

fn kbpsk(strong: Color, game_state: &GameState) -> ScaleFactor {
    let weak = strong.opposite();
    let tables = game_state.tables();
    let pawns = game_state.pieces(strong, PieceKind::Pawn);
    let pawn_file = file_of(first_square(game_state, strong, PieceKind::Pawn));
    let bishop = first_square(game_state, strong, PieceKind::Bishop);
    let weak_king = game_state.king_square(weak);

    // rook pawns with a bishop that does not control the queening square
    if (pawn_file == 0 || pawn_file == 7) && pawns & !tables.file_mask(pawn_file) == 0 {
        let queening = relative_square(strong, make_square(pawn_file, 7));

        if opposite_colors(queening, bishop) && file_of(weak_king).abs_diff(pawn_file) <= 1 {
            let front = frontmost_rank(strong, pawns);
            if chebyshev_distance(weak_king, queening) <= 1
                || relative_rank(strong, weak_king) >= front
            {
                return SCALE_FACTOR_DRAW;
            }
        }
    }

    // b or g pawns blocked by a defending pawn on the seventh
    let weak_pawns = game_state.pieces(weak, PieceKind::Pawn);
    if (pawn_file == 1 || pawn_file == 6)
        && (pawns | weak_pawns) & !tables.file_mask(pawn_file) == 0
        && game_state.non_pawn_material(weak) == 0
        && weak_pawns != 0
    {
        // defending pawn closest to the strong side's queening square
        let weak_pawn = match strong {
            Color::Light => 63 - weak_pawns.leading_zeros() as Square,
            Color::Dark => weak_pawns.trailing_zeros() as Square,
        };
        let strong_king = game_state.king_square(strong);

        if relative_rank(strong, weak_pawn) == 6
            && opposite_colors(bishop, weak_pawn)
            && chebyshev_distance(weak_pawn, weak_king) <= chebyshev_distance(weak_pawn, strong_king)
        {
            return SCALE_FACTOR_DRAW;
        }
    }

    SCALE_FACTOR_NONE
}

/// Fortress: rook on the third rank guarded by a pawn, king behind it.
fn kqkrps(strong: Color, game_state: &GameState) -> ScaleFactor {
    let weak = strong.opposite();
    let tables = game_state.tables();
    let weak_king = game_state.king_square(weak);
    let weak_pawns = game_state.pieces(weak, PieceKind::Pawn);
    let weak_rooks = game_state.pieces(weak, PieceKind::Rook);
    let third_rank = tables.rank_mask(relative_rank(weak, make_square(0, 2)));
    let second_rank = tables.rank_mask(relative_rank(weak, make_square(0, 1)));

    if relative_rank(weak, weak_king) <= 1
        && relative_rank(weak, game_state.king_square(strong)) >= 3
        && weak_rooks & third_rank != 0
        && weak_pawns & second_rank != 0
        && tables.king_attacks(weak_king) & weak_pawns != 0
    {
        let rook = first_square(game_state, weak, PieceKind::Rook);
        if tables.pawn_attacks(strong, rook) & weak_pawns != 0 {
            return SCALE_FACTOR_DRAW;
        }
    }

    SCALE_FACTOR_NONE
}

fn krpkr(strong: Color, game_state: &GameState) -> ScaleFactor {
    let weak = strong.opposite();
    let mut wk = game_state.king_square(strong);
    let mut wr = first_square(game_state, strong, PieceKind::Rook);
    let mut wp = first_square(game_state, strong, PieceKind::Pawn);
    let mut bk = game_state.king_square(weak);
    let mut br = first_square(game_state, weak, PieceKind::Rook);

    // Orient: the strong side plays up the board with the pawn on files a-d.
    if strong == Color::Dark {
        wk = flip_vertical(wk);
        wr = flip_vertical(wr);
        wp = flip_vertical(wp);
        bk = flip_vertical(bk);
        br = flip_vertical(br);
    }
    if file_of(wp) > 3 {
        wk = flip_horizontal(wk);
        wr = flip_horizontal(wr);
        wp = flip_horizontal(wp);
        bk = flip_horizontal(bk);
        br = flip_horizontal(br);
    }

    let f = file_of(wp);
    let r = rank_of(wp);
    let queening = make_square(f, 7);
    let tempo = i32::from(game_state.side_to_move() == strong);

    // third-rank defence
    if r <= 4
        && distance(bk, queening) <= 1
        && wk <= 39
        && (rank_of(br) == 5 || (r <= 2 && rank_of(wr) != 5))
    {
        return SCALE_FACTOR_DRAW;
    }

    // checks from behind once the pawn reaches the sixth
    if r == 5
        && distance(bk, queening) <= 1
        && i32::from(rank_of(wk)) + tempo <= 5
        && (rank_of(br) == 0 || (tempo == 0 && file_of(br).abs_diff(f) >= 3))
    {
        return SCALE_FACTOR_DRAW;
    }

    if r >= 5
        && bk == queening
        && rank_of(br) == 0
        && (tempo == 0 || distance(wk, wp) >= 2)
    {
        return SCALE_FACTOR_DRAW;
    }

    // a7 pawn with rook on a8, defending king on g7 or h7 and rook behind the pawn
    if wp == 48
        && wr == 56
        && (bk == 55 || bk == 54)
        && file_of(br) == 0
        && (rank_of(br) <= 2 || file_of(wk) >= 3 || rank_of(wk) <= 4)
    {
        return SCALE_FACTOR_DRAW;
    }

    // defending king blocks the pawn and the attacking pieces are far away
    if r <= 4
        && bk == wp + 8
        && distance(wk, wp) - tempo >= 2
        && distance(wk, br) - tempo >= 2
    {
        return SCALE_FACTOR_DRAW;
    }

    // seventh-rank pawn supported from behind and the attacking king is closer
    if r == 6
        && f != 0
        && file_of(wr) == f
        && wr != queening
        && distance(wk, queening) < distance(bk, queening) - 2 + tempo
        && distance(wk, queening) < distance(bk, wr) + tempo
    {
        return SCALE_FACTOR_MAX - 2 * chebyshev_distance(wk, queening);
    }

    // same with the pawn further back
    let in_front = wp + 8;
    if f != 0
        && file_of(wr) == f
        && wr < wp
        && distance(wk, queening) < distance(bk, queening) - 2 + tempo
        && distance(wk, in_front) < distance(bk, in_front) - 2 + tempo
        && (distance(bk, wr) + tempo >= 3
            || (distance(wk, queening) < distance(bk, wr) + tempo
                && distance(wk, in_front) < distance(bk, wr) + tempo))
    {
        return SCALE_FACTOR_MAX
            - 8 * chebyshev_distance(wp, queening)
            - 2 * chebyshev_distance(wk, queening);
    }

    // defending king in the path of a pawn that has not advanced far
    if r <= 3 && bk > wp {
        if file_of(bk) == file_of(wp) {
            return 10;
        }
        if file_of(bk).abs_diff(file_of(wp)) == 1 && distance(wk, bk) > 2 {
            return 24 - 2 * chebyshev_distance(wk, bk);
        }
    }

    SCALE_FACTOR_NONE
}

fn krppkrp(strong: Color, game_state: &GameState) -> ScaleFactor {
    let weak = strong.opposite();
    let tables = game_state.tables();
    let mut pawns = game_state.pieces(strong, PieceKind::Pawn);
    let first = pop_lsb(&mut pawns);
    let second = pop_lsb(&mut pawns);
    let weak_king = game_state.king_square(weak);
    let weak_pawns = game_state.pieces(weak, PieceKind::Pawn);

    let is_passed = |square| tables.passed_pawn_mask(strong, square) & weak_pawns == 0;
    if is_passed(first) || is_passed(second) {
        return SCALE_FACTOR_NONE;
    }

    let r = relative_rank(strong, first).max(relative_rank(strong, second));

    if file_distance(weak_king, first) <= 1
        && file_distance(weak_king, second) <= 1
        && relative_rank(strong, weak_king) > r
    {
        match r {
            1 | 2 => return 10,
            3 => return 15,
            4 => return 20,
            5 => return 40,
            _ => {}
        }
    }

    SCALE_FACTOR_NONE
}

/// Defending king on the pawn's file in front of it and out of the bishop's reach.
fn king_blocks_pawn(strong: Color, game_state: &GameState) -> bool {
    let pawn = first_square(game_state, strong, PieceKind::Pawn);
    let bishop = first_square(game_state, strong, PieceKind::Bishop);
    let weak_king = game_state.king_square(strong.opposite());

    file_of(weak_king) == file_of(pawn)
        && relative_rank(strong, pawn) < relative_rank(strong, weak_king)
        && (opposite_colors(weak_king, bishop) || relative_rank(strong, weak_king) <= 5)
}

fn kbpkb(strong: Color, game_state: &GameState) -> ScaleFactor {
    if king_blocks_pawn(strong, game_state) {
        return SCALE_FACTOR_DRAW;
    }

    let weak = strong.opposite();
    let tables = game_state.tables();
    let pawn = first_square(game_state, strong, PieceKind::Pawn);
    let strong_bishop = first_square(game_state, strong, PieceKind::Bishop);
    let weak_bishop = first_square(game_state, weak, PieceKind::Bishop);

    if opposite_colors(strong_bishop, weak_bishop) {
        if relative_rank(strong, pawn) <= 4 {
            return SCALE_FACTOR_DRAW;
        }

        let path = tables.forward_mask(strong, pawn);
        if path & game_state.pieces(weak, PieceKind::King) != 0 {
            return SCALE_FACTOR_DRAW;
        }
        if tables.bishop_attacks(weak_bishop, game_state.occupied()) & path != 0
            && chebyshev_distance(weak_bishop, pawn) >= 3
        {
            return SCALE_FACTOR_DRAW;
        }
    }

    SCALE_FACTOR_NONE
}

fn kbppkb(strong: Color, game_state: &GameState) -> ScaleFactor {
    let weak = strong.opposite();
    let tables = game_state.tables();
    let strong_bishop = first_square(game_state, strong, PieceKind::Bishop);
    let weak_bishop = first_square(game_state, weak, PieceKind::Bishop);

    if !opposite_colors(strong_bishop, weak_bishop) {
        return SCALE_FACTOR_NONE;
    }

    let weak_king = game_state.king_square(weak);
    let mut pawns = game_state.pieces(strong, PieceKind::Pawn);
    let first = pop_lsb(&mut pawns);
    let second = pop_lsb(&mut pawns);

    let (leader, trailer) = if relative_rank(strong, first) > relative_rank(strong, second) {
        (first, second)
    } else {
        (second, first)
    };
    let Some(block_ahead) = forward_square(strong, leader) else {
        return SCALE_FACTOR_NONE;
    };
    let block_beside = make_square(file_of(trailer), rank_of(leader));
    let weak_bishops = game_state.pieces(weak, PieceKind::Bishop);
    let diagonals = |square| tables.bishop_attacks(square, game_state.occupied());

    match file_distance(first, second) {
        0 => {
            if file_of(weak_king) == file_of(block_ahead)
                && relative_rank(strong, weak_king) >= relative_rank(strong, block_ahead)
                && opposite_colors(weak_king, strong_bishop)
            {
                return SCALE_FACTOR_DRAW;
            }
        }
        1 => {
            if weak_king == block_ahead
                && opposite_colors(weak_king, strong_bishop)
                && (weak_bishop == block_beside
                    || diagonals(block_beside) & weak_bishops != 0
                    || rank_of(first).abs_diff(rank_of(second)) >= 2)
            {
                return SCALE_FACTOR_DRAW;
            }
            if weak_king == block_beside
                && opposite_colors(weak_king, strong_bishop)
                && (weak_bishop == block_ahead
                    || diagonals(block_ahead) & weak_bishops != 0)
            {
                return SCALE_FACTOR_DRAW;
            }
        }
        _ => {}
    }

    SCALE_FACTOR_NONE
}

fn kbpkn(strong: Color, game_state: &GameState) -> ScaleFactor {
    if king_blocks_pawn(strong, game_state) {
        SCALE_FACTOR_DRAW
    } else {
        SCALE_FACTOR_NONE
    }
}

/// Knight cannot win with a rook pawn on the seventh and the king in the corner.
fn knpk(strong: Color, game_state: &GameState) -> ScaleFactor {
    let pawn = first_square(game_state, strong, PieceKind::Pawn);
    let weak_king = game_state.king_square(strong.opposite());

    for (seventh, corner) in [(48, 56), (55, 63)] {
        if pawn == relative_square(strong, seventh)
            && chebyshev_distance(weak_king, relative_square(strong, corner)) <= 1
        {
            return SCALE_FACTOR_DRAW;
        }
    }

    SCALE_FACTOR_NONE
}

/// The defending king must come close when the bishop already controls the path.
fn knpkb(strong: Color, game_state: &GameState) -> ScaleFactor {
    let weak = strong.opposite();
    let tables = game_state.tables();
    let pawn = first_square(game_state, strong, PieceKind::Pawn);
    let bishop = first_square(game_state, weak, PieceKind::Bishop);
    let weak_king = game_state.king_square(weak);

    if tables.forward_mask(strong, pawn) & tables.bishop_attacks(bishop, game_state.occupied()) != 0 {
        return chebyshev_distance(weak_king, pawn);
    }

    SCALE_FACTOR_NONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::position;

    fn factor(kind: ScalerKind, strong: Color, fen: &str) -> ScaleFactor {
        scale(kind, strong, &position(fen))
    }

    #[test]
    fn wrong_rook_pawn_bishop_is_a_draw() {
        // h-pawn with a light-squared bishop, defender in the h8 corner
        assert_eq!(
            factor(ScalerKind::Kbpsk, Color::Light, "7k/8/8/8/7P/8/8/4KB2 w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        // a dark-squared bishop controls h8
        assert_eq!(
            factor(ScalerKind::Kbpsk, Color::Light, "7k/8/8/8/7P/8/8/2B1K3 w - - 0 1"),
            SCALE_FACTOR_NONE
        );
        // Dark a-pawn running to a1: only the dark-squared bishop helps
        assert_eq!(
            factor(ScalerKind::Kbpsk, Color::Dark, "4k1b1/8/8/p7/8/8/8/K7 w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        assert_eq!(
            factor(ScalerKind::Kbpsk, Color::Dark, "4kb2/8/8/p7/8/8/8/K7 w - - 0 1"),
            SCALE_FACTOR_NONE
        );
    }

    #[test]
    fn queen_against_rook_fortress() {
        assert_eq!(
            factor(ScalerKind::Kqkrps, Color::Dark, "8/8/8/3q4/3k4/2R5/3P4/3K4 w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        assert_eq!(
            factor(ScalerKind::Kqkrps, Color::Dark, "8/8/8/3q4/3k4/8/3P4/2RK4 w - - 0 1"),
            SCALE_FACTOR_NONE
        );
    }

    #[test]
    fn rook_pawn_third_rank_defence() {
        // defending king on the queening square, rook on the sixth
        assert_eq!(
            factor(ScalerKind::Krpkr, Color::Light, "3k4/8/r7/3P4/4K3/8/8/7R w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        // rook left the sixth and the attacking king already reached the fifth
        assert_eq!(
            factor(ScalerKind::Krpkr, Color::Light, "3k4/7r/8/3PK3/8/8/8/R7 w - - 0 1"),
            SCALE_FACTOR_NONE
        );
    }

    #[test]
    fn defending_king_on_pawn_file_scales_down() {
        assert_eq!(
            factor(ScalerKind::Krpkr, Color::Light, "8/8/3k4/8/8/3P4/8/r3K2R w - - 0 1"),
            10
        );
    }

    #[test]
    fn blocked_bishop_pawn_endings_are_drawn() {
        // king in front of the pawn on a square the bishop never reaches
        assert_eq!(
            factor(ScalerKind::Kbpkn, Color::Light, "8/8/3k4/3P4/8/8/8/2B1K1n1 w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        // opposite-colored bishops with the pawn not past the fifth
        assert_eq!(
            factor(ScalerKind::Kbpkb, Color::Light, "8/8/k7/8/3P4/8/8/2B1K2b w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        // same-colored bishops and no blockade
        assert_eq!(
            factor(ScalerKind::Kbpkb, Color::Light, "8/8/k7/8/3P4/8/8/2B1K1b1 w - - 0 1"),
            SCALE_FACTOR_NONE
        );
    }

    #[test]
    fn opposite_bishops_two_pawns_on_one_file() {
        assert_eq!(
            factor(ScalerKind::Kbppkb, Color::Light, "3k4/8/8/3P4/3P4/8/8/3BK1b1 w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
    }

    #[test]
    fn knight_rook_pawn_on_seventh() {
        assert_eq!(
            factor(ScalerKind::Knpk, Color::Light, "k7/P7/8/8/8/8/8/4KN2 w - - 0 1"),
            SCALE_FACTOR_DRAW
        );
        assert_eq!(
            factor(ScalerKind::Knpk, Color::Light, "8/P7/8/8/7k/8/8/4KN2 w - - 0 1"),
            SCALE_FACTOR_NONE
        );
    }

    #[test]
    fn knight_pawn_against_bishop_uses_king_distance() {
        // the h5 bishop covers e8 on the pawn's path
        assert_eq!(
            factor(ScalerKind::Knpkb, Color::Light, "k7/8/8/4P2b/8/8/8/4KN2 w - - 0 1"),
            4
        );
    }

    #[test]
    fn connected_non_passed_pawns_with_active_king() {
        // f and g pawns on the fourth/third, defender blockades on the sixth
        assert_eq!(
            factor(ScalerKind::Krppkrp, Color::Light, "8/8/5pk1/8/5P2/6P1/r7/4K2R w - - 0 1"),
            15
        );
    }
}
