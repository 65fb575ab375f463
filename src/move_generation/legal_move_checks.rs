use crate::game_state::{chess_types::*, game_state::GameState};

/// True iff `attacker_color` attacks `square` under the current occupancy.
///
/// Probes outward from the target: a pawn of `attacker_color` attacks the
/// square iff a pawn of the other color standing there would attack it.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let tables = game_state.tables();
    let c = attacker_color.index();
    let pieces = &game_state.pieces[c];

    if tables.pawn_attacks(attacker_color.opposite(), square) & pieces[PieceKind::Pawn.index()] != 0
    {
        return true;
    }

    if tables.knight_attacks(square) & pieces[PieceKind::Knight.index()] != 0 {
        return true;
    }

    if tables.king_attacks(square) & pieces[PieceKind::King.index()] != 0 {
        return true;
    }

    let queens = pieces[PieceKind::Queen.index()];
    let bishops_queens = pieces[PieceKind::Bishop.index()] | queens;
    if tables.bishop_rays(square) & bishops_queens != 0
        && tables.bishop_attacks(square, game_state.occupancy_all) & bishops_queens != 0
    {
        return true;
    }

    let rooks_queens = pieces[PieceKind::Rook.index()] | queens;
    tables.rook_rays(square) & rooks_queens != 0
        && tables.rook_attacks(square, game_state.occupancy_all) & rooks_queens != 0
}

/// True iff any square in `targets` is attacked by `attacker_color`.
pub fn is_square_set_attacked(game_state: &GameState, targets: Bitboard, attacker_color: Color) -> bool {
    let mut remaining = targets;
    while remaining != 0 {
        if is_square_attacked(game_state, pop_lsb(&mut remaining), attacker_color) {
            return true;
        }
    }
    false
}

#[inline]
pub fn is_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked(game_state, game_state.king_square(color), color.opposite())
}

/// Every piece of `attacker_color` attacking `square`, with sliders seeing
/// through to `occupancy` instead of the board's own occupancy.
pub fn attackers_to(
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
    occupancy: Bitboard,
) -> Bitboard {
    let tables = game_state.tables();
    let pieces = &game_state.pieces[attacker_color.index()];
    let queens = pieces[PieceKind::Queen.index()];

    (tables.pawn_attacks(attacker_color.opposite(), square) & pieces[PieceKind::Pawn.index()])
        | (tables.knight_attacks(square) & pieces[PieceKind::Knight.index()])
        | (tables.king_attacks(square) & pieces[PieceKind::King.index()])
        | (tables.bishop_attacks(square, occupancy) & (pieces[PieceKind::Bishop.index()] | queens))
        | (tables.rook_attacks(square, occupancy) & (pieces[PieceKind::Rook.index()] | queens))
}

/// Pieces giving check to the side to move.
#[inline]
pub fn checkers(game_state: &GameState) -> Bitboard {
    let us = game_state.side_to_move();
    attackers_to(
        game_state,
        game_state.king_square(us),
        us.opposite(),
        game_state.occupied(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::position;

    #[test]
    fn pawn_attacks_are_probed_from_the_target() {
        let game = position("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1");
        // d5 dark pawn attacks c4 and e4
        assert!(is_square_attacked(&game, 26, Color::Dark));
        assert!(is_square_attacked(&game, 28, Color::Dark));
        assert!(!is_square_attacked(&game, 27, Color::Dark));
        assert!(!is_square_attacked(&game, 44, Color::Dark));
    }

    #[test]
    fn blocked_slider_does_not_attack() {
        let game = position("4k3/8/8/8/8/8/4P3/r3K2R w - - 0 1");
        assert!(is_in_check(&game, Color::Light));
        assert!(!is_square_attacked(&game, 60, Color::Light));
        assert!(!is_square_set_attacked(&game, (1u64 << 59) | (1u64 << 61), Color::Light));
        assert!(is_square_set_attacked(&game, (1u64 << 3) | (1u64 << 40), Color::Dark));
    }

    #[test]
    fn attackers_bitboard_lists_every_checker() {
        let game = position("4k3/8/8/8/1b5n/8/8/r3K3 w - - 0 1");
        assert_eq!(checkers(&game), (1u64 << 0) | (1u64 << 25));
    }

    #[test]
    fn attackers_see_through_removed_blockers() {
        let game = position("4k3/8/8/8/8/8/8/q2RK3 w - - 0 1");
        assert_eq!(attackers_to(&game, 4, Color::Dark, game.occupied()), 0);

        let without_rook = game.occupied() & !(1u64 << 3);
        assert_eq!(attackers_to(&game, 4, Color::Dark, without_rook), 1u64 << 0);
    }
}
