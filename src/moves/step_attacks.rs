//! Occupancy-independent attack tables: knight, king and the three pawn tables.
//!
//! Everything here is computed at compile time from `(file, rank)` deltas.

use crate::game_state::chess_types::{Bitboard, Color};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const LIGHT_PAWN_CAPTURES: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const DARK_PAWN_CAPTURES: [(i8, i8); 2] = [(-1, -1), (1, -1)];
const LIGHT_PAWN_PUSH: [(i8, i8); 1] = [(0, 1)];
const DARK_PAWN_PUSH: [(i8, i8); 1] = [(0, -1)];

pub const KNIGHT_ATTACKS: [Bitboard; 64] = step_table(&KNIGHT_DELTAS);
pub const KING_ATTACKS: [Bitboard; 64] = step_table(&KING_DELTAS);

/// `[color][square]` squares a pawn attacks diagonally.
pub const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    step_table(&LIGHT_PAWN_CAPTURES),
    step_table(&DARK_PAWN_CAPTURES),
];

/// `[color][square]` single-step push target.
pub const PAWN_PUSHES: [[Bitboard; 64]; 2] =
    [step_table(&LIGHT_PAWN_PUSH), step_table(&DARK_PAWN_PUSH)];

/// `[color][square]` two-step push target, non-empty only on the home rank.
pub const PAWN_DOUBLE_PUSHES: [[Bitboard; 64]; 2] =
    [double_push_table(Color::Light), double_push_table(Color::Dark)];

const fn step_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < deltas.len() {
            let (d_file, d_rank) = deltas[i];
            attacks |= set_if_valid(file + d_file, rank + d_rank);
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn double_push_table(color: Color) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let (home_rank, target_rank) = match color {
        Color::Light => (1usize, 3usize),
        Color::Dark => (6usize, 4usize),
    };

    let mut file = 0usize;
    while file < 8 {
        table[home_rank * 8 + file] = 1u64 << (target_rank * 8 + file);
        file += 1;
    }

    table
}

const fn set_if_valid(file: i8, rank: i8) -> Bitboard {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }

    1u64 << ((rank as u32) * 8 + file as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attacks_from_d4_has_eight_targets() {
        let d4 = 27usize;
        assert_eq!(KNIGHT_ATTACKS[d4].count_ones(), 8);
        assert_eq!(KNIGHT_ATTACKS[0], (1u64 << 10) | (1u64 << 17));
    }

    #[test]
    fn king_in_corner_has_three_neighbours() {
        assert_eq!(KING_ATTACKS[0].count_ones(), 3);
        assert_eq!(KING_ATTACKS[27].count_ones(), 8);
    }

    #[test]
    fn light_pawn_attacks_from_e2() {
        let e2 = 12usize;
        assert_eq!(PAWN_ATTACKS[0][e2], (1u64 << 19) | (1u64 << 21));
    }

    #[test]
    fn dark_pawn_attacks_from_a7_stay_on_board() {
        let a7 = 48usize;
        assert_eq!(PAWN_ATTACKS[1][a7], 1u64 << 41);
    }

    #[test]
    fn double_push_only_from_home_rank() {
        assert_eq!(PAWN_DOUBLE_PUSHES[0][12], 1u64 << 28);
        assert_eq!(PAWN_DOUBLE_PUSHES[0][20], 0);
        assert_eq!(PAWN_DOUBLE_PUSHES[1][52], 1u64 << 36);
        assert_eq!(PAWN_PUSHES[1][52], 1u64 << 44);
        assert_eq!(PAWN_PUSHES[0][60], 0);
    }
}
