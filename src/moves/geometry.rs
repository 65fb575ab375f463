//! Board geometry that depends only on square indices.
//!
//! Pure arithmetic helpers live here as free functions. The mask builders are
//! run once by `AttackTables::build_with` and stored in the tables.

use crate::game_state::chess_types::{file_of, rank_of, Bitboard, Color, Square};

/// Rank of `square` as seen from `color`'s side (0 = own back rank).
#[inline]
pub const fn relative_rank(color: Color, square: Square) -> u8 {
    match color {
        Color::Light => rank_of(square),
        Color::Dark => 7 - rank_of(square),
    }
}

/// `square` mirrored onto `color`'s side of the board.
#[inline]
pub const fn relative_square(color: Color, square: Square) -> Square {
    match color {
        Color::Light => square,
        Color::Dark => square ^ 56,
    }
}

/// One step toward the opponent, or `None` from the last rank.
#[inline]
pub const fn forward_square(color: Color, square: Square) -> Option<Square> {
    match color {
        Color::Light if square < 56 => Some(square + 8),
        Color::Dark if square >= 8 => Some(square - 8),
        _ => None,
    }
}

/// One step back toward `color`'s own side, or `None` from the first rank.
#[inline]
pub const fn backward_square(color: Color, square: Square) -> Option<Square> {
    forward_square(color.opposite(), square)
}

#[inline]
pub const fn file_distance(a: Square, b: Square) -> u8 {
    file_of(a).abs_diff(file_of(b))
}

#[inline]
pub const fn rank_distance(a: Square, b: Square) -> u8 {
    rank_of(a).abs_diff(rank_of(b))
}

/// Chebyshev distance: king steps between two squares.
#[inline]
pub const fn chebyshev_distance(a: Square, b: Square) -> u8 {
    let f = file_distance(a, b);
    let r = rank_distance(a, b);
    if f > r {
        f
    } else {
        r
    }
}

pub(crate) fn build_file_masks() -> [Bitboard; 8] {
    std::array::from_fn(|file| 0x0101_0101_0101_0101u64 << file)
}

pub(crate) fn build_rank_masks() -> [Bitboard; 8] {
    std::array::from_fn(|rank| 0xFFu64 << (8 * rank))
}

pub(crate) fn build_adjacent_file_masks(files: &[Bitboard; 8]) -> [Bitboard; 8] {
    std::array::from_fn(|file| {
        let left = if file > 0 { files[file - 1] } else { 0 };
        let right = if file < 7 { files[file + 1] } else { 0 };
        left | right
    })
}

/// `[color][rank]`: every square on a rank strictly ahead of `rank`.
pub(crate) fn build_in_front_masks(ranks: &[Bitboard; 8]) -> [[Bitboard; 8]; 2] {
    let light = std::array::from_fn(|rank| ranks[rank + 1..].iter().fold(0u64, |acc, r| acc | r));
    let dark = std::array::from_fn(|rank| ranks[..rank].iter().fold(0u64, |acc, r| acc | r));
    [light, dark]
}

/// Flat `64 * 64` table: squares strictly between two aligned squares.
pub(crate) fn build_between_masks() -> Vec<Bitboard> {
    const DIRECTIONS: [(i8, i8); 8] = [
        (0, 1),
        (0, -1),
        (1, 0),
        (-1, 0),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];

    let mut table = vec![0u64; 64 * 64];
    for from in 0..64usize {
        for (file_step, rank_step) in DIRECTIONS {
            let mut file = (from % 8) as i8 + file_step;
            let mut rank = (from / 8) as i8 + rank_step;
            let mut walked = 0u64;

            while (0..8).contains(&file) && (0..8).contains(&rank) {
                let to = (rank * 8 + file) as usize;
                table[from * 64 + to] = walked;
                walked |= 1u64 << to;
                file += file_step;
                rank += rank_step;
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_rank_flips_for_dark() {
        assert_eq!(relative_rank(Color::Light, 12), 1);
        assert_eq!(relative_rank(Color::Dark, 12), 6);
        assert_eq!(relative_square(Color::Dark, 0), 56);
    }

    #[test]
    fn forward_square_stops_at_the_edge() {
        assert_eq!(forward_square(Color::Light, 12), Some(20));
        assert_eq!(forward_square(Color::Light, 60), None);
        assert_eq!(forward_square(Color::Dark, 3), None);
        assert_eq!(backward_square(Color::Light, 20), Some(12));
        assert_eq!(backward_square(Color::Dark, 43), Some(51));
    }

    #[test]
    fn distances() {
        assert_eq!(chebyshev_distance(0, 63), 7);
        assert_eq!(chebyshev_distance(27, 29), 2);
        assert_eq!(file_distance(0, 7), 7);
        assert_eq!(rank_distance(0, 7), 0);
    }

    #[test]
    fn between_is_empty_for_unaligned_squares() {
        let between = build_between_masks();
        // a1-h8 diagonal: b2..g7
        assert_eq!(between[63].count_ones(), 6);
        // a1 and b3 are a knight jump apart.
        assert_eq!(between[17], 0);
        // adjacent squares have nothing between them
        assert_eq!(between[1], 0);
    }

    #[test]
    fn in_front_masks_are_exclusive_of_own_rank() {
        let ranks = build_rank_masks();
        let in_front = build_in_front_masks(&ranks);
        assert_eq!(in_front[0][0], !0xFFu64);
        assert_eq!(in_front[1][7], !(0xFFu64 << 56));
        assert_eq!(in_front[0][7], 0);
        assert_eq!(in_front[1][0], 0);
    }
}
