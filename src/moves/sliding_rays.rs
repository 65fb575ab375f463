//! Ray casting for sliding pieces.
//!
//! These are the slow reference routines: the magic tables are filled from
//! `trace_attacks` and the relevancy masks come from `relevant_mask`.

use crate::game_state::chess_types::{Bitboard, Square};

/// The two slider families the magic tables cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl Slider {
    #[inline]
    pub const fn directions(self) -> &'static [(i8, i8); 4] {
        match self {
            Slider::Rook => &ROOK_DIRECTIONS,
            Slider::Bishop => &BISHOP_DIRECTIONS,
        }
    }

    /// Width of the per-square magic index.
    #[inline]
    pub const fn index_bits(self) -> u32 {
        match self {
            Slider::Rook => 12,
            Slider::Bishop => 9,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Slider::Rook => "rook",
            Slider::Bishop => "bishop",
        }
    }
}

pub const ROOK_RAYS: [Bitboard; 64] = empty_board_rays(&ROOK_DIRECTIONS);
pub const BISHOP_RAYS: [Bitboard; 64] = empty_board_rays(&BISHOP_DIRECTIONS);

/// Squares attacked from `square`, each ray stopping on (and including) the
/// first occupied square.
pub fn trace_attacks(square: Square, directions: &[(i8, i8)], occupancy: Bitboard) -> Bitboard {
    let mut attacks = 0u64;

    for &(file_step, rank_step) in directions {
        let mut file = (square % 8) as i8 + file_step;
        let mut rank = (square / 8) as i8 + rank_step;

        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;

            if occupancy & bit != 0 {
                break;
            }

            file += file_step;
            rank += rank_step;
        }
    }

    attacks
}

/// Squares whose occupancy can change the attack set: every ray square except
/// the last one before the edge.
pub fn relevant_mask(square: Square, directions: &[(i8, i8)]) -> Bitboard {
    let mut mask = 0u64;

    for &(file_step, rank_step) in directions {
        let mut file = (square % 8) as i8 + file_step;
        let mut rank = (square / 8) as i8 + rank_step;

        while (0..8).contains(&(file + file_step)) && (0..8).contains(&(rank + rank_step)) {
            mask |= 1u64 << (rank * 8 + file);
            file += file_step;
            rank += rank_step;
        }
    }

    mask
}

/// Every subset of `mask`, starting with the empty set (carry-rippler walk).
pub fn occupancy_subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;

    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    subsets
}

const fn empty_board_rays(directions: &[(i8, i8); 4]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let mut rays = 0u64;
        let mut d = 0usize;

        while d < 4 {
            let (file_step, rank_step) = directions[d];
            let mut file = (sq % 8) as i8 + file_step;
            let mut rank = (sq / 8) as i8 + rank_step;

            while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                rays |= 1u64 << (rank as u32 * 8 + file as u32);
                file += file_step;
                rank += rank_step;
            }
            d += 1;
        }

        table[sq] = rays;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_rays_from_d4_have_fourteen_squares() {
        assert_eq!(ROOK_RAYS[27].count_ones(), 14);
        assert_eq!(BISHOP_RAYS[27].count_ones(), 13);
    }

    #[test]
    fn rook_blocker_stops_ray() {
        let blocker_on_a4 = 1u64 << 24;
        let attacks = trace_attacks(0, &ROOK_DIRECTIONS, blocker_on_a4);

        assert_ne!(attacks & (1u64 << 24), 0);
        assert_eq!(attacks & (1u64 << 32), 0);
        assert_ne!(attacks & (1u64 << 7), 0);
    }

    #[test]
    fn relevant_masks_match_known_popcounts() {
        assert_eq!(relevant_mask(0, &ROOK_DIRECTIONS).count_ones(), 12);
        assert_eq!(relevant_mask(27, &ROOK_DIRECTIONS).count_ones(), 10);
        assert_eq!(relevant_mask(0, &BISHOP_DIRECTIONS).count_ones(), 6);
        assert_eq!(relevant_mask(27, &BISHOP_DIRECTIONS).count_ones(), 9);
    }

    #[test]
    fn relevancy_masks_fit_the_index_width() {
        for sq in 0..64u8 {
            assert!(relevant_mask(sq, Slider::Rook.directions()).count_ones() <= Slider::Rook.index_bits());
            assert!(
                relevant_mask(sq, Slider::Bishop.directions()).count_ones()
                    <= Slider::Bishop.index_bits()
            );
        }
    }

    #[test]
    fn subsets_enumerate_the_power_set() {
        let mask = (1u64 << 3) | (1u64 << 9) | (1u64 << 40);
        let subsets = occupancy_subsets(mask);
        assert_eq!(subsets.len(), 8);
        assert!(subsets.iter().all(|s| s & !mask == 0));
    }
}
