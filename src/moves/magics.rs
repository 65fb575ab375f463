//! Magic-bitboard hashing for rook and bishop attacks.
//!
//! Per square we keep the relevancy mask, a 64-bit multiplier and an offset into
//! one shared attack table. A lookup is
//! `attacks[offset + ((occupancy & mask) * magic) >> (64 - bits)]`.
//!
//! Multipliers are searched once at construction: random sparse candidates are
//! tried until one sends every relevant occupancy to a slot that holds its
//! exact attack set. Two occupancies may share a slot only if their attack sets
//! are identical. The search is bounded; running out of trials is an error.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Bitboard, Square};
use crate::moves::sliding_rays::{occupancy_subsets, relevant_mask, trace_attacks, Slider};

/// Attack lookup for one slider family.
#[derive(Debug, Clone)]
pub struct MagicTable {
    slider: Slider,
    masks: [Bitboard; 64],
    magics: [u64; 64],
    offsets: [usize; 64],
    shift: u32,
    attacks: Vec<Bitboard>,
}

impl MagicTable {
    /// Search multipliers for every square of `slider`.
    pub fn build(slider: Slider, rng: &mut StdRng, max_trials: u64) -> ChessResult<Self> {
        let bits = slider.index_bits();
        let slots = 1usize << bits;

        let mut table = MagicTable {
            slider,
            masks: [0; 64],
            magics: [0; 64],
            offsets: [0; 64],
            shift: 64 - bits,
            attacks: vec![0; 64 * slots],
        };

        let mut total_trials = 0u64;
        for square in 0..64u8 {
            let mask = relevant_mask(square, slider.directions());
            let occupancies = occupancy_subsets(mask);
            let references: Vec<Bitboard> = occupancies
                .iter()
                .map(|&occ| trace_attacks(square, slider.directions(), occ))
                .collect();

            let (magic, trials) =
                find_magic(slider, square, mask, &occupancies, &references, rng, max_trials)?;
            total_trials += trials;

            let s = square as usize;
            table.masks[s] = mask;
            table.magics[s] = magic;
            table.offsets[s] = s * slots;
            for (&occ, &attack) in occupancies.iter().zip(&references) {
                let index = table.offsets[s] + table.hash(s, occ);
                table.attacks[index] = attack;
            }
        }

        debug!(
            slider = slider.name(),
            total_trials,
            entries = table.attacks.len(),
            "magic table built"
        );

        Ok(table)
    }

    #[inline]
    fn hash(&self, square: usize, relevant: Bitboard) -> usize {
        (relevant.wrapping_mul(self.magics[square]) >> self.shift) as usize
    }

    /// Attacks from `square` under `occupancy`; bits outside the mask are ignored.
    #[inline]
    pub fn attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        let s = square as usize;
        self.attacks[self.offsets[s] + self.hash(s, occupancy & self.masks[s])]
    }

    #[inline]
    pub fn mask(&self, square: Square) -> Bitboard {
        self.masks[square as usize]
    }

    #[inline]
    pub fn magic(&self, square: Square) -> u64 {
        self.magics[square as usize]
    }

    #[inline]
    pub fn slider(&self) -> Slider {
        self.slider
    }
}

fn find_magic(
    slider: Slider,
    square: Square,
    mask: Bitboard,
    occupancies: &[Bitboard],
    references: &[Bitboard],
    rng: &mut StdRng,
    max_trials: u64,
) -> ChessResult<(u64, u64)> {
    let shift = 64 - slider.index_bits();
    let slots = 1usize << slider.index_bits();

    // `stamp[i] == trial` marks slot `i` as written during the current trial.
    let mut stamp = vec![0u64; slots];
    let mut filled = vec![0u64; slots];

    for trial in 1..=max_trials {
        let magic = rng.random::<u64>() & rng.random::<u64>() & rng.random::<u64>();

        // Too few high bits cannot spread the mask over the index range.
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        let mut collision = false;
        for (&occ, &attack) in occupancies.iter().zip(references) {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            if stamp[index] != trial {
                stamp[index] = trial;
                filled[index] = attack;
            } else if filled[index] != attack {
                collision = true;
                break;
            }
        }

        if !collision {
            return Ok((magic, trial));
        }
    }

    Err(ChessError::NoMagicFound {
        slider: slider.name(),
        square,
        trials: max_trials,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::MagicTable;
    use crate::errors::ChessError;
    use crate::moves::sliding_rays::{occupancy_subsets, trace_attacks, Slider};

    #[test]
    fn bishop_table_matches_ray_casting_for_every_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = MagicTable::build(Slider::Bishop, &mut rng, 10_000_000)
            .expect("bishop magics should be found");
        assert_eq!(table.slider(), Slider::Bishop);

        for square in 0..64u8 {
            assert_ne!(table.magic(square), 0, "square {square}");
            for occ in occupancy_subsets(table.mask(square)) {
                assert_eq!(
                    table.attacks(square, occ),
                    trace_attacks(square, Slider::Bishop.directions(), occ),
                    "square {square} occupancy {occ:#x}"
                );
            }
        }
    }

    #[test]
    fn lookup_ignores_irrelevant_occupancy() {
        let mut rng = StdRng::seed_from_u64(11);
        let table = MagicTable::build(Slider::Bishop, &mut rng, 10_000_000)
            .expect("bishop magics should be found");

        // Edge squares and off-diagonal squares never change bishop attacks.
        let noise = 0xFF00_0000_0000_00FFu64 | (1u64 << 28);
        assert_eq!(table.attacks(27, 0), table.attacks(27, noise));
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = MagicTable::build(Slider::Rook, &mut rng, 0).expect_err("zero trials cannot succeed");
        assert!(matches!(err, ChessError::NoMagicFound { slider: "rook", square: 0, .. }));
    }
}
