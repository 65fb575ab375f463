//! King and pawn versus king win/draw bitbase.
//!
//! Positions are normalized so the pawn belongs to Light and stands on files
//! a-d. One index per (attacking king, defending king, side to move, pawn
//! file, pawn rank 2..7). Construction seeds the trivially decided positions
//! and then repeats a retrograde pass until no unknown position changes. Only
//! the WIN bit survives into the stored table.

use tracing::debug;

use crate::game_state::chess_types::*;
use crate::moves::geometry::chebyshev_distance;
use crate::moves::step_attacks::{KING_ATTACKS, PAWN_ATTACKS};

/// Number of indices: `6 << 15` covers every pawn rank offset.
pub const KPK_INDEX_MAX: usize = 2 * 24 * 64 * 64;

const INVALID: u8 = 0;
const UNKNOWN: u8 = 1;
const DRAW: u8 = 2;
const WIN: u8 = 4;

const RANK_2: u8 = 1;
const RANK_7: u8 = 6;

/// Packed index. `pawn` must be on files a-d and ranks 2-7.
#[inline]
fn kpk_index(us: Color, defending_king: Square, attacking_king: Square, pawn: Square) -> usize {
    attacking_king as usize
        | (defending_king as usize) << 6
        | us.index() << 12
        | (file_of(pawn) as usize) << 13
        | ((RANK_7 - rank_of(pawn)) as usize) << 15
}

#[derive(Debug, Clone, Copy)]
struct KpkEntry {
    us: Color,
    attacking_king: Square,
    defending_king: Square,
    pawn: Square,
    result: u8,
}

impl KpkEntry {
    fn from_index(index: usize) -> Self {
        let attacking_king = (index & 0x3F) as Square;
        let defending_king = ((index >> 6) & 0x3F) as Square;
        let us = if (index >> 12) & 1 == 0 {
            Color::Light
        } else {
            Color::Dark
        };
        let pawn = make_square(((index >> 13) & 3) as u8, RANK_7 - (index >> 15) as u8);

        let mut entry = KpkEntry {
            us,
            attacking_king,
            defending_king,
            pawn,
            result: UNKNOWN,
        };
        entry.result = entry.initial_result();
        entry
    }

    fn initial_result(&self) -> u8 {
        let wk = self.attacking_king;
        let bk = self.defending_king;
        let psq = self.pawn;
        let pawn_attacks = PAWN_ATTACKS[Color::Light.index()][psq as usize];

        if chebyshev_distance(wk, bk) <= 1
            || wk == psq
            || bk == psq
            || (self.us == Color::Light && pawn_attacks & square_bit(bk) != 0)
        {
            return INVALID;
        }

        let wk_attacks = KING_ATTACKS[wk as usize];
        let bk_attacks = KING_ATTACKS[bk as usize];

        match self.us {
            Color::Light => {
                // promotes without the queen being taken
                let queening = psq + 8;
                if rank_of(psq) == RANK_7
                    && wk != queening
                    && (chebyshev_distance(bk, queening) > 1
                        || wk_attacks & square_bit(queening) != 0)
                {
                    return WIN;
                }
            }
            Color::Dark => {
                let stalemated = bk_attacks & !(wk_attacks | pawn_attacks) == 0;
                let takes_pawn = bk_attacks & square_bit(psq) & !wk_attacks != 0;
                if stalemated || takes_pawn {
                    return DRAW;
                }
            }
        }

        UNKNOWN
    }

    fn classify(&self, db: &[KpkEntry]) -> u8 {
        let mut reached = INVALID;

        match self.us {
            Color::Light => {
                let mut steps = KING_ATTACKS[self.attacking_king as usize];
                while steps != 0 {
                    let to = pop_lsb(&mut steps);
                    reached |= db[kpk_index(Color::Dark, self.defending_king, to, self.pawn)].result;
                }

                if rank_of(self.pawn) < RANK_7 {
                    let push = self.pawn + 8;
                    reached |= db[kpk_index(
                        Color::Dark,
                        self.defending_king,
                        self.attacking_king,
                        push,
                    )]
                    .result;

                    if rank_of(self.pawn) == RANK_2
                        && push != self.attacking_king
                        && push != self.defending_king
                    {
                        reached |= db[kpk_index(
                            Color::Dark,
                            self.defending_king,
                            self.attacking_king,
                            push + 8,
                        )]
                        .result;
                    }
                }

                if reached & WIN != 0 {
                    WIN
                } else if reached & UNKNOWN != 0 {
                    UNKNOWN
                } else {
                    DRAW
                }
            }
            Color::Dark => {
                let mut steps = KING_ATTACKS[self.defending_king as usize];
                while steps != 0 {
                    let to = pop_lsb(&mut steps);
                    reached |= db[kpk_index(Color::Light, to, self.attacking_king, self.pawn)].result;
                }

                if reached & DRAW != 0 {
                    DRAW
                } else if reached & UNKNOWN != 0 {
                    UNKNOWN
                } else {
                    WIN
                }
            }
        }
    }
}

/// One bit per index, set for positions the pawn side wins.
#[derive(Debug, Clone)]
pub struct KpkBitbase {
    bits: Vec<u64>,
}

impl KpkBitbase {
    pub fn build() -> Self {
        let mut db: Vec<KpkEntry> = (0..KPK_INDEX_MAX).map(KpkEntry::from_index).collect();

        let mut passes = 0usize;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for index in 0..KPK_INDEX_MAX {
                if db[index].result != UNKNOWN {
                    continue;
                }
                let result = db[index].classify(&db);
                if result != UNKNOWN {
                    db[index].result = result;
                    changed = true;
                }
            }
        }

        let mut bits = vec![0u64; KPK_INDEX_MAX / 64];
        for (index, entry) in db.iter().enumerate() {
            if entry.result == WIN {
                bits[index / 64] |= 1u64 << (index % 64);
            }
        }

        let wins: u32 = bits.iter().map(|word| word.count_ones()).sum();
        debug!(passes, wins, "kpk bitbase built");

        Self { bits }
    }

    /// True when the side with the pawn wins.
    ///
    /// Squares must already be normalized: the pawn side plays as Light and
    /// the pawn stands on files a-d, ranks 2-7. `us` is the side to move in
    /// that normalized frame.
    #[inline]
    pub fn probe(
        &self,
        attacking_king: Square,
        pawn: Square,
        defending_king: Square,
        us: Color,
    ) -> bool {
        debug_assert!(file_of(pawn) <= 3);
        debug_assert!((RANK_2..=RANK_7).contains(&rank_of(pawn)));
        let index = kpk_index(us, defending_king, attacking_king, pawn);
        self.bits[index / 64] & (1u64 << (index % 64)) != 0
    }
}
