//! Immutable attack and geometry tables.
//!
//! `AttackTables` is built once before any position exists and is shared by
//! reference (usually an `Arc`) with every position and search worker. Nothing
//! in it changes after `build_with` returns, so concurrent reads need no locks.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::errors::ChessResult;
use crate::game_state::chess_types::{file_of, rank_of, Bitboard, Color, Square};
use crate::moves::geometry::{
    build_adjacent_file_masks, build_between_masks, build_file_masks, build_in_front_masks,
    build_rank_masks, chebyshev_distance,
};
use crate::moves::magics::MagicTable;
use crate::moves::sliding_rays::{Slider, BISHOP_RAYS, ROOK_RAYS};
use crate::moves::step_attacks::{
    KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS, PAWN_DOUBLE_PUSHES, PAWN_PUSHES,
};

/// Knobs for the one-time magic-number search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Seed for the candidate generator; a fixed seed gives reproducible tables.
    pub magic_seed: u64,
    /// Candidates tried per square before giving up.
    pub max_trials_per_square: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            magic_seed: 0x5EED_CA55_1E5C_0DE5,
            max_trials_per_square: 50_000_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn_attacks: [[Bitboard; 64]; 2],
    pawn_pushes: [[Bitboard; 64]; 2],
    pawn_double_pushes: [[Bitboard; 64]; 2],
    passed_pawn: [[Bitboard; 64]; 2],
    forward: [[Bitboard; 64]; 2],
    in_front: [[Bitboard; 8]; 2],
    files: [Bitboard; 8],
    ranks: [Bitboard; 8],
    adjacent_files: [Bitboard; 8],
    between: Vec<Bitboard>,
    distance: Vec<u8>,
    rook: MagicTable,
    bishop: MagicTable,
}

impl AttackTables {
    /// Build with the default deterministic seed.
    pub fn build() -> ChessResult<Self> {
        Self::build_with(&TableConfig::default())
    }

    pub fn build_with(config: &TableConfig) -> ChessResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.magic_seed);
        let rook = MagicTable::build(Slider::Rook, &mut rng, config.max_trials_per_square)?;
        let bishop = MagicTable::build(Slider::Bishop, &mut rng, config.max_trials_per_square)?;

        let files = build_file_masks();
        let ranks = build_rank_masks();
        let adjacent_files = build_adjacent_file_masks(&files);
        let in_front = build_in_front_masks(&ranks);

        let mut forward = [[0u64; 64]; 2];
        let mut passed_pawn = [[0u64; 64]; 2];
        for color in Color::ALL {
            let c = color.index();
            for square in 0..64u8 {
                let ahead = in_front[c][rank_of(square) as usize];
                let file = file_of(square) as usize;
                forward[c][square as usize] = ahead & files[file];
                passed_pawn[c][square as usize] = ahead & (files[file] | adjacent_files[file]);
            }
        }

        let mut distance = vec![0u8; 64 * 64];
        for a in 0..64u8 {
            for b in 0..64u8 {
                distance[a as usize * 64 + b as usize] = chebyshev_distance(a, b);
            }
        }

        info!(seed = config.magic_seed, "attack tables ready");

        Ok(Self {
            knight: KNIGHT_ATTACKS,
            king: KING_ATTACKS,
            pawn_attacks: PAWN_ATTACKS,
            pawn_pushes: PAWN_PUSHES,
            pawn_double_pushes: PAWN_DOUBLE_PUSHES,
            passed_pawn,
            forward,
            in_front,
            files,
            ranks,
            adjacent_files,
            between: build_between_masks(),
            distance,
            rook,
            bishop,
        })
    }

    // --- Sliding pieces ---

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.rook.attacks(square, occupancy)
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.bishop.attacks(square, occupancy)
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.rook_attacks(square, occupancy) | self.bishop_attacks(square, occupancy)
    }

    /// Empty-board rook attacks.
    #[inline]
    pub fn rook_rays(&self, square: Square) -> Bitboard {
        ROOK_RAYS[square as usize]
    }

    #[inline]
    pub fn bishop_rays(&self, square: Square) -> Bitboard {
        BISHOP_RAYS[square as usize]
    }

    #[inline]
    pub fn queen_rays(&self, square: Square) -> Bitboard {
        ROOK_RAYS[square as usize] | BISHOP_RAYS[square as usize]
    }

    pub fn magic_table(&self, slider: Slider) -> &MagicTable {
        match slider {
            Slider::Rook => &self.rook,
            Slider::Bishop => &self.bishop,
        }
    }

    // --- Stepping pieces ---

    #[inline]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight[square as usize]
    }

    #[inline]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.king[square as usize]
    }

    #[inline]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_attacks[color.index()][square as usize]
    }

    #[inline]
    pub fn pawn_push(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_pushes[color.index()][square as usize]
    }

    #[inline]
    pub fn pawn_double_push(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_double_pushes[color.index()][square as usize]
    }

    // --- Geometry ---

    /// Squares ahead of a pawn on its own and adjacent files.
    #[inline]
    pub fn passed_pawn_mask(&self, color: Color, square: Square) -> Bitboard {
        self.passed_pawn[color.index()][square as usize]
    }

    /// Squares ahead of `square` on its file, from `color`'s point of view.
    #[inline]
    pub fn forward_mask(&self, color: Color, square: Square) -> Bitboard {
        self.forward[color.index()][square as usize]
    }

    /// Every square on ranks ahead of `square`'s rank.
    #[inline]
    pub fn in_front_mask(&self, color: Color, square: Square) -> Bitboard {
        self.in_front[color.index()][rank_of(square) as usize]
    }

    #[inline]
    pub fn file_mask(&self, file: u8) -> Bitboard {
        self.files[file as usize]
    }

    #[inline]
    pub fn rank_mask(&self, rank: u8) -> Bitboard {
        self.ranks[rank as usize]
    }

    #[inline]
    pub fn file_adjacent_mask(&self, file: u8) -> Bitboard {
        self.adjacent_files[file as usize]
    }

    /// Squares strictly between two squares on a common line; empty otherwise.
    #[inline]
    pub fn between(&self, a: Square, b: Square) -> Bitboard {
        self.between[a as usize * 64 + b as usize]
    }

    /// True when the three squares lie on one rank, file or diagonal.
    #[inline]
    pub fn is_aligned(&self, a: Square, b: Square, c: Square) -> bool {
        let line = self.between(a, b) | self.between(a, c) | self.between(b, c);
        line & ((1u64 << a) | (1u64 << b) | (1u64 << c)) != 0
    }

    #[inline]
    pub fn square_distance(&self, a: Square, b: Square) -> u8 {
        self.distance[a as usize * 64 + b as usize]
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::chess_types::Color;
    use crate::moves::sliding_rays::{occupancy_subsets, trace_attacks, Slider};
    use crate::test_support::shared_tables;

    #[test]
    fn magic_lookups_equal_ray_casting_for_every_relevant_subset() {
        let tables = shared_tables();
        for slider in [Slider::Rook, Slider::Bishop] {
            let magic = tables.magic_table(slider);
            for square in 0..64u8 {
                for occ in occupancy_subsets(magic.mask(square)) {
                    assert_eq!(
                        magic.attacks(square, occ),
                        trace_attacks(square, slider.directions(), occ),
                        "{} on {square} with {occ:#x}",
                        slider.name()
                    );
                }
            }
        }
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let tables = shared_tables();
        let blockers = (1u64 << 43) | (1u64 << 30);
        let attacks = tables.queen_attacks(27, blockers);

        assert_ne!(attacks & (1u64 << 43), 0);
        assert_ne!(attacks & (1u64 << 30), 0);
        assert_eq!(attacks & (1u64 << 51), 0);
        assert_eq!(attacks & (1u64 << 31), 0);
        assert_eq!(tables.queen_rays(27).count_ones(), 27);
    }

    #[test]
    fn pawn_masks_follow_color() {
        let tables = shared_tables();
        // e4 light: e5..e8 forward, d5..f8 passed region
        assert_eq!(tables.forward_mask(Color::Light, 28).count_ones(), 4);
        assert_eq!(tables.passed_pawn_mask(Color::Light, 28).count_ones(), 12);
        assert_eq!(tables.forward_mask(Color::Dark, 28).count_ones(), 3);
        assert_eq!(tables.passed_pawn_mask(Color::Dark, 24).count_ones(), 6);

        assert_eq!(tables.file_adjacent_mask(0), tables.file_mask(1));
        assert_eq!(tables.in_front_mask(Color::Light, 48), tables.rank_mask(7));
        assert_eq!(tables.in_front_mask(Color::Dark, 8), tables.rank_mask(0));
    }

    #[test]
    fn alignment_uses_between_masks() {
        let tables = shared_tables();
        assert!(tables.is_aligned(0, 9, 63));
        assert!(tables.is_aligned(0, 4, 7));
        assert!(!tables.is_aligned(0, 10, 63));
        assert_eq!(tables.between(4, 7), (1u64 << 5) | (1u64 << 6));
        assert_eq!(tables.square_distance(0, 63), 7);
    }
}
