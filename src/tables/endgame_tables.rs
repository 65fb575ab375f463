//! Fixed square and distance tables used by the endgame evaluators.
//!
//! Square tables are indexed a1 = 0 .. h8 = 63.

use crate::endgame::values::Value;

/// Pushes a lone defending king toward any edge, most strongly to a corner.
#[rustfmt::skip]
pub const MATE_TABLE: [Value; 64] = [
    100, 90, 80, 70, 70, 80, 90, 100,
     90, 70, 60, 50, 50, 60, 70,  90,
     80, 60, 40, 30, 30, 40, 60,  80,
     70, 50, 30, 20, 20, 30, 50,  70,
     70, 50, 30, 20, 20, 30, 50,  70,
     80, 60, 40, 30, 30, 40, 60,  80,
     90, 70, 60, 50, 50, 60, 70,  90,
    100, 90, 80, 70, 70, 80, 90, 100,
];

/// Pushes the defending king toward a1 or h8. Callers mirror the board
/// horizontally when the bishop cannot reach those corners.
#[rustfmt::skip]
pub const KBNK_MATE_TABLE: [Value; 64] = [
    200, 190, 180, 170, 160, 150, 140, 130,
    190, 180, 170, 160, 150, 140, 130, 140,
    180, 170, 155, 140, 140, 125, 140, 150,
    170, 160, 140, 120, 110, 140, 150, 160,
    160, 150, 140, 110, 120, 140, 160, 170,
    150, 140, 125, 140, 140, 155, 170, 180,
    140, 130, 140, 150, 160, 170, 180, 190,
    130, 140, 150, 160, 170, 180, 190, 200,
];

/// Bonus for the attacking king, indexed by king distance.
pub const DISTANCE_BONUS: [Value; 8] = [0, 0, 100, 80, 60, 40, 20, 10];

/// KRKN: bonus for separating the defending king from its knight.
pub const KRKN_KING_KNIGHT_DISTANCE_PENALTY: [Value; 8] = [0, 10, 14, 20, 30, 42, 58, 80];

#[inline]
pub fn mate_table(square: u8) -> Value {
    MATE_TABLE[square as usize]
}

#[inline]
pub fn kbnk_mate_table(square: u8) -> Value {
    KBNK_MATE_TABLE[square as usize]
}

#[inline]
pub fn distance_bonus(distance: u8) -> Value {
    DISTANCE_BONUS[distance as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_table_is_symmetric() {
        for square in 0..64u8 {
            assert_eq!(mate_table(square), mate_table(square ^ 56));
            assert_eq!(mate_table(square), mate_table(square ^ 7));
        }
        assert_eq!(mate_table(0), 100);
        assert_eq!(mate_table(27), 20);
    }

    #[test]
    fn kbnk_table_prefers_a1_h8_corners() {
        assert_eq!(kbnk_mate_table(0), 200);
        assert_eq!(kbnk_mate_table(63), 200);
        assert_eq!(kbnk_mate_table(7), 130);
        assert_eq!(kbnk_mate_table(56), 130);
    }

    #[test]
    fn distance_bonus_shrinks_with_distance() {
        // adjacent kings earn nothing
        assert_eq!(distance_bonus(0), 0);
        assert_eq!(distance_bonus(1), 0);
        assert!(DISTANCE_BONUS[2..].windows(2).all(|w| w[0] > w[1]));
    }
}
