//! Material signatures keyed by piece counts alone.
//!
//! Every `(color, kind, ordinal)` triple gets a fixed pseudo-random key. A
//! position's signature is the XOR of the keys for every ordinal below the
//! current count of that piece kind, so adding the n-th knight XORs in the key
//! for ordinal `n - 1` and removing it XORs the same key out again. Kings are
//! never part of the signature.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;

/// Highest per-kind count a signature distinguishes.
pub const MAX_ORDINALS: usize = 16;

struct MaterialKeys {
    keys: [[[u64; MAX_ORDINALS]; 6]; 2],
}

static KEYS: OnceLock<MaterialKeys> = OnceLock::new();

#[inline]
fn keys() -> &'static MaterialKeys {
    KEYS.get_or_init(build_keys)
}

fn build_keys() -> MaterialKeys {
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;

    let mut keys = [[[0u64; MAX_ORDINALS]; 6]; 2];
    for color in &mut keys {
        for (kind_index, kind) in color.iter_mut().enumerate() {
            for ordinal in kind.iter_mut() {
                let key = next_random_u64(&mut seed);
                *ordinal = if kind_index == PieceKind::King.index() {
                    0
                } else {
                    key
                };
            }
        }
    }

    MaterialKeys { keys }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Key for the `ordinal`-th (zero-based) piece of this color and kind.
#[inline]
pub fn material_piece_key(color: Color, kind: PieceKind, ordinal: u8) -> u64 {
    keys().keys[color.index()][kind.index()][ordinal as usize % MAX_ORDINALS]
}

/// Signature for a full `[color][kind]` count table.
pub fn material_key_for_counts(counts: &[[u8; 6]; 2]) -> u64 {
    let mut key = 0u64;
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            for ordinal in 0..counts[color.index()][kind.index()] {
                key ^= material_piece_key(color, kind, ordinal);
            }
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kings_do_not_contribute() {
        let mut counts = [[0u8; 6]; 2];
        assert_eq!(material_key_for_counts(&counts), 0);
        counts[0][PieceKind::King.index()] = 1;
        counts[1][PieceKind::King.index()] = 1;
        assert_eq!(material_key_for_counts(&counts), 0);
    }

    #[test]
    fn color_assignment_changes_the_key() {
        let mut light_rook = [[0u8; 6]; 2];
        light_rook[0][PieceKind::Rook.index()] = 1;
        let mut dark_rook = [[0u8; 6]; 2];
        dark_rook[1][PieceKind::Rook.index()] = 1;

        assert_ne!(
            material_key_for_counts(&light_rook),
            material_key_for_counts(&dark_rook)
        );
    }

    #[test]
    fn second_piece_uses_a_distinct_ordinal() {
        let one = material_piece_key(Color::Light, PieceKind::Knight, 0);
        let two = one ^ material_piece_key(Color::Light, PieceKind::Knight, 1);
        assert_ne!(one, two);
        assert_ne!(two, 0);
    }
}
