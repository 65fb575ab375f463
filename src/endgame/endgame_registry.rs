//! Registry from material signature to endgame knowledge.
//!
//! Patterns are registered by a short code such as `KBNK`: the letters before
//! the second `K` are the strong side, the rest the weak side. Each code is
//! stored twice, once with Light as the strong side and once with Dark, so a
//! lookup by `GameState::material_key` finds the entry regardless of colors.
//!
//! A few patterns are defined by material conditions rather than by exact
//! counts (a bare king against enough material, pawnless minor-piece endings,
//! bishop and pawns, queen against rook and pawns). `probe_evaluator` and
//! `probe_scalers` apply those after the signature lookup.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::endgame::evaluators::{evaluate, EvaluatorKind};
use crate::endgame::material_key::{material_key_for_counts, MAX_ORDINALS};
use crate::endgame::scalers::{scale, ScalerKind};
use crate::endgame::values::*;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::tables::kpk_bitbase::KpkBitbase;

const EVALUATOR_CODES: [(&str, EvaluatorKind); 9] = [
    ("KBNK", EvaluatorKind::Kbnk),
    ("KPK", EvaluatorKind::Kpk),
    ("KRKP", EvaluatorKind::Krkp),
    ("KRKB", EvaluatorKind::Krkb),
    ("KRKN", EvaluatorKind::Krkn),
    ("KQKP", EvaluatorKind::Kqkp),
    ("KQKR", EvaluatorKind::Kqkr),
    ("KBBKN", EvaluatorKind::Kbbkn),
    ("KNNK", EvaluatorKind::Knnk),
];

const SCALER_CODES: [(&str, ScalerKind); 7] = [
    ("KRPKR", ScalerKind::Krpkr),
    ("KRPPKRP", ScalerKind::Krppkrp),
    ("KBPKB", ScalerKind::Kbpkb),
    ("KBPPKB", ScalerKind::Kbppkb),
    ("KBPKN", ScalerKind::Kbpkn),
    ("KNPK", ScalerKind::Knpk),
    ("KNPKB", ScalerKind::Knpkb),
];

/// An evaluator bound to the color it favours.
#[derive(Debug, Clone, Copy)]
pub struct EndgameEvaluator<'a> {
    kind: EvaluatorKind,
    strong_side: Color,
    kpk: &'a KpkBitbase,
}

impl EndgameEvaluator<'_> {
    #[inline]
    pub fn kind(&self) -> EvaluatorKind {
        self.kind
    }

    #[inline]
    pub fn strong_side(&self) -> Color {
        self.strong_side
    }

    /// Score for the side to move.
    pub fn evaluate(&self, game_state: &GameState) -> Value {
        evaluate(self.kind, self.strong_side, game_state, self.kpk)
    }
}

/// A scaler bound to the color it favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndgameScaler {
    kind: ScalerKind,
    strong_side: Color,
}

impl EndgameScaler {
    #[inline]
    pub fn kind(&self) -> ScalerKind {
        self.kind
    }

    #[inline]
    pub fn strong_side(&self) -> Color {
        self.strong_side
    }

    /// Factor for the strong side's score, or `SCALE_FACTOR_NONE`.
    pub fn scale(&self, game_state: &GameState) -> ScaleFactor {
        scale(self.kind, self.strong_side, game_state)
    }
}

#[derive(Debug, Clone)]
pub struct EndgameRegistry {
    kpk: KpkBitbase,
    evaluators: HashMap<u64, (EvaluatorKind, Color)>,
    scalers: HashMap<u64, (ScalerKind, Color)>,
}

impl Default for EndgameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EndgameRegistry {
    /// Builds the KPK bitbase and registers every known pattern.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        for (code, kind) in EVALUATOR_CODES {
            registry
                .register_evaluator(code, kind)
                .expect("built-in endgame codes should always parse");
        }
        for (code, kind) in SCALER_CODES {
            registry
                .register_scaler(code, kind)
                .expect("built-in endgame codes should always parse");
        }

        info!(
            evaluators = registry.evaluators.len(),
            scalers = registry.scalers.len(),
            "endgame registry ready"
        );
        registry
    }

    /// A registry with the bitbase but no patterns.
    pub fn empty() -> Self {
        Self {
            kpk: KpkBitbase::build(),
            evaluators: HashMap::new(),
            scalers: HashMap::new(),
        }
    }

    #[inline]
    pub fn kpk(&self) -> &KpkBitbase {
        &self.kpk
    }

    /// Registers `kind` under `code` for both color assignments.
    pub fn register_evaluator(&mut self, code: &str, kind: EvaluatorKind) -> ChessResult<()> {
        for strong in Color::ALL {
            let key = code_to_key(code, strong)?;
            self.evaluators.insert(key, (kind, strong));
        }
        debug!(code, ?kind, "registered endgame evaluator");
        Ok(())
    }

    /// Registers `kind` under `code` for both color assignments.
    pub fn register_scaler(&mut self, code: &str, kind: ScalerKind) -> ChessResult<()> {
        for strong in Color::ALL {
            let key = code_to_key(code, strong)?;
            self.scalers.insert(key, (kind, strong));
        }
        debug!(code, ?kind, "registered endgame scaler");
        Ok(())
    }

    /// Evaluator registered for exactly this material signature.
    pub fn lookup_evaluator(&self, material_key: u64) -> Option<EndgameEvaluator<'_>> {
        self.evaluators
            .get(&material_key)
            .map(|&(kind, strong_side)| self.bind(kind, strong_side))
    }

    /// Scaler registered for exactly this material signature.
    pub fn lookup_scaler(&self, material_key: u64) -> Option<EndgameScaler> {
        self.scalers
            .get(&material_key)
            .map(|&(kind, strong_side)| EndgameScaler { kind, strong_side })
    }

    /// Signature lookup first, then the material-condition patterns.
    pub fn probe_evaluator(&self, game_state: &GameState) -> Option<EndgameEvaluator<'_>> {
        if let Some(evaluator) = self.lookup_evaluator(game_state.material_key()) {
            return Some(evaluator);
        }

        for strong in Color::ALL {
            if is_kxk(game_state, strong) {
                return Some(self.bind(EvaluatorKind::Kxk, strong));
            }
        }

        if is_kmmkm(game_state) {
            return Some(self.bind(EvaluatorKind::Kmmkm, Color::Light));
        }

        None
    }

    /// Scaler for each color, indexed by `Color::index` of the favoured side.
    pub fn probe_scalers(&self, game_state: &GameState) -> [Option<EndgameScaler>; 2] {
        let mut found = [None, None];

        if let Some(scaler) = self.lookup_scaler(game_state.material_key()) {
            found[scaler.strong_side.index()] = Some(scaler);
        }

        for strong in Color::ALL {
            if found[strong.index()].is_some() {
                continue;
            }
            let kind = if is_kbpsk(game_state, strong) {
                ScalerKind::Kbpsk
            } else if is_kqkrps(game_state, strong) {
                ScalerKind::Kqkrps
            } else {
                continue;
            };
            found[strong.index()] = Some(EndgameScaler {
                kind,
                strong_side: strong,
            });
        }

        found
    }

    #[inline]
    fn bind(&self, kind: EvaluatorKind, strong_side: Color) -> EndgameEvaluator<'_> {
        EndgameEvaluator {
            kind,
            strong_side,
            kpk: &self.kpk,
        }
    }
}

/// Material signature of `code` with `strong` owning the first half.
pub fn code_to_key(code: &str, strong: Color) -> ChessResult<u64> {
    let invalid = || ChessError::InvalidEndgameCode(code.to_owned());

    let weak_start = code
        .char_indices()
        .skip(1)
        .find(|&(_, ch)| ch == 'K')
        .map(|(idx, _)| idx)
        .ok_or_else(invalid)?;
    if !code.starts_with('K') {
        return Err(invalid());
    }

    let mut counts = [[0u8; 6]; 2];
    for (side, part) in [
        (strong, &code[1..weak_start]),
        (strong.opposite(), &code[weak_start + 1..]),
    ] {
        for ch in part.chars() {
            let kind = match PieceKind::from_fen_char(ch) {
                Some(kind) if ch.is_ascii_uppercase() && kind != PieceKind::King => kind,
                _ => return Err(invalid()),
            };
            let count = &mut counts[side.index()][kind.index()];
            *count += 1;
            if usize::from(*count) > MAX_ORDINALS {
                return Err(invalid());
            }
        }
    }

    Ok(material_key_for_counts(&counts))
}

/// Lone king against at least a rook's worth of pieces.
fn is_kxk(game_state: &GameState, strong: Color) -> bool {
    let weak = strong.opposite();
    game_state.occupancy(weak).count_ones() == 1
        && game_state.non_pawn_material(strong) >= ROOK_VALUE_MG
}

/// No pawns, rooks or queens, and at most two minor pieces per side.
fn is_kmmkm(game_state: &GameState) -> bool {
    let heavy_or_pawn = game_state.pieces_of_kind(PieceKind::Pawn)
        | game_state.pieces_of_kind(PieceKind::Rook)
        | game_state.pieces_of_kind(PieceKind::Queen);

    heavy_or_pawn == 0
        && Color::ALL.iter().all(|&color| {
            game_state.piece_count(color, PieceKind::Knight)
                + game_state.piece_count(color, PieceKind::Bishop)
                <= 2
        })
}

/// A single bishop plus pawns.
fn is_kbpsk(game_state: &GameState, strong: Color) -> bool {
    game_state.non_pawn_material(strong) == BISHOP_VALUE_MG
        && game_state.piece_count(strong, PieceKind::Bishop) == 1
        && game_state.piece_count(strong, PieceKind::Pawn) >= 1
}

/// Bare queen against a rook with pawns.
fn is_kqkrps(game_state: &GameState, strong: Color) -> bool {
    let weak = strong.opposite();
    game_state.non_pawn_material(strong) == QUEEN_VALUE_MG
        && game_state.piece_count(strong, PieceKind::Queen) == 1
        && game_state.piece_count(strong, PieceKind::Pawn) == 0
        && game_state.non_pawn_material(weak) == ROOK_VALUE_MG
        && game_state.piece_count(weak, PieceKind::Rook) == 1
        && game_state.piece_count(weak, PieceKind::Pawn) >= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{position, shared_registry};

    #[test]
    fn codes_map_to_both_color_assignments() {
        let light = code_to_key("KBNK", Color::Light).expect("valid code");
        let dark = code_to_key("KBNK", Color::Dark).expect("valid code");
        assert_ne!(light, dark);

        let game = position("8/8/8/4k3/8/8/8/1NB1K3 w - - 0 1");
        assert_eq!(game.material_key(), light);
        let mirrored = position("1nb1k3/8/8/8/4K3/8/8/8 b - - 0 1");
        assert_eq!(mirrored.material_key(), dark);
    }

    #[test]
    fn malformed_codes_are_rejected() {
        for code in ["", "K", "BK", "KBN", "KXK", "KkK", "KBKK", "KPPPPPPPPPPPPPPPPPK"] {
            assert!(
                matches!(
                    code_to_key(code, Color::Light),
                    Err(ChessError::InvalidEndgameCode(_))
                ),
                "{code}"
            );
        }
    }

    #[test]
    fn register_evaluator_propagates_bad_codes() {
        let mut registry = shared_registry().clone();
        assert!(registry
            .register_evaluator("QK", EvaluatorKind::Kqkr)
            .is_err());
    }

    #[test]
    fn kbnk_lookup_binds_the_strong_side() {
        let registry = shared_registry();
        let game = position("1nb1k3/8/8/8/4K3/8/8/8 w - - 0 1");
        let evaluator = registry
            .lookup_evaluator(game.material_key())
            .expect("KBNK is registered");
        assert_eq!(evaluator.kind(), EvaluatorKind::Kbnk);
        assert_eq!(evaluator.strong_side(), Color::Dark);
        assert!(evaluator.evaluate(&game) < -VALUE_KNOWN_WIN);
    }

    #[test]
    fn kpk_probe_through_registry() {
        let registry = shared_registry();

        let drawn = position("k7/8/8/8/8/8/P7/K7 w - - 0 1");
        let evaluator = registry.probe_evaluator(&drawn).expect("KPK is registered");
        assert_eq!(evaluator.kind(), EvaluatorKind::Kpk);
        assert_eq!(evaluator.evaluate(&drawn), VALUE_DRAW);

        let won = position("4k3/8/4K3/4P3/8/8/8/8 w - - 0 1");
        let evaluator = registry.probe_evaluator(&won).expect("KPK is registered");
        assert!(evaluator.evaluate(&won) > VALUE_KNOWN_WIN);
    }

    #[test]
    fn unregistered_material_misses() {
        let registry = shared_registry();
        let game = position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(registry.lookup_evaluator(game.material_key()).is_none());
        assert!(registry.lookup_scaler(game.material_key()).is_none());
        assert!(registry.probe_evaluator(&game).is_none());
        assert_eq!(registry.probe_scalers(&game), [None, None]);
    }

    #[test]
    fn generic_evaluators_follow_material() {
        let registry = shared_registry();

        let kxk = position("7k/8/8/8/8/8/8/R3K1R1 w - - 0 1");
        let evaluator = registry.probe_evaluator(&kxk).expect("lone king");
        assert_eq!(evaluator.kind(), EvaluatorKind::Kxk);
        assert_eq!(evaluator.strong_side(), Color::Light);

        let dark_kxk = position("q3k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let evaluator = registry.probe_evaluator(&dark_kxk).expect("lone king");
        assert_eq!(evaluator.kind(), EvaluatorKind::Kxk);
        assert_eq!(evaluator.strong_side(), Color::Dark);
        assert!(evaluator.evaluate(&dark_kxk) < -VALUE_KNOWN_WIN);

        let minors = position("4kb2/8/8/8/8/8/8/2B1KN2 w - - 0 1");
        let evaluator = registry.probe_evaluator(&minors).expect("minor pieces");
        assert_eq!(evaluator.kind(), EvaluatorKind::Kmmkm);
        assert_eq!(evaluator.evaluate(&minors), VALUE_DRAW);
    }

    #[test]
    fn scalers_by_signature_and_by_material() {
        let registry = shared_registry();

        let krpkr = position("3k4/8/r7/3P4/4K3/8/8/7R w - - 0 1");
        let scalers = registry.probe_scalers(&krpkr);
        let scaler = scalers[Color::Light.index()].expect("KRPKR is registered");
        assert_eq!(scaler.kind(), ScalerKind::Krpkr);
        assert_eq!(scaler.scale(&krpkr), SCALE_FACTOR_DRAW);
        assert!(scalers[Color::Dark.index()].is_none());

        let kbpsk = position("7k/8/8/8/7P/6P1/8/4KB2 w - - 0 1");
        let scalers = registry.probe_scalers(&kbpsk);
        assert_eq!(
            scalers[Color::Light.index()].map(|s| s.kind()),
            Some(ScalerKind::Kbpsk)
        );

        let kqkrps = position("8/8/8/3q4/3k4/2R5/3P4/3K4 w - - 0 1");
        let scalers = registry.probe_scalers(&kqkrps);
        let scaler = scalers[Color::Dark.index()].expect("queen against rook and pawn");
        assert_eq!(scaler.kind(), ScalerKind::Kqkrps);
        assert_eq!(scaler.scale(&kqkrps), SCALE_FACTOR_DRAW);
    }
}
