//! Shared fixtures for unit tests.
//!
//! Attack tables and the endgame registry are built once per test binary.

use std::sync::{Arc, OnceLock};

use crate::endgame::endgame_registry::EndgameRegistry;
use crate::game_state::game_state::GameState;
use crate::moves::attack_tables::AttackTables;
use crate::tables::kpk_bitbase::KpkBitbase;

static TABLES: OnceLock<Arc<AttackTables>> = OnceLock::new();
static REGISTRY: OnceLock<EndgameRegistry> = OnceLock::new();

pub fn shared_tables() -> &'static Arc<AttackTables> {
    TABLES.get_or_init(|| Arc::new(AttackTables::build().expect("attack tables should build")))
}

pub fn shared_registry() -> &'static EndgameRegistry {
    REGISTRY.get_or_init(EndgameRegistry::new)
}

pub fn shared_bitbase() -> &'static KpkBitbase {
    shared_registry().kpk()
}

pub fn position(fen: &str) -> GameState {
    GameState::from_fen(fen, shared_tables()).expect("test FEN should parse")
}
