//! Crate root module declarations for the chess positional core.
//!
//! This file exposes the board representation, attack tables, move
//! generation with make/unmake, the endgame knowledge base and the text
//! helpers (FEN, long algebraic) so binaries, benches and embedding engines
//! can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod attack_tables;
    pub mod geometry;
    pub mod magics;
    pub mod move_descriptions;
    pub mod sliding_rays;
    pub mod step_attacks;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod move_generator;
    pub mod perft;
}

pub mod endgame {
    pub mod endgame_registry;
    pub mod evaluators;
    pub mod material_key;
    pub mod scalers;
    pub mod values;
}

pub mod tables {
    pub mod endgame_tables;
    pub mod kpk_bitbase;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}

#[cfg(test)]
mod test_support;
