//! Errors used throughout the positional core.
//!
//! `ChessError` is the single error type of the crate. Recoverable failures
//! (a malformed FEN, a bad square or move token, an endgame code that does not
//! parse) come back as `Err`. Table construction failure is also an `Err` and
//! callers are expected to abort start-up on it.
//!
//! `ContractViolation` is never returned. Make/unmake run on every node of a
//! search tree and have no recoverable error path, so a broken precondition
//! panics with this variant's message instead.

use thiserror::Error;

/// Unified error type for the positional core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A board-description string could not be turned into a consistent position.
    ///
    /// `field` names the FEN field that failed (`board`, `side`, `castling`,
    /// `en_passant`, `halfmove`, `fullmove`, or `position` for cross-field checks).
    #[error("invalid FEN {field}: {detail}")]
    Load { field: &'static str, detail: String },

    /// An algebraic square token such as `e9` or `z1`.
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// A long-algebraic move token that is malformed or not playable here.
    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    /// A caller broke the make/unmake sequencing contract.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// No collision-free magic multiplier was found inside the trial budget.
    #[error("no magic found for {slider} on square {square} after {trials} trials")]
    NoMagicFound {
        slider: &'static str,
        square: u8,
        trials: u64,
    },

    /// An endgame pattern code such as `KBNK` that does not describe two sides.
    #[error("invalid endgame code: {0}")]
    InvalidEndgameCode(String),
}

/// Result alias for fallible core operations.
pub type ChessResult<T> = Result<T, ChessError>;

impl ChessError {
    #[inline]
    pub(crate) fn load(field: &'static str, detail: impl Into<String>) -> Self {
        ChessError::Load {
            field,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChessError;

    #[test]
    fn load_error_names_field_in_message() {
        let err = ChessError::load("side", "expected 'w' or 'b', got 'x'");
        assert_eq!(
            err.to_string(),
            "invalid FEN side: expected 'w' or 'b', got 'x'"
        );
    }

    #[test]
    fn magic_error_reports_square_and_budget() {
        let err = ChessError::NoMagicFound {
            slider: "rook",
            square: 0,
            trials: 10,
        };
        assert_eq!(
            err.to_string(),
            "no magic found for rook on square 0 after 10 trials"
        );
    }
}
