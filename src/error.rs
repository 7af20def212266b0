//! Error taxonomy for the engine core: `InputSyntax`, `IllegalMove`,
//! `IllegalPosition`, `NoHistory`, `Internal`. All errors are surfaced at the
//! façade boundary as discriminated values; nothing in this crate panics or
//! aborts the process on a caller-triggered condition.

use thiserror::Error;

/// Failures parsing FEN text or coordinate move text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed FEN: {0}")]
    FenSyntax(String),
    #[error("malformed piece placement field: {0}")]
    FenPiecePlacement(String),
    #[error("malformed side-to-move field: {0}")]
    FenSideToMove(String),
    #[error("malformed castling rights field: {0}")]
    FenCastling(String),
    #[error("malformed en-passant field: {0}")]
    FenEnPassant(String),
    #[error("malformed halfmove/fullmove clock field: {0}")]
    FenClocks(String),
    #[error("malformed move text: {0}")]
    InvalidMoveSyntax(String),
}

/// Façade-level error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("input syntax error: {0}")]
    InputSyntax(#[from] ParseError),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("illegal position: {0}")]
    IllegalPosition(String),
    #[error("no history to undo")]
    NoHistory,
    #[error("internal invariant violated: {0}")]
    Internal(String),
}
