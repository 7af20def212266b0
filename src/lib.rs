//! `engine_core`: bitboard board representation, legal move generation,
//! make/undo, Zobrist hashing, positional evaluation, and alpha-beta search
//! with a transposition table and iterative deepening.
//!
//! This crate is the deterministic core of a chess engine. The HTTP
//! service, relational persistence, third-party platform client, CLI
//! wrapper, and scripting-host packaging that would normally sit around it
//! are out of scope here; a host embeds this crate and drives it entirely
//! through [`engine::Engine`].

pub mod bitboard;
pub mod engine;
pub mod error;
pub mod hash;
#[cfg(feature = "diagnostics")]
pub mod logger;
pub mod moves;
pub mod position;
pub mod search;
pub mod square;
pub mod status;
