//! Library façade: owns one [`Position`], one [`TranspositionTable`], and
//! drives move application/undo, evaluation, and search through a single
//! entry point. A host (HTTP service, persistence layer, CLI) embeds this
//! crate entirely through `Engine` — nothing outside this module touches
//! `Position` fields directly.

use std::time::Duration;

use crate::error::EngineError;
use crate::moves::movegen::generate_legal;
use crate::moves::types::{Move, parse_square_pair};
use crate::position::Position;
use crate::search::eval::evaluate;
use crate::search::search::{SearchInfo, search_best};
use crate::search::tt::TranspositionTable;
use crate::status::{GameStatus, game_status};

/// Depth and/or time budget for `Engine::play_move`. At least one of the
/// two should be set; `depth` alone with no time limit searches to
/// completion at that depth.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub depth: i32,
    pub time_limit: Option<Duration>,
}

impl SearchSettings {
    pub fn depth(depth: i32) -> Self {
        Self {
            depth,
            time_limit: None,
        }
    }

    pub fn depth_and_time(depth: i32, time_limit: Duration) -> Self {
        Self {
            depth,
            time_limit: Some(time_limit),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Game outcome as reported by `Engine::result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Ongoing,
}

fn result_from_status(status: GameStatus) -> GameResult {
    match status {
        GameStatus::Active => GameResult::Ongoing,
        GameStatus::CheckmateWhite => GameResult::BlackWins,
        GameStatus::CheckmateBlack => GameResult::WhiteWins,
        GameStatus::Stalemate
        | GameStatus::DrawByFiftyMove
        | GameStatus::DrawByThreefold
        | GameStatus::DrawByInsufficientMaterial => GameResult::Draw,
    }
}

/// The engine core's single public entry point. Owns the position, its
/// undo history, and the transposition table; search reads the position
/// and consults/updates the table, the evaluator reads the position only.
pub struct Engine {
    position: Position,
    tt: TranspositionTable,
    last_search_info: SearchInfo,
}

impl Engine {
    /// A fresh engine at the start position, with a transposition table
    /// sized in megabytes.
    pub fn new(tt_size_mb: usize) -> Self {
        Self {
            position: Position::start(),
            tt: TranspositionTable::new(tt_size_mb.max(1)),
            last_search_info: SearchInfo::default(),
        }
    }

    /// Reset to the start position. The transposition table is left
    /// intact; stale entries are simply never hit against the new game.
    pub fn reset(&mut self) {
        self.position = Position::start();
    }

    /// Replace the position with the one encoded by `fen`. On a parse
    /// failure the prior position is left unchanged.
    pub fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.position.set_fen(fen)?;
        Ok(())
    }

    pub fn get_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Legal moves in the current position, in generator emission order.
    pub fn legal_moves(&self) -> Vec<String> {
        let mut pos = self.position.clone();
        let mut moves = Vec::new();
        let mut scratch = Vec::new();
        generate_legal(&mut pos, &mut moves, &mut scratch);
        moves.iter().map(Move::coord_string).collect()
    }

    fn find_legal_move(&mut self, from_text: &str) -> Result<Move, EngineError> {
        let (from, to, promotion) = parse_square_pair(from_text)?;
        let mut moves = Vec::new();
        let mut scratch = Vec::new();
        generate_legal(&mut self.position, &mut moves, &mut scratch);
        moves
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| EngineError::IllegalMove(from_text.to_string()))
    }

    /// Apply the move named by `text` (coordinate notation). Errors if the
    /// text is malformed or the move is not legal in the current position;
    /// the position is left unchanged on either failure.
    pub fn apply_move(&mut self, text: &str) -> Result<(), EngineError> {
        let mv = self.find_legal_move(text)?;
        self.position.make(mv)
    }

    /// Undo the most recently applied move. Errors if the undo stack is
    /// empty.
    pub fn undo_move(&mut self) -> Result<(), EngineError> {
        self.position.unmake()
    }

    /// Static evaluation in centipawns, White's perspective.
    pub fn evaluate(&self) -> i32 {
        evaluate(&self.position)
    }

    fn status(&self) -> GameStatus {
        game_status(&mut self.position.clone())
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    pub fn result(&self) -> GameResult {
        result_from_status(self.status())
    }

    /// Runs search under `settings`' budget and applies the chosen move,
    /// returning its coordinate text. Errors if the position has no legal
    /// moves (the game is already over).
    pub fn play_move(&mut self, settings: SearchSettings) -> Result<String, EngineError> {
        let (_, best_move, info) =
            search_best(&mut self.position, &mut self.tt, settings.depth, settings.time_limit);
        self.last_search_info = info;

        let mv = best_move.ok_or_else(|| {
            EngineError::IllegalPosition("no legal moves available to play".to_string())
        })?;
        self.position.make(mv)?;
        Ok(mv.coord_string())
    }

    /// Observability snapshot from the most recently completed
    /// `play_move` call.
    pub fn last_search_info(&self) -> SearchInfo {
        self.last_search_info
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_then_legal_moves_matches_start_position_ordering() {
        let mut engine = Engine::default();
        engine.reset();
        let moves = engine.legal_moves();
        assert_eq!(moves.len(), 20);
        assert_eq!(&moves[0..5], ["a2a3", "a2a4", "b2b3", "b2b4", "c2c3"]);
    }

    #[test]
    fn apply_move_updates_fen() {
        let mut engine = Engine::default();
        engine.reset();
        engine.apply_move("e2e4").unwrap();
        assert_eq!(
            engine.get_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn apply_and_undo_round_trips_to_start() {
        let mut engine = Engine::default();
        engine.reset();
        engine.apply_move("e2e4").unwrap();
        engine.apply_move("e7e5").unwrap();
        engine.apply_move("g1f3").unwrap();
        engine.undo_move().unwrap();
        engine.undo_move().unwrap();
        engine.undo_move().unwrap();
        assert_eq!(engine.get_fen(), crate::position::START_FEN);
    }

    #[test]
    fn a7_pawn_moves_in_kiwipete_style_position() {
        let mut engine = Engine::default();
        engine
            .set_position("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 2 3")
            .unwrap();
        let a7_moves: Vec<String> = engine
            .legal_moves()
            .into_iter()
            .filter(|m| m.starts_with("a7"))
            .collect();
        assert_eq!(a7_moves, vec!["a7a5".to_string(), "a7a6".to_string()]);
    }

    #[test]
    fn bare_kings_is_a_draw_by_insufficient_material() {
        let mut engine = Engine::default();
        engine.set_position("8/8/8/8/8/8/4K3/4k3 w - - 0 1").unwrap();
        assert!(engine.is_game_over());
        assert_eq!(engine.result(), GameResult::Draw);
    }

    #[test]
    fn fools_mate_ends_the_game_with_black_winning() {
        let mut engine = Engine::default();
        engine
            .set_position("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
            .unwrap();
        engine.apply_move("d8h4").unwrap();
        assert!(engine.is_game_over());
        assert_eq!(engine.result(), GameResult::BlackWins);
    }

    #[test]
    fn apply_move_rejects_illegal_move_and_leaves_position_unchanged() {
        let mut engine = Engine::default();
        engine.reset();
        let before = engine.get_fen();
        assert!(engine.apply_move("e2e5").is_err());
        assert_eq!(engine.get_fen(), before);
    }

    #[test]
    fn play_move_returns_a_legal_move_and_applies_it() {
        let mut engine = Engine::default();
        engine.reset();
        let legal_before = engine.legal_moves();
        let played = engine.play_move(SearchSettings::depth(2)).unwrap();
        assert!(legal_before.contains(&played));
        assert_eq!(engine.last_search_info().depth, 2);
    }
}
