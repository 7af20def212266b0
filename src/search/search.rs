//! Negamax search with alpha-beta pruning, transposition-table caching,
//! MVV-LVA move ordering, a capture-only quiescence extension, and an
//! iterative deepening driver.

use super::eval::evaluate_relative;
use super::ordering::order_moves;
use super::tt::{NodeType, TranspositionTable};
use crate::moves::attacks::in_check;
use crate::moves::movegen::{generate_captures, generate_legal};
use crate::moves::types::Move;
use crate::position::Position;
use std::time::{Duration, Instant};

/// Above any real evaluation or mate score; the alpha-beta window starts
/// at ±`INF`.
pub const INF: i32 = 1_000_000;
/// A mate in `n` plies scores `MATE_SCORE - n`, so shorter mates are
/// preferred; stalemate scores exactly `0`.
pub const MATE_SCORE: i32 = 100_000;
/// Scores at or beyond this magnitude are mate scores, not material/
/// positional evaluation — evaluation never produces scores this large.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;
/// Hard cap on quiescence recursion so a position with unresolved
/// captures at every ply still terminates.
const MAX_QUIESCENCE_PLY: u32 = 4;

/// Mate scores are stored in the TT relative to the node they were found
/// at, not the search root, so a stored entry is reusable from a different
/// ply. `score_to_tt`/`score_from_tt` convert between the two.
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Wall-clock budget consulted periodically during search. `None` means
/// "search to completion with no deadline."
pub struct TimeManager {
    start: Instant,
    limit: Option<Duration>,
    pub stopped: bool,
}

impl TimeManager {
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
            stopped: false,
        }
    }

    #[inline]
    pub fn check(&mut self) {
        if self.stopped {
            return;
        }
        if let Some(limit) = self.limit
            && self.start.elapsed() >= limit
        {
            self.stopped = true;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn allocated(&self) -> Option<Duration> {
        self.limit
    }
}

/// Observability snapshot for the façade's `last_search_info()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchInfo {
    pub nodes: u64,
    pub tt_hits: u64,
    pub depth: u32,
    pub time_ms: u64,
}

/// Captures-only search extending past the nominal leaf to let the static
/// evaluation settle on a "quiet" position, mitigating the horizon effect.
/// `stand_pat` — the option of making no move — is both the initial lower
/// bound and the value returned once `ply` hits the recursion cap.
pub fn quiescence(pos: &mut Position, ply: u32, mut alpha: i32, beta: i32, nodes: &mut u64) -> i32 {
    *nodes += 1;
    let stand_pat = evaluate_relative(pos);

    if ply >= MAX_QUIESCENCE_PLY {
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut captures: Vec<Move> = Vec::new();
    let mut scratch: Vec<Move> = Vec::new();
    generate_captures(pos, &mut captures, &mut scratch);
    order_moves(&mut captures, pos, None);

    for mv in captures {
        if matches!(pos.piece_at(mv.to), Some((_, crate::position::Piece::King))) {
            continue;
        }

        let undo = pos.raw_make(mv);
        let score = -quiescence(pos, ply + 1, -beta, -alpha, nodes);
        pos.raw_unmake(undo);

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Negamax with alpha-beta pruning and transposition-table caching.
/// `ply` is the distance from the search root; it both adjusts mate
/// scores read from and written to the TT and lets deeper mates score
/// lower than shallower ones. A position found in check at a nominal leaf
/// extends the search by one ply instead of dropping into quiescence,
/// since quiescence does not itself detect checkmate — without the
/// extension, a forced mate at the horizon would be scored as a material
/// swing instead of a mate score.
pub fn search(
    pos: &mut Position,
    tt: &mut TranspositionTable,
    depth: i32,
    ply: u32,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
    time: &mut TimeManager,
) -> (i32, Option<Move>) {
    if *nodes & 1023 == 0 {
        time.check();
    }
    if time.stopped {
        return (0, None);
    }
    *nodes += 1;

    let hash = pos.zobrist;
    let mut hash_move = None;
    if let Some((tt_move, raw_score, tt_depth, tt_bound)) =
        tt.probe(hash, depth.max(0) as u8, alpha, beta, ply as i32)
    {
        hash_move = tt_move;
        // A hard TT return at the root would leave the façade without a
        // best move to play, so the root only ever takes the move hint.
        if ply > 0 && tt_depth as i32 >= depth {
            let score = score_from_tt(raw_score, ply);
            match tt_bound {
                0 => return (score, tt_move),
                1 if score >= beta => return (score, tt_move),
                2 if score <= alpha => return (score, tt_move),
                _ => {}
            }
        }
    }

    let in_check_now = in_check(pos, pos.side_to_move);
    if depth <= 0 && !in_check_now {
        return (quiescence(pos, 0, alpha, beta, nodes), None);
    }

    let mut moves: Vec<Move> = Vec::new();
    let mut scratch: Vec<Move> = Vec::new();
    generate_legal(pos, &mut moves, &mut scratch);

    if moves.is_empty() {
        let score = if in_check_now {
            -(MATE_SCORE - ply as i32)
        } else {
            0
        };
        return (score, None);
    }

    order_moves(&mut moves, pos, hash_move);

    let original_alpha = alpha;
    let mut best_move = moves[0];
    let mut best_score = -INF;

    for mv in moves {
        let undo = pos.raw_make(mv);
        let (child_score, _) = search(pos, tt, depth - 1, ply + 1, -beta, -alpha, nodes, time);
        pos.raw_unmake(undo);

        if time.stopped {
            return (0, None);
        }

        let score = -child_score;
        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        NodeType::UpperBound
    } else if alpha >= beta {
        NodeType::LowerBound
    } else {
        NodeType::Exact
    };

    tt.save(
        hash,
        Some(best_move),
        score_to_tt(best_score, ply),
        depth.max(0) as u8,
        bound as u8,
        ply as i32,
    );

    (best_score, Some(best_move))
}

/// Iterative deepening: searches depths `1..=max_depth` in turn, keeping
/// the deepest *completed* iteration's best move and priming the next
/// depth's move ordering with it via the transposition table. On deadline
/// expiry mid-iteration, that iteration's partial result is discarded and
/// the last completed depth's move is returned; if depth 1 never
/// completes, the root's first legal move is returned (never absent when
/// legal moves exist).
pub fn search_best(
    pos: &mut Position,
    tt: &mut TranspositionTable,
    max_depth: i32,
    time_limit: Option<Duration>,
) -> (i32, Option<Move>, SearchInfo) {
    let mut time = TimeManager::new(time_limit);
    let mut nodes = 0u64;
    let mut completed_depth = 0u32;

    let mut root_moves: Vec<Move> = Vec::new();
    let mut scratch: Vec<Move> = Vec::new();
    generate_legal(pos, &mut root_moves, &mut scratch);
    let mut best_move = root_moves.first().copied();
    let mut best_score = 0;

    for depth in 1..=max_depth.max(1) {
        let (score, mv) = search(pos, tt, depth, 0, -INF, INF, &mut nodes, &mut time);

        if time.stopped {
            break;
        }

        best_score = score;
        if mv.is_some() {
            best_move = mv;
        }
        completed_depth = depth as u32;

        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    let info = SearchInfo {
        nodes,
        tt_hits: 0,
        depth: completed_depth,
        time_ms: time.elapsed().as_millis() as u64,
    };

    (best_score, best_move, info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn depth_zero_quiescence_matches_static_eval_in_quiet_position() {
        let mut pos = Position::start();
        let mut nodes = 0;
        let score = quiescence(&mut pos, 0, -INF, INF, &mut nodes);
        assert_eq!(score, evaluate_relative(&pos));
    }

    #[test]
    fn search_leaves_position_unchanged() {
        let mut pos = Position::start();
        let before = pos.clone();
        let mut tt = TranspositionTable::new(1);
        let mut nodes = 0;
        let mut time = TimeManager::new(None);
        search(&mut pos, &mut tt, 3, 0, -INF, INF, &mut nodes, &mut time);
        assert_eq!(pos, before);
    }

    #[test]
    fn search_best_returns_a_legal_move() {
        let mut pos = Position::start();
        let mut tt = TranspositionTable::new(1);
        let (_, mv, info) = search_best(&mut pos, &mut tt, 3, None);
        assert!(mv.is_some());
        assert!(info.depth >= 1);

        let mut legal = Vec::new();
        let mut scratch = Vec::new();
        generate_legal(&mut pos, &mut legal, &mut scratch);
        assert!(legal.contains(&mv.unwrap()));
    }

    #[test]
    fn mate_in_one_scores_at_least_mate_minus_one_at_depth_one() {
        // Back-rank mate: Re8# is mate in one for White.
        let mut pos: Position = "6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1".parse().unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut nodes = 0;
        let mut time = TimeManager::new(None);
        let (score, mv) = search(&mut pos, &mut tt, 1, 0, -INF, INF, &mut nodes, &mut time);
        assert!(score >= MATE_SCORE - 1);
        assert_eq!(mv.map(|m| m.coord_string()), Some("e1e8".to_string()));
    }

    #[test]
    fn zero_window_result_never_lands_strictly_inside_the_window() {
        let mut pos: Position = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut nodes = 0;
        let mut time = TimeManager::new(None);
        let alpha = 0;
        let (score, _) = search(
            &mut pos,
            &mut tt,
            2,
            0,
            alpha,
            alpha + 1,
            &mut nodes,
            &mut time,
        );
        assert!(score <= alpha || score >= alpha + 1);
    }
}
