//! Search wiring tests: depth-0 behavior, stalemate/checkmate handling, and
//! material-sanity checks across a range of middlegame positions.
use engine_core::position::Position;
use engine_core::search::eval::evaluate_relative;
use engine_core::search::search::{INF, TimeManager, search};
use engine_core::search::tt::TranspositionTable;

fn search_position(fen: &str, depth: i32) -> i32 {
    let mut pos: Position = fen.parse().unwrap();
    let mut tt = TranspositionTable::new(4);
    let mut nodes = 0;
    let mut time = TimeManager::new(None);
    let (score, _) = search(&mut pos, &mut tt, depth, 0, -INF, INF, &mut nodes, &mut time);
    score
}

#[test]
fn depth0_equals_static_eval_white_up_a_pawn() {
    let pos: Position = "k7/8/8/8/4P3/8/8/6K1 w - - 0 1".parse().unwrap();
    assert_eq!(search_position("k7/8/8/8/4P3/8/8/6K1 w - - 0 1", 0), evaluate_relative(&pos));
    assert!(search_position("k7/8/8/8/4P3/8/8/6K1 w - - 0 1", 0) >= 70);
}

#[test]
fn stalemate_returns_zero_at_any_depth() {
    for d in 1..=3 {
        let score = search_position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", d);
        assert_eq!(score, 0, "stalemate should return 0 at depth {d}");
    }
}

#[test]
fn depth1_prefers_a_free_pawn_capture() {
    let score = search_position("k7/8/8/3p4/4P3/8/8/6K1 w - - 0 1", 1);
    assert!(score >= 80, "got {score}");
}

#[test]
fn symmetric_material_evaluates_near_zero() {
    let score = search_position("7k/6pp/4N3/8/8/4n3/6PP/7K w - - 0 1", 4);
    assert!(score.abs() <= 50, "got {score}");
}

#[test]
fn avoids_losing_a_queen_to_a_knight_fork() {
    let score = search_position(
        "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 1",
        4,
    );
    assert!(score < 500, "got {score}");
}

#[test]
fn equal_trade_stays_roughly_balanced() {
    let score = search_position(
        "rnbqkb1r/pppp1ppp/8/4p3/4n3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 1",
        4,
    );
    assert!(score.abs() < 150, "got {score}");
}

#[test]
fn refuses_a_bad_queen_sacrifice() {
    let score = search_position(
        "r1bqkbnr/ppp2ppp/2n5/3pp3/3PP3/2N2Q2/PPP2PPP/R1B1KBNR w KQkq - 0 1",
        4,
    );
    assert!(score < 400, "got {score}");
}

#[test]
fn shallow_and_deep_search_agree_within_a_pawn_on_a_quiet_position() {
    let fen = "r2qr1k1/ppp2ppp/2n2n2/2bpp1B1/2P5/2N1PN2/PP2QPPP/2RR2K1 w - - 0 1";
    let shallow = search_position(fen, 2);
    let deep = search_position(fen, 4);
    assert!((shallow - deep).abs() < 200, "shallow={shallow} deep={deep}");
}

#[test]
fn quiet_start_position_evaluates_near_zero() {
    let score = search_position(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        3,
    );
    assert!(score.abs() < 100, "got {score}");
}

#[test]
fn recognizes_a_hanging_piece() {
    let score = search_position(
        "rnbqkb1r/pppp1ppp/8/8/4n3/2N5/PPPPPPPP/R1BQKBNR w KQkq - 0 1",
        3,
    );
    assert!(score > 250, "got {score}");
}

#[test]
fn terminates_promptly_on_a_tactically_busy_position() {
    use std::time::Instant;
    let start = Instant::now();
    let _ = search_position(
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/4P3/3P1N2/PPP2PPP/RNBQKB1R w KQkq - 0 1",
        4,
    );
    assert!(start.elapsed().as_secs() < 60);
}
