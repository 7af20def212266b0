use engine_core::moves::perft::{perft, perft_divide_with_breakdown};
use engine_core::position::{Position, START_FEN};

const KIWI_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn run_startpos_depth(depth: u32, expected_nodes: u64) {
    let mut pos = Position::start();
    let nodes = perft(&mut pos, depth);
    assert_eq!(
        nodes, expected_nodes,
        "perft mismatch at depth {depth}: got {nodes}, expected {expected_nodes}"
    );
}

#[test]
fn perft_startpos_d1() {
    run_startpos_depth(1, 20);
}

#[test]
fn perft_startpos_d2() {
    run_startpos_depth(2, 400);
}

#[test]
fn perft_startpos_d3() {
    run_startpos_depth(3, 8_902);
}

#[test]
fn perft_startpos_d4() {
    run_startpos_depth(4, 197_281);
}

#[test]
#[ignore]
fn perft_startpos_d5() {
    run_startpos_depth(5, 4_865_609);
}

#[test]
fn perft_kiwipete_d1() {
    let mut pos: Position = KIWI_FEN.parse().unwrap();
    assert_eq!(perft(&mut pos, 1), 48);
}

#[test]
#[ignore]
fn perft_kiwipete_d2() {
    let mut pos: Position = KIWI_FEN.parse().unwrap();
    assert_eq!(perft(&mut pos, 2), 2_039);
}

#[test]
fn divide_startpos_d2_matches_total() {
    let mut pos: Position = START_FEN.parse().unwrap();
    let rows = perft_divide_with_breakdown(&mut pos, 2);
    let total: u64 = rows.iter().map(|(_, pc)| pc.nodes).sum();
    assert_eq!(total, 400);
}

#[test]
fn make_undo_fuzz_leaves_zobrist_coherent() {
    use engine_core::moves::movegen::generate_legal;

    fn splitmix64(x: &mut u64) -> u64 {
        *x = x.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = *x;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    let mut pos = Position::start();
    let mut seed = 42u64;

    for _ in 0..200 {
        assert_eq!(pos.zobrist, pos.compute_zobrist_full());

        let mut moves = Vec::new();
        let mut scratch = Vec::new();
        generate_legal(&mut pos, &mut moves, &mut scratch);
        if moves.is_empty() {
            break;
        }

        let mv = moves[(splitmix64(&mut seed) as usize) % moves.len()];
        pos.make(mv).unwrap();
        pos.unmake().unwrap();

        assert_eq!(pos.zobrist, pos.compute_zobrist_full());
    }
}
