//! Perft: exhaustive leaf-node counting used to validate move generation
//! against known node counts at fixed depths.

use super::movegen::generate_legal;
use super::types::Move;
use crate::moves::attacks::in_check;
use crate::position::Position;
use tracing::{debug, instrument};

const MAX_LOG_DEPTH: u32 = 3;
const MAX_PERFT_DEPTH: usize = 20;

pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounters {
    pub fn zero() -> Self {
        Self {
            nodes: 0,
            captures: 0,
            ep_captures: 0,
            castles: 0,
            promotions: 0,
            checks: 0,
            checkmates: 0,
        }
    }

    pub fn add(&mut self, other: &PerftCounters) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.ep_captures += other.ep_captures;
        self.castles += other.castles;
        self.promotions += other.promotions;
        self.checks += other.checks;
        self.checkmates += other.checkmates;
    }
}

fn create_move_buffer_array() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn create_pseudo_buffer_array() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(256))
}

fn perft_recursive(
    pos: &mut Position,
    depth: u32,
    ply: usize,
    move_buffers: &mut [Vec<Move>],
    pseudo_buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    {
        let (moves, pseudo) = (&mut move_buffers[ply], &mut pseudo_buffers[ply]);
        generate_legal(pos, moves, pseudo);
    }

    let move_count = move_buffers[ply].len();
    let mut node_count = 0;

    for i in 0..move_count {
        let mv = move_buffers[ply][i];
        let undo = pos.raw_make(mv);
        node_count += perft_recursive(pos, depth - 1, ply + 1, move_buffers, pseudo_buffers);
        pos.raw_unmake(undo);
    }

    node_count
}

#[instrument(skip(pos), fields(depth))]
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {depth} exceeds MAX_PERFT_DEPTH {MAX_PERFT_DEPTH}"
    );

    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();
    perft_recursive(pos, depth, 0, &mut move_buffers, &mut pseudo_buffers)
}

#[instrument(skip(pos), fields(depth))]
pub fn perft_divide(pos: &mut Position, depth: u32) -> u64 {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {depth} exceeds MAX_PERFT_DEPTH {MAX_PERFT_DEPTH}"
    );

    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();

    {
        let (moves, pseudo) = (&mut move_buffers[0], &mut pseudo_buffers[0]);
        generate_legal(pos, moves, pseudo);
        if depth <= MAX_LOG_DEPTH {
            debug!(depth, moves = moves.len(), "divide: root legal moves");
        }
    }

    let mut total = 0;
    let move_count = move_buffers[0].len();

    for i in 0..move_count {
        let mv = move_buffers[0][i];
        let undo = pos.raw_make(mv);

        let count = if depth == 1 {
            1
        } else {
            perft_recursive(pos, depth - 1, 1, &mut move_buffers, &mut pseudo_buffers)
        };

        pos.raw_unmake(undo);

        if depth <= MAX_LOG_DEPTH {
            debug!(%mv, nodes = count, "divide: root child total");
        }
        total += count;
    }

    debug!(depth, total, "divide: total");
    total
}

fn perft_count_recursive(
    pos: &mut Position,
    depth: u32,
    ply: usize,
    out: &mut PerftCounters,
    move_buffers: &mut [Vec<Move>],
    pseudo_buffers: &mut [Vec<Move>],
) {
    if depth == 0 {
        out.nodes += 1;

        let side_in_check = in_check(pos, pos.side_to_move);
        if side_in_check {
            out.checks += 1;
        }

        {
            let (moves, pseudo) = (&mut move_buffers[ply], &mut pseudo_buffers[ply]);
            generate_legal(pos, moves, pseudo);
        }

        if move_buffers[ply].is_empty() && side_in_check {
            out.checkmates += 1;
        }
        return;
    }

    {
        let (moves, pseudo) = (&mut move_buffers[ply], &mut pseudo_buffers[ply]);
        generate_legal(pos, moves, pseudo);
    }

    let move_count = move_buffers[ply].len();
    for i in 0..move_count {
        let mv = move_buffers[ply][i];

        if mv.is_capture() {
            out.captures += 1;
            if mv.is_en_passant() {
                out.ep_captures += 1;
            }
        }
        if mv.is_castling() {
            out.castles += 1;
        }
        if mv.promotion.is_some() {
            out.promotions += 1;
        }

        let undo = pos.raw_make(mv);
        perft_count_recursive(pos, depth - 1, ply + 1, out, move_buffers, pseudo_buffers);
        pos.raw_unmake(undo);

        #[cfg(debug_assertions)]
        pos.assert_hash();
    }
}

pub fn perft_count_with_breakdown(pos: &mut Position, depth: u32, out: &mut PerftCounters) {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {depth} exceeds MAX_PERFT_DEPTH {MAX_PERFT_DEPTH}"
    );

    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();
    perft_count_recursive(pos, depth, 0, out, &mut move_buffers, &mut pseudo_buffers);
}

pub fn perft_divide_with_breakdown(pos: &mut Position, depth: u32) -> Vec<(Move, PerftCounters)> {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {depth} exceeds MAX_PERFT_DEPTH {MAX_PERFT_DEPTH}"
    );

    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();

    {
        let (moves, pseudo) = (&mut move_buffers[0], &mut pseudo_buffers[0]);
        generate_legal(pos, moves, pseudo);
    }

    let move_count = move_buffers[0].len();
    let mut out = Vec::with_capacity(move_count);

    for i in 0..move_count {
        let mv = move_buffers[0][i];
        let undo = pos.raw_make(mv);
        let mut pc = PerftCounters::zero();

        if depth > 1 {
            perft_count_recursive(pos, depth - 1, 1, &mut pc, &mut move_buffers, &mut pseudo_buffers);
        } else {
            pc.nodes = 1;
        }

        pos.raw_unmake(undo);
        out.push((mv, pc));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_start_position_depths_one_to_three() {
        let mut pos = Position::start();
        assert_eq!(perft(&mut pos, 1), 20);
        assert_eq!(perft(&mut pos, 2), 400);
        assert_eq!(perft(&mut pos, 3), 8902);
    }

    #[test]
    fn perft_start_position_depth_four() {
        let mut pos = Position::start();
        assert_eq!(perft(&mut pos, 4), 197_281);
    }

    #[test]
    fn perft_kiwipete_depth_one() {
        let mut pos: Position =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
                .parse()
                .unwrap();
        assert_eq!(perft(&mut pos, 1), 48);
    }

    #[test]
    fn perft_leaves_position_unchanged() {
        let mut pos = Position::start();
        let before = pos.clone();
        perft(&mut pos, 3);
        assert_eq!(pos, before);
    }
}
