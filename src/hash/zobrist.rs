//! Zobrist key table and the incremental-hash helpers `Position` uses on
//! every `make`/`unmake`. The seed is fixed so hashes are reproducible
//! across runs and processes, which the perft and repetition tests rely on.

use crate::position::castling::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::position::{Color, Piece, Position};
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

const FILE_A: u64 = 0x0101_0101_0101_0101;
const FILE_H: u64 = 0x8080_8080_8080_8080;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

fn make_zobrist_rng() -> StdRng {
    StdRng::seed_from_u64(ZOBRIST_SEED)
}

pub struct ZobristKeys {
    /// [color][piece][square], White=0/Black=1, P,N,B,R,Q,K=0..5.
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// [0]=K, [1]=Q, [2]=k, [3]=q.
    pub castling: [u64; 4],
    /// a..h => 0..7.
    pub ep_file: [u64; 8],
}

#[inline]
pub fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old: u8, new_: u8) {
    let d = old ^ new_;
    if d & CASTLE_WK != 0 {
        *hash ^= keys.castling[0];
    }
    if d & CASTLE_WQ != 0 {
        *hash ^= keys.castling[1];
    }
    if d & CASTLE_BK != 0 {
        *hash ^= keys.castling[2];
    }
    if d & CASTLE_BQ != 0 {
        *hash ^= keys.castling[3];
    }
}

/// `Some(file)` if the en-passant square should contribute to the hash this
/// ply: only when the side to move has a pawn that could pseudo-legally
/// capture onto it. A present-but-uncapturable en-passant square hashes the
/// same as no en-passant square at all, avoiding spurious key splits between
/// positions that are otherwise identical.
pub fn ep_file_to_hash(pos: &Position) -> Option<u8> {
    let ep = pos.ep_square?;
    let s = ep.index();

    let r = s / 8;
    if !(r == 2 || r == 5) {
        return None;
    }

    let bb_s: u64 = 1u64 << s;

    let has_capturing_pawn = match pos.side_to_move {
        Color::White => {
            let src_ne = (bb_s >> 9) & !FILE_H;
            let src_nw = (bb_s >> 7) & !FILE_A;
            ((src_ne | src_nw) & pos.bb(Color::White, Piece::Pawn)) != 0
        }
        Color::Black => {
            let src_se = (bb_s << 7) & !FILE_A;
            let src_sw = (bb_s << 9) & !FILE_H;
            ((src_se | src_sw) & pos.bb(Color::Black, Piece::Pawn)) != 0
        }
    };

    if has_capturing_pawn { Some(s % 8) } else { None }
}

pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_zobrist_keys_with_rng(make_zobrist_rng()))
}

fn generate_zobrist_keys_with_rng(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };

    for c in 0..2 {
        for p in 0..6 {
            for sq in 0..64 {
                keys.piece[c][p][sq] = non_zero(&mut rng);
            }
        }
    }

    for k in keys.castling.iter_mut() {
        *k = non_zero(&mut rng);
    }
    for k in keys.ep_file.iter_mut() {
        *k = non_zero(&mut rng);
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}
