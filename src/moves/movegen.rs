//! Pseudo-legal move generation, one function per piece family, assembled
//! in the contract order: pawn pushes, pawn captures, knight, bishop, rook,
//! queen, king, castling. Within a family, moves are emitted by origin
//! square ascending then destination square ascending; promotions expand in
//! {Q, R, B, N} order.

use super::attacks::is_legal_castling;
use super::rays::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use super::types::{Move, MoveBuffer, MoveKind};
use crate::bitboard::BitboardExt;
use crate::position::{Color, Piece, Position};
use crate::square::Square;

const RANK2: u64 = 0x0000_0000_0000_FF00;
const RANK7: u64 = 0x00FF_0000_0000_0000;
const RANK8: u64 = 0xFF00_0000_0000_0000;
const RANK1: u64 = 0x0000_0000_0000_00FF;

const WHITE_KINGSIDE_BETWEEN: u64 = 0x0000_0000_0000_0060;
const WHITE_QUEENSIDE_BETWEEN: u64 = 0x0000_0000_0000_000E;
const BLACK_KINGSIDE_BETWEEN: u64 = 0x6000_0000_0000_0000;
const BLACK_QUEENSIDE_BETWEEN: u64 = 0x0E00_0000_0000_0000;

const PROMOS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

#[inline(always)]
fn kingside_between(color: Color) -> u64 {
    match color {
        Color::White => WHITE_KINGSIDE_BETWEEN,
        Color::Black => BLACK_KINGSIDE_BETWEEN,
    }
}

#[inline(always)]
fn queenside_between(color: Color) -> u64 {
    match color {
        Color::White => WHITE_QUEENSIDE_BETWEEN,
        Color::Black => BLACK_QUEENSIDE_BETWEEN,
    }
}

/// Emits moves for targets of a non-pawn piece standing on `from`, in
/// destination-ascending order (guaranteed by `pop_lsb` walking the
/// bitboard low bit to high bit).
#[inline(always)]
fn push_piece_moves(
    from: u8,
    mut targets: u64,
    enemy: u64,
    piece: Piece,
    move_list: &mut impl MoveBuffer,
) {
    while targets != 0 {
        let to = targets.pop_lsb();
        let is_capture = (enemy >> to) & 1 != 0;
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece,
            kind: if is_capture {
                MoveKind::Capture
            } else {
                MoveKind::Quiet
            },
            promotion: None,
        });
    }
}

pub fn generate_knight_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let friendly = pos.occupancy(color);
    let enemy_king = pos.pieces(Piece::King, color.opposite());
    let enemy = pos.opponent_occupancy(color) & !enemy_king;

    let mut bb = pos.pieces(Piece::Knight, color);
    while bb != 0 {
        let from = bb.pop_lsb();
        let targets = knight_attacks(from) & !friendly & !enemy_king;
        push_piece_moves(from, targets, enemy, Piece::Knight, move_list);
    }
}

pub fn generate_bishop_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let friendly = pos.occupancy(color);
    let enemy_king = pos.pieces(Piece::King, color.opposite());
    let enemy = pos.opponent_occupancy(color) & !enemy_king;
    let blockers = pos.occupied();

    let mut bb = pos.pieces(Piece::Bishop, color);
    while bb != 0 {
        let from = bb.pop_lsb();
        let targets = bishop_attacks(from, blockers) & !friendly & !enemy_king;
        push_piece_moves(from, targets, enemy, Piece::Bishop, move_list);
    }
}

pub fn generate_rook_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let friendly = pos.occupancy(color);
    let enemy_king = pos.pieces(Piece::King, color.opposite());
    let enemy = pos.opponent_occupancy(color) & !enemy_king;
    let blockers = pos.occupied();

    let mut bb = pos.pieces(Piece::Rook, color);
    while bb != 0 {
        let from = bb.pop_lsb();
        let targets = rook_attacks(from, blockers) & !friendly & !enemy_king;
        push_piece_moves(from, targets, enemy, Piece::Rook, move_list);
    }
}

pub fn generate_queen_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let friendly = pos.occupancy(color);
    let enemy_king = pos.pieces(Piece::King, color.opposite());
    let enemy = pos.opponent_occupancy(color) & !enemy_king;
    let blockers = pos.occupied();

    let mut bb = pos.pieces(Piece::Queen, color);
    while bb != 0 {
        let from = bb.pop_lsb();
        let attacks = bishop_attacks(from, blockers) | rook_attacks(from, blockers);
        let targets = attacks & !friendly & !enemy_king;
        push_piece_moves(from, targets, enemy, Piece::Queen, move_list);
    }
}

pub fn generate_king_moves(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let king_bb = pos.pieces(Piece::King, color);
    if king_bb == 0 {
        return;
    }
    let from = king_bb.trailing_zeros() as u8;
    let friendly = pos.occupancy(color);
    let enemy_king = pos.pieces(Piece::King, color.opposite());
    let enemy = pos.opponent_occupancy(color) & !enemy_king;

    let targets = king_attacks(from) & !friendly & !enemy_king;
    push_piece_moves(from, targets, enemy, Piece::King, move_list);

    let occ = pos.occupied();

    // Queenside before kingside: both share the king's home square as
    // origin, and the queenside rook file (c) sits below the kingside
    // rook file (g), so destination-ascending puts O-O-O first.
    if pos.has_queenside_castle(color) && (occ & queenside_between(color)) == 0 {
        let mv = Move {
            from: Square::from_index(from),
            to: Square::from_index(from - 2),
            piece: Piece::King,
            kind: MoveKind::CastleQueenside,
            promotion: None,
        };
        if is_legal_castling(pos, mv) {
            move_list.push(mv);
        }
    }

    if pos.has_kingside_castle(color) && (occ & kingside_between(color)) == 0 {
        let mv = Move {
            from: Square::from_index(from),
            to: Square::from_index(from + 2),
            piece: Piece::King,
            kind: MoveKind::CastleKingside,
            promotion: None,
        };
        if is_legal_castling(pos, mv) {
            move_list.push(mv);
        }
    }
}

/// Non-capturing pawn moves: single pushes, double pushes, and push
/// promotions, sorted by (origin, destination) since a family's emission
/// order is origin-ascending-then-destination-ascending even when, for
/// Black, a double push's destination sorts below its single push.
pub fn generate_pawn_pushes(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let pawns = pos.pieces(Piece::Pawn, color);
    let empty = !pos.occupied();

    let (start_rank, promo_rank) = match color {
        Color::White => (RANK7, RANK8),
        Color::Black => (RANK2, RANK1),
    };

    let mut entries: Vec<(u8, u8, Option<Piece>)> = Vec::with_capacity(16);

    let single_pushes = match color {
        Color::White => ((pawns << 8) & empty) & !promo_rank,
        Color::Black => ((pawns >> 8) & empty) & !promo_rank,
    };
    let mut bb = single_pushes;
    while bb != 0 {
        let to = bb.pop_lsb();
        let from = if color == Color::White { to - 8 } else { to + 8 };
        entries.push((from, to, None));
    }

    let double_pushes = match color {
        Color::White => (((pawns & RANK2) << 8) & empty) << 8 & empty,
        Color::Black => (((pawns & RANK7) >> 8) & empty) >> 8 & empty,
    };
    let mut bb = double_pushes;
    while bb != 0 {
        let to = bb.pop_lsb();
        let from = if color == Color::White {
            to - 16
        } else {
            to + 16
        };
        entries.push((from, to, None));
    }

    let promo_pushes = match color {
        Color::White => (pawns & start_rank) << 8 & empty,
        Color::Black => (pawns & start_rank) >> 8 & empty,
    };
    let mut bb = promo_pushes;
    while bb != 0 {
        let to = bb.pop_lsb();
        let from = if color == Color::White { to - 8 } else { to + 8 };
        for &promo in PROMOS.iter() {
            entries.push((from, to, Some(promo)));
        }
    }

    entries.sort_by_key(|&(from, to, _)| (from, to));

    for (from, to, promo) in entries {
        let double_push = from.abs_diff(to) == 16;
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            kind: match (promo, double_push) {
                (Some(_), _) => MoveKind::Promotion,
                (None, true) => MoveKind::DoublePawnPush,
                (None, false) => MoveKind::Quiet,
            },
            promotion: promo,
        });
    }
}

/// Capturing pawn moves: plain captures, promotion captures, and en
/// passant, sorted by (origin, destination).
pub fn generate_pawn_captures(pos: &Position, move_list: &mut impl MoveBuffer) {
    let color = pos.side_to_move;
    let pawns = pos.pieces(Piece::Pawn, color);
    let enemy_without_king =
        pos.opponent_occupancy(color) & !pos.pieces(Piece::King, color.opposite());

    let (start_rank, promo_rank) = match color {
        Color::White => (RANK7, RANK8),
        Color::Black => (RANK2, RANK1),
    };

    #[derive(Clone, Copy)]
    enum Kind {
        Plain,
        Promo(Piece),
        EnPassant,
    }

    let mut entries: Vec<(u8, u8, Kind)> = Vec::with_capacity(16);

    let mut attackers = pawns & !start_rank;
    while attackers != 0 {
        let from = attackers.pop_lsb();
        let mut targets = pawn_attacks(from, color) & enemy_without_king & !promo_rank;
        while targets != 0 {
            let to = targets.pop_lsb();
            entries.push((from, to, Kind::Plain));
        }
    }

    let mut promo_attackers = pawns & start_rank;
    while promo_attackers != 0 {
        let from = promo_attackers.pop_lsb();
        let mut targets = pawn_attacks(from, color) & enemy_without_king & promo_rank;
        while targets != 0 {
            let to = targets.pop_lsb();
            for &promo in PROMOS.iter() {
                entries.push((from, to, Kind::Promo(promo)));
            }
        }
    }

    if let Some(ep_sq) = pos.ep_square {
        let ep = ep_sq.index();
        let cap_sq = if color == Color::White { ep - 8 } else { ep + 8 };
        let enemy_pawns = pos.pieces(Piece::Pawn, color.opposite());
        if enemy_pawns & (1u64 << cap_sq) != 0 {
            let mut atk = pawns;
            while atk != 0 {
                let from = atk.pop_lsb();
                if pawn_attacks(from, color) & (1u64 << ep) != 0 {
                    entries.push((from, ep, Kind::EnPassant));
                }
            }
        }
    }

    entries.sort_by_key(|&(from, to, _)| (from, to));

    for (from, to, kind) in entries {
        let (move_kind, promotion) = match kind {
            Kind::Plain => (MoveKind::Capture, None),
            Kind::Promo(p) => (MoveKind::PromotionCapture, Some(p)),
            Kind::EnPassant => (MoveKind::EnPassant, None),
        };
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            kind: move_kind,
            promotion,
        });
    }
}

/// All pseudo-legal moves for the side to move, in the contract order.
pub fn generate_pseudo_legal(pos: &Position, moves: &mut impl MoveBuffer) {
    moves.clear();
    generate_pawn_pushes(pos, moves);
    generate_pawn_captures(pos, moves);
    generate_knight_moves(pos, moves);
    generate_bishop_moves(pos, moves);
    generate_rook_moves(pos, moves);
    generate_queen_moves(pos, moves);
    generate_king_moves(pos, moves);
}

/// Pseudo-legal moves filtered to legal ones: a move is legal iff it does
/// not leave the mover's own king in check. Castling is already screened
/// for check-through-the-path during generation, so it is accepted here
/// without a second make/unmake probe.
pub fn generate_legal(
    pos: &mut Position,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    generate_pseudo_legal(pos, scratch);
    moves.clear();

    for mv in scratch.iter().copied() {
        if mv.is_castling() {
            moves.push(mv);
            continue;
        }
        let mover = pos.side_to_move;
        let undo = pos.raw_make(mv);
        let illegal = super::attacks::in_check(pos, mover);
        pos.raw_unmake(undo);
        if !illegal {
            moves.push(mv);
        }
    }
}

/// Whether a single pseudo-legal move is legal, without generating the
/// full move list.
pub fn is_legal_move(pos: &mut Position, mv: Move) -> bool {
    if mv.is_castling() {
        return true;
    }
    let mover = pos.side_to_move;
    let undo = pos.raw_make(mv);
    let illegal = super::attacks::in_check(pos, mover);
    pos.raw_unmake(undo);
    !illegal
}

/// Legal captures and promotions only, for quiescence search.
pub fn generate_captures(
    pos: &mut Position,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    generate_pseudo_legal(pos, scratch);
    moves.clear();

    for mv in scratch.iter().copied() {
        if !mv.is_capture() && !mv.is_promotion() {
            continue;
        }
        let mover = pos.side_to_move;
        let undo = pos.raw_make(mv);
        let illegal = super::attacks::in_check(pos, mover);
        pos.raw_unmake(undo);
        if !illegal {
            moves.push(mv);
        }
    }
}
