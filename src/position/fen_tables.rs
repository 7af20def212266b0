//! O(1) FEN glyph <-> (piece, color) lookup tables.

use super::{Color, Piece};

pub(super) const CHAR_TO_PC: [Option<(Piece, Color)>; 128] = {
    let mut table: [Option<(Piece, Color)>; 128] = [None; 128];

    table[b'P' as usize] = Some((Piece::Pawn, Color::White));
    table[b'N' as usize] = Some((Piece::Knight, Color::White));
    table[b'B' as usize] = Some((Piece::Bishop, Color::White));
    table[b'R' as usize] = Some((Piece::Rook, Color::White));
    table[b'Q' as usize] = Some((Piece::Queen, Color::White));
    table[b'K' as usize] = Some((Piece::King, Color::White));

    table[b'p' as usize] = Some((Piece::Pawn, Color::Black));
    table[b'n' as usize] = Some((Piece::Knight, Color::Black));
    table[b'b' as usize] = Some((Piece::Bishop, Color::Black));
    table[b'r' as usize] = Some((Piece::Rook, Color::Black));
    table[b'q' as usize] = Some((Piece::Queen, Color::Black));
    table[b'k' as usize] = Some((Piece::King, Color::Black));

    table
};

#[inline]
const fn pc_index(piece: Piece, color: Color) -> usize {
    (color as usize) * 6 + (piece as usize)
}

pub(super) const PC_TO_CHAR: [char; 12] = {
    let mut t = ['\0'; 12];
    t[pc_index(Piece::Pawn, Color::White)] = 'P';
    t[pc_index(Piece::Knight, Color::White)] = 'N';
    t[pc_index(Piece::Bishop, Color::White)] = 'B';
    t[pc_index(Piece::Rook, Color::White)] = 'R';
    t[pc_index(Piece::Queen, Color::White)] = 'Q';
    t[pc_index(Piece::King, Color::White)] = 'K';
    t[pc_index(Piece::Pawn, Color::Black)] = 'p';
    t[pc_index(Piece::Knight, Color::Black)] = 'n';
    t[pc_index(Piece::Bishop, Color::Black)] = 'b';
    t[pc_index(Piece::Rook, Color::Black)] = 'r';
    t[pc_index(Piece::Queen, Color::Black)] = 'q';
    t[pc_index(Piece::King, Color::Black)] = 'k';
    t
};
