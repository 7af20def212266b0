//! FEN parsing and serialization: the six space-separated fields of
//! Forsyth-Edwards notation, and the standard starting position constant.

use super::castling::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{Color, Piece, Position};
use crate::error::ParseError;
use crate::square::Square;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Replace `self` with the position encoded by `text`. On failure the
    /// prior position is left unchanged.
    pub fn set_fen(&mut self, text: &str) -> Result<(), ParseError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ParseError::FenSyntax(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut next = Position::empty();
        parse_placement(&mut next, fields[0])?;
        next.side_to_move = parse_side_to_move(fields[1])?;
        next.castling_rights = parse_castling(fields[2])?;
        next.ep_square = parse_en_passant(fields[3])?;
        next.halfmove_clock = parse_clock(fields[4], "halfmove clock")?;
        next.fullmove_number = parse_clock(fields[5], "fullmove number")?;
        next.refresh_zobrist();
        next.history.clear();
        next.repetition_keys.clear();

        *self = next;
        Ok(())
    }

    /// Render the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(64);

        for rank in (0..8).rev() {
            let mut empty_run = 0u32;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let idx = (color as usize) * 6 + (piece as usize);
                        out.push(PC_TO_CHAR[idx]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
            if rank != 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                out.push('K');
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                out.push('Q');
            }
            if self.castling_rights & CASTLE_BK != 0 {
                out.push('k');
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                out.push('q');
            }
        }

        out.push(' ');
        match self.ep_square {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push(' ');
        out.push_str(&self.halfmove_clock.to_string());
        out.push(' ');
        out.push_str(&self.fullmove_number.to_string());

        out
    }
}

fn parse_placement(pos: &mut Position, field: &str) -> Result<(), ParseError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::FenPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u8;
        for ch in rank_str.chars() {
            if let Some(digit) = ch.to_digit(10) {
                if digit == 0 || digit > 8 {
                    return Err(ParseError::FenPiecePlacement(format!(
                        "invalid empty-square run '{ch}'"
                    )));
                }
                file += digit as u8;
            } else {
                if !ch.is_ascii() {
                    return Err(ParseError::FenPiecePlacement(format!(
                        "non-ascii glyph '{ch}'"
                    )));
                }
                let (piece, color) = CHAR_TO_PC[ch as usize]
                    .ok_or_else(|| ParseError::FenPiecePlacement(format!("unknown glyph '{ch}'")))?;
                if file >= 8 {
                    return Err(ParseError::FenPiecePlacement(format!(
                        "rank {} has more than 8 squares",
                        rank + 1
                    )));
                }
                let sq = Square::from_file_rank(file, rank);
                let bb = pos.bb(color, piece) | sq.bit();
                pos.set_bb(color, piece, bb);
                file += 1;
            }
        }
        if file != 8 {
            return Err(ParseError::FenPiecePlacement(format!(
                "rank {} covers {file} squares, expected 8",
                rank + 1
            )));
        }
    }

    pos.validate()
        .map_err(|e| ParseError::FenPiecePlacement(e))?;
    Ok(())
}

fn parse_side_to_move(field: &str) -> Result<Color, ParseError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(ParseError::FenSideToMove(format!(
            "expected 'w' or 'b', got '{other}'"
        ))),
    }
}

fn parse_castling(field: &str) -> Result<u8, ParseError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for ch in field.chars() {
        rights |= match ch {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            other => {
                return Err(ParseError::FenCastling(format!(
                    "unknown castling glyph '{other}'"
                )));
            }
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, ParseError> {
    if field == "-" {
        return Ok(None);
    }
    field
        .parse::<Square>()
        .map(Some)
        .map_err(|e| ParseError::FenEnPassant(e.to_string()))
}

fn parse_clock(field: &str, name: &str) -> Result<u32, ParseError> {
    field
        .parse::<u32>()
        .map_err(|_| ParseError::FenClocks(format!("invalid {name} '{field}'")))
}
