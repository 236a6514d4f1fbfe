//! FEN import and export.
//!
//! This is the interop layer for talking to an external UCI engine, not
//! part of the rules themselves. Castling availability is stored on the
//! board as `has_moved` flags on kings and rooks, so the castling field maps
//! onto those flags. The en passant field is validated and then discarded,
//! since the rules have no en passant.

use crate::engine::board::Board;
use crate::engine::types::{ChessError, Piece, PieceKind, Side, Square};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling letter, the side it belongs to, and the rook's file.
const CASTLING_LETTERS: [(char, Side, u8); 4] = [
    ('K', Side::White, 7),
    ('Q', Side::White, 0),
    ('k', Side::Black, 7),
    ('q', Side::Black, 0),
];

const KING_FILE: u8 = 4;

/// Everything a FEN string carries that the rules engine keeps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenPosition {
    pub board: Board,
    pub side_to_move: Side,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a FEN string.
///
/// Validates all 6 fields and ensures exactly one king per side.
pub fn parse(fen: &str) -> Result<FenPosition, ChessError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ChessError::InvalidFen(format!(
            "expected 6 fields, got {}",
            fields.len()
        )));
    }

    // ----- Field 1: Piece placement -----
    let mut board = parse_placement(fields[0])?;

    for side in [Side::White, Side::Black] {
        let kings = board.king_count(side);
        if kings != 1 {
            return Err(ChessError::InvalidFen(format!(
                "{side} has {kings} kings (expected 1)"
            )));
        }
    }

    // ----- Field 2: Side to move -----
    let side_to_move = match fields[1] {
        "w" => Side::White,
        "b" => Side::Black,
        other => {
            return Err(ChessError::InvalidFen(format!(
                "invalid side to move: '{other}'"
            )));
        }
    };

    // ----- Field 3: Castling availability -----
    apply_castling_field(&mut board, fields[2])?;

    // ----- Field 4: En passant target square -----
    if fields[3] != "-" {
        let ep = Square::from_algebraic(fields[3]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
        })?;
        if ep.rank() != 2 && ep.rank() != 5 {
            return Err(ChessError::InvalidFen(format!(
                "en passant square {ep} is not on rank 3 or 6"
            )));
        }
        tracing::debug!(square = %ep, "ignoring en passant target");
    }

    // ----- Field 5: Halfmove clock -----
    let halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
        ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
    })?;

    // ----- Field 6: Fullmove number -----
    let fullmove_number = fields[5].parse::<u16>().map_err(|_| {
        ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
    })?;
    if fullmove_number == 0 {
        return Err(ChessError::InvalidFen(
            "fullmove number must be >= 1".to_string(),
        ));
    }

    Ok(FenPosition {
        board,
        side_to_move,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_placement(field: &str) -> Result<Board, ChessError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut board = Board::empty();
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as i32; // FEN starts from rank 8
        let mut file: i32 = 0;
        for ch in rank_str.chars() {
            if file > 7 {
                return Err(ChessError::InvalidFen(format!(
                    "too many squares in rank {}",
                    rank + 1
                )));
            }
            if let Some(digit) = ch.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid empty count '{ch}' in rank {}",
                        rank + 1
                    )));
                }
                file += digit as i32;
            } else if let Some((side, kind)) = PieceKind::from_char(ch) {
                let sq = Square::new(file, rank)?;
                board.set(sq, Some(loaded_piece(kind, side, sq)));
                file += 1;
            } else {
                return Err(ChessError::InvalidFen(format!(
                    "invalid character '{ch}' in piece placement"
                )));
            }
        }
        if file != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank {} has {} squares instead of 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(board)
}

/// Pawns off their start rank have moved; kings and rooks count as moved
/// until the castling field says otherwise.
fn loaded_piece(kind: PieceKind, side: Side, sq: Square) -> Piece {
    let has_moved = match kind {
        PieceKind::Pawn => sq.rank() != side.pawn_rank(),
        PieceKind::King | PieceKind::Rook => true,
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => false,
    };
    Piece {
        kind,
        side,
        has_moved,
    }
}

fn apply_castling_field(board: &mut Board, field: &str) -> Result<(), ChessError> {
    if field == "-" {
        return Ok(());
    }
    let mut seen = Vec::with_capacity(4);
    for c in field.chars() {
        let Some(&(_, side, rook_file)) = CASTLING_LETTERS.iter().find(|(l, ..)| *l == c) else {
            return Err(ChessError::InvalidFen(format!(
                "invalid castling string: '{field}'"
            )));
        };
        if seen.contains(&c) {
            return Err(ChessError::InvalidFen(format!(
                "repeated castling right '{c}'"
            )));
        }
        seen.push(c);

        let (king_sq, rook_sq) = castling_squares(side, rook_file)?;
        let king_ok = board.get(king_sq).is_some_and(|p| p.is(PieceKind::King, side));
        let rook_ok = board.get(rook_sq).is_some_and(|p| p.is(PieceKind::Rook, side));
        if !king_ok || !rook_ok {
            return Err(ChessError::InvalidFen(format!(
                "castling right '{c}' needs a king on {king_sq} and a rook on {rook_sq}"
            )));
        }
        for sq in [king_sq, rook_sq] {
            if let Some(piece) = board.get_mut(sq) {
                piece.has_moved = false;
            }
        }
    }
    Ok(())
}

fn castling_squares(side: Side, rook_file: u8) -> Result<(Square, Square), ChessError> {
    let rank = side.home_rank() as i32;
    Ok((
        Square::new(KING_FILE as i32, rank)?,
        Square::new(rook_file as i32, rank)?,
    ))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Export a position as a FEN string. The en passant field is always `-`.
pub fn format(board: &Board, side_to_move: Side, halfmove_clock: u16, fullmove_number: u16) -> String {
    let mut fen = String::with_capacity(80);

    // ----- Field 1: Piece placement -----
    for rank in (0..8).rev() {
        let mut empty_count = 0u8;
        for file in 0..8 {
            let piece = Square::new(file, rank).ok().and_then(|sq| board.get(sq));
            match piece {
                Some(piece) => {
                    if empty_count > 0 {
                        fen.push((b'0' + empty_count) as char);
                        empty_count = 0;
                    }
                    fen.push(piece.to_char());
                }
                None => empty_count += 1,
            }
        }
        if empty_count > 0 {
            fen.push((b'0' + empty_count) as char);
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    // ----- Field 2: Side to move -----
    fen.push(' ');
    fen.push(match side_to_move {
        Side::White => 'w',
        Side::Black => 'b',
    });

    // ----- Field 3: Castling -----
    fen.push(' ');
    fen.push_str(&castling_field(board));

    // ----- Fields 4-6 -----
    fen.push_str(&format!(" - {halfmove_clock} {fullmove_number}"));
    fen
}

fn castling_field(board: &Board) -> String {
    let unmoved = |sq: Square, kind: PieceKind, side: Side| {
        board
            .get(sq)
            .is_some_and(|p| p.is(kind, side) && !p.has_moved)
    };

    let rights: String = CASTLING_LETTERS
        .iter()
        .filter(|&&(_, side, rook_file)| {
            castling_squares(side, rook_file).is_ok_and(|(king_sq, rook_sq)| {
                unmoved(king_sq, PieceKind::King, side) && unmoved(rook_sq, PieceKind::Rook, side)
            })
        })
        .map(|&(letter, ..)| letter)
        .collect();

    if rights.is_empty() {
        "-".to_string()
    } else {
        rights
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
