//! Legal move filtering and check / mate / stalemate detection.
//!
//! Pipeline:
//!   1. Generate pseudo-legal destinations (`engine::movegen`).
//!   2. Filter: relocate the piece on the live board, ask whether its king
//!      is attacked, then put both cells back exactly as they were.
//!
//! The simulation mutates the board it is given, so every entry point here
//! takes `&mut Board` and leaves it unchanged on return.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{CastlingRule, ChessError, PieceKind, Side, Square};

// =========================================================================
// Check queries
// =========================================================================

/// Is the king of `side` attacked?
///
/// Fails with `MalformedBoard` if `side` has no king.
pub fn king_in_check(board: &Board, side: Side) -> Result<bool, ChessError> {
    let king = board.find_king(side).ok_or(ChessError::MalformedBoard(side))?;
    Ok(attacks::is_attacked(board, king, !side))
}

/// Like [`king_in_check`] but answers `false` for a board without a king of
/// `side`, after logging it.
pub fn is_king_in_check(board: &Board, side: Side) -> bool {
    match king_in_check(board, side) {
        Ok(in_check) => in_check,
        Err(err) => {
            tracing::error!(%side, "check query on malformed board: {err}");
            false
        }
    }
}

// =========================================================================
// Legal moves
// =========================================================================

/// Legal destinations for the piece on `from`.
///
/// A subset of [`movegen::pseudo_legal_moves`]: each candidate is played on
/// the board, kept only if the mover's king is not attacked afterwards, and
/// rolled back before the next candidate.
pub fn legal_moves(board: &mut Board, from: Square, castling: CastlingRule) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let side = piece.side;
    let is_king = piece.kind == PieceKind::King;

    let pseudo = movegen::pseudo_legal_moves(board, from);
    let total = pseudo.len();

    let mut legal = Vec::with_capacity(total);
    for to in pseudo {
        if is_king && castling == CastlingRule::Strict && is_castle_step(from, to) {
            if !castling_path_safe(board, from, to, side) {
                continue;
            }
        }
        if !leaves_king_attacked(board, from, to, side) {
            legal.push(to);
        }
    }

    tracing::debug!(
        square = %from,
        %side,
        legal = legal.len(),
        pseudo = total,
        "filtered moves"
    );
    legal
}

/// Does `side` have at least one legal move? Stops at the first piece that
/// does.
pub fn has_any_legal_move(board: &mut Board, side: Side, castling: CastlingRule) -> bool {
    for from in board.pieces(side) {
        if !legal_moves(board, from, castling).is_empty() {
            return true;
        }
    }
    false
}

/// Every legal `(from, to)` pair for `side`, rank-major by origin.
pub fn all_legal_moves(board: &mut Board, side: Side, castling: CastlingRule) -> Vec<(Square, Square)> {
    let mut moves = Vec::new();
    for from in board.pieces(side) {
        moves.extend(legal_moves(board, from, castling).into_iter().map(|to| (from, to)));
    }
    moves
}

/// In check with no legal move.
pub fn is_checkmate(board: &mut Board, side: Side, castling: CastlingRule) -> bool {
    if !is_king_in_check(board, side) {
        return false;
    }
    !has_any_legal_move(board, side, castling)
}

/// Not in check, yet no legal move.
pub fn is_stalemate(board: &mut Board, side: Side, castling: CastlingRule) -> bool {
    if is_king_in_check(board, side) {
        return false;
    }
    !has_any_legal_move(board, side, castling)
}

// =========================================================================
// Simulation (internal)
// =========================================================================

/// Play `from → to` on the board, test the mover's king, and undo.
fn leaves_king_attacked(board: &mut Board, from: Square, to: Square, side: Side) -> bool {
    let mover = board.take(from);
    let displaced = board.replace(to, mover);

    let attacked = is_king_in_check(board, side);

    let mover = board.replace(to, displaced);
    board.set(from, mover);
    attacked
}

#[inline]
fn is_castle_step(from: Square, to: Square) -> bool {
    from.rank() == to.rank() && (to.file() as i8 - from.file() as i8).abs() == 2
}

/// The king is not in check now and would not be on the square it crosses.
fn castling_path_safe(board: &mut Board, from: Square, to: Square, side: Side) -> bool {
    if attacks::is_attacked(board, from, !side) {
        tracing::debug!(%side, "castling refused: king in check");
        return false;
    }
    let step = (to.file() as i8 - from.file() as i8).signum();
    let Some(transit) = from.offset(step, 0) else {
        return false;
    };
    if leaves_king_attacked(board, from, transit, side) {
        tracing::debug!(%side, square = %transit, "castling refused: transit square attacked");
        return false;
    }
    true
}

// =========================================================================
// Tests
// =========================================================================
