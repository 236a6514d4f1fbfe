//! Pseudo-legal move generation.
//!
//! Destinations here follow each piece's movement pattern and blocking
//! rules but ignore whether the mover's own king ends up attacked; that is
//! the legality filter's job (`engine::legality`).

use crate::engine::attacks::{KING_OFFSETS, KNIGHT_OFFSETS};
use crate::engine::board::Board;
use crate::engine::types::{Piece, PieceKind, Side, Square};

/// File the king starts on; castling is only generated from here.
const KING_FILE: u8 = 4;
const KINGSIDE_ROOK_FILE: u8 = 7;
const QUEENSIDE_ROOK_FILE: u8 = 0;

// =========================================================================
// Public API
// =========================================================================

/// Pseudo-legal destinations for the piece on `from`. Empty if `from` is empty.
pub fn pseudo_legal_moves(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece.side, &mut moves),
        PieceKind::Knight => generate_leaper_moves(board, from, piece.side, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            generate_slider_moves(board, from, piece, &mut moves)
        }
        PieceKind::King => {
            generate_leaper_moves(board, from, piece.side, &KING_OFFSETS, &mut moves);
            generate_castling_moves(board, from, piece, &mut moves);
        }
    }
    moves
}

/// Can the king on `king_sq` castle with the rook on `rook_sq`?
///
/// True iff a rook of the king's side stands there, has not moved, and
/// every square strictly between the two is empty. Attacks on the king or
/// on the squares it crosses are not considered here.
pub fn can_castle(board: &Board, king_sq: Square, rook_sq: Square) -> bool {
    let Some(king) = board.get(king_sq) else {
        return false;
    };
    let Some(rook) = board.get(rook_sq) else {
        return false;
    };
    if rook.kind != PieceKind::Rook || rook.side != king.side || rook.has_moved {
        return false;
    }
    if king_sq.rank() != rook_sq.rank() || king_sq == rook_sq {
        return false;
    }

    let dir: i8 = if rook_sq.file() > king_sq.file() { 1 } else { -1 };
    let gap = (rook_sq.file() as i8 - king_sq.file() as i8).abs();
    (1..gap).all(|i| {
        king_sq
            .offset(dir * i, 0)
            .is_some_and(|between| board.is_empty(between))
    })
}

/// For a castling king move, the rook's origin and destination squares.
///
/// Returns `None` unless `king_from → king_to` is a two-file king step
/// along its rank.
pub fn castling_rook_squares(king_from: Square, king_to: Square) -> Option<(Square, Square)> {
    if king_from.rank() != king_to.rank() {
        return None;
    }
    let rank = king_from.rank() as i32;
    let df = king_to.file() as i8 - king_from.file() as i8;
    let (rook_from, rook_to) = match df {
        2 => (KINGSIDE_ROOK_FILE, king_to.file() - 1),
        -2 => (QUEENSIDE_ROOK_FILE, king_to.file() + 1),
        _ => return None,
    };
    Some((
        Square::new(rook_from as i32, rank).ok()?,
        Square::new(rook_to as i32, rank).ok()?,
    ))
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(board: &Board, from: Square, us: Side, moves: &mut Vec<Square>) {
    let dir = us.forward();

    // --- Single push, then double push from the start rank ---
    if let Some(one) = from.offset(0, dir)
        && board.is_empty(one)
    {
        moves.push(one);
        if from.rank() == us.pawn_rank()
            && let Some(two) = from.offset(0, dir * 2)
            && board.is_empty(two)
        {
            moves.push(two);
        }
    }

    // --- Diagonal captures (enemy occupant required) ---
    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dir)
            && board.has_side(to, !us)
        {
            moves.push(to);
        }
    }
}

// =========================================================================
// Knight & king steps
// =========================================================================

fn generate_leaper_moves(
    board: &Board,
    from: Square,
    us: Side,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr)
            && !board.has_side(to, us)
        {
            moves.push(to);
        }
    }
}

// =========================================================================
// Sliding pieces (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(board: &Board, from: Square, piece: &Piece, moves: &mut Vec<Square>) {
    for &(df, dr) in piece.kind.slide_directions() {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match board.get(to) {
                None => moves.push(to),
                Some(other) => {
                    if other.side != piece.side {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn generate_castling_moves(board: &Board, from: Square, king: &Piece, moves: &mut Vec<Square>) {
    let home = king.side.home_rank();
    if king.has_moved || from.rank() != home || from.file() != KING_FILE {
        return;
    }

    for (rook_file, step) in [(KINGSIDE_ROOK_FILE, 2), (QUEENSIDE_ROOK_FILE, -2)] {
        let Ok(rook_sq) = Square::new(rook_file as i32, home as i32) else {
            continue;
        };
        if can_castle(board, from, rook_sq)
            && let Some(to) = from.offset(step, 0)
        {
            moves.push(to);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn sorted(mut v: Vec<Square>) -> Vec<String> {
        v.sort();
        v.into_iter().map(|s| s.to_algebraic()).collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        let mut v: Vec<Square> = list.iter().map(|n| sq(n)).collect();
        v.sort();
        v.into_iter().map(|s| s.to_algebraic()).collect()
    }

    fn kings() -> Board {
        Board::empty()
            .with_piece(sq("e1"), Piece::new(PieceKind::King, Side::White))
            .with_piece(sq("e8"), Piece::new(PieceKind::King, Side::Black))
    }

    // -------------------------------------------------------------------
    // Pawns
    // -------------------------------------------------------------------

    #[test]
    fn pawn_single_and_double_push() {
        let b = Board::starting();
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("e2"))), names(&["e3", "e4"]));
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("d7"))), names(&["d6", "d5"]));
    }

    #[test]
    fn pawn_double_push_only_from_start_rank() {
        let b = kings().with_piece(sq("c3"), Piece::new(PieceKind::Pawn, Side::White));
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("c3"))), names(&["c4"]));
    }

    #[test]
    fn pawn_blocked() {
        let b = kings()
            .with_piece(sq("e2"), Piece::new(PieceKind::Pawn, Side::White))
            .with_piece(sq("e3"), Piece::new(PieceKind::Knight, Side::Black));
        assert!(pseudo_legal_moves(&b, sq("e2")).is_empty());

        // Far square blocked: single push only.
        let b = kings()
            .with_piece(sq("d2"), Piece::new(PieceKind::Pawn, Side::White))
            .with_piece(sq("d4"), Piece::new(PieceKind::Knight, Side::Black));
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("d2"))), names(&["d3"]));
    }

    #[test]
    fn pawn_captures_enemies_only() {
        let b = kings()
            .with_piece(sq("d4"), Piece::new(PieceKind::Pawn, Side::White))
            .with_piece(sq("c5"), Piece::new(PieceKind::Bishop, Side::Black))
            .with_piece(sq("e5"), Piece::new(PieceKind::Bishop, Side::White));
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("d4"))), names(&["d5", "c5"]));
    }

    #[test]
    fn black_pawn_moves_down() {
        let b = kings()
            .with_piece(sq("b4"), Piece::new(PieceKind::Pawn, Side::Black))
            .with_piece(sq("a3"), Piece::new(PieceKind::Rook, Side::White));
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("b4"))), names(&["b3", "a3"]));
    }

    // -------------------------------------------------------------------
    // Knights, sliders, kings
    // -------------------------------------------------------------------

    #[test]
    fn knight_skips_allies() {
        let b = Board::starting();
        assert_eq!(sorted(pseudo_legal_moves(&b, sq("b1"))), names(&["a3", "c3"]));
    }

    #[test]
    fn sliders_stop_at_pieces() {
        let b = kings()
            .with_piece(sq("d1"), Piece::new(PieceKind::Rook, Side::White))
            .with_piece(sq("d4"), Piece::new(PieceKind::Pawn, Side::Black))
            .with_piece(sq("b1"), Piece::new(PieceKind::Knight, Side::White));
        assert_eq!(
            sorted(pseudo_legal_moves(&b, sq("d1"))),
            names(&["d2", "d3", "d4", "c1"])
        );
    }

    #[test]
    fn starting_sliders_have_no_moves() {
        let b = Board::starting();
        for name in ["a1", "c1", "d1", "f1", "h1", "e1"] {
            assert!(pseudo_legal_moves(&b, sq(name)).is_empty(), "{name}");
        }
    }

    #[test]
    fn queen_in_open_centre() {
        let b = kings().with_piece(sq("d4"), Piece::new(PieceKind::Queen, Side::White));
        assert_eq!(pseudo_legal_moves(&b, sq("d4")).len(), 27);
    }

    #[test]
    fn empty_square_yields_nothing() {
        assert!(pseudo_legal_moves(&Board::starting(), sq("e4")).is_empty());
    }

    // -------------------------------------------------------------------
    // Castling
    // -------------------------------------------------------------------

    #[test]
    fn castling_both_sides() {
        let b = kings()
            .with_piece(sq("a1"), Piece::new(PieceKind::Rook, Side::White))
            .with_piece(sq("h1"), Piece::new(PieceKind::Rook, Side::White));
        let moves = pseudo_legal_moves(&b, sq("e1"));
        assert!(moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));
        assert_eq!(moves.len(), 7);
    }

    #[test]
    fn castling_blocked_by_piece_between() {
        let b = kings()
            .with_piece(sq("a1"), Piece::new(PieceKind::Rook, Side::White))
            .with_piece(sq("b1"), Piece::new(PieceKind::Knight, Side::White))
            .with_piece(sq("h1"), Piece::new(PieceKind::Rook, Side::White));
        assert!(!can_castle(&b, sq("e1"), sq("a1")));
        assert!(can_castle(&b, sq("e1"), sq("h1")));
        let moves = pseudo_legal_moves(&b, sq("e1"));
        assert!(!moves.contains(&sq("c1")));
        assert!(moves.contains(&sq("g1")));
    }

    #[test]
    fn castling_requires_unmoved_pieces() {
        let b = kings().with_piece(sq("h1"), Piece::moved(PieceKind::Rook, Side::White));
        assert!(!can_castle(&b, sq("e1"), sq("h1")));

        let b = Board::empty()
            .with_piece(sq("e1"), Piece::moved(PieceKind::King, Side::White))
            .with_piece(sq("h1"), Piece::new(PieceKind::Rook, Side::White));
        assert!(!pseudo_legal_moves(&b, sq("e1")).contains(&sq("g1")));
    }

    #[test]
    fn castling_requires_own_rook() {
        let b = kings().with_piece(sq("h1"), Piece::new(PieceKind::Rook, Side::Black));
        assert!(!can_castle(&b, sq("e1"), sq("h1")));
        let b = kings().with_piece(sq("h1"), Piece::new(PieceKind::Queen, Side::White));
        assert!(!can_castle(&b, sq("e1"), sq("h1")));
        assert!(!can_castle(&kings(), sq("e1"), sq("h1")));
    }

    #[test]
    fn castling_ignores_attacks() {
        // Black rook eyes f1; castle candidate still generated here.
        let b = kings()
            .with_piece(sq("h1"), Piece::new(PieceKind::Rook, Side::White))
            .with_piece(sq("f8"), Piece::new(PieceKind::Rook, Side::Black));
        assert!(pseudo_legal_moves(&b, sq("e1")).contains(&sq("g1")));
    }

    #[test]
    fn rook_squares_for_castling() {
        assert_eq!(
            castling_rook_squares(sq("e1"), sq("g1")),
            Some((sq("h1"), sq("f1")))
        );
        assert_eq!(
            castling_rook_squares(sq("e8"), sq("c8")),
            Some((sq("a8"), sq("d8")))
        );
        assert_eq!(castling_rook_squares(sq("e1"), sq("f1")), None);
        assert_eq!(castling_rook_squares(sq("e1"), sq("g2")), None);
    }
}
