//! Attack detection.
//!
//! Every predicate here is pure: it reads the board and never mutates it.
//! The legality filter relies on one property in particular: the occupant
//! of the *target* square is irrelevant. An ally standing on the target is
//! still "attacked", because the filter places the mover on its destination
//! before asking whether the king is attacked there.

use crate::engine::board::Board;
use crate::engine::types::{Piece, PieceKind, Side, Square};

// =========================================================================
// Direction tables
// =========================================================================

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub(crate) const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

impl PieceKind {
    /// Ray directions for sliding pieces; empty for leapers and pawns.
    pub(crate) fn slide_directions(self) -> &'static [(i8, i8)] {
        match self {
            PieceKind::Bishop => &BISHOP_DIRECTIONS,
            PieceKind::Rook => &ROOK_DIRECTIONS,
            PieceKind::Queen => &QUEEN_DIRECTIONS,
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
        }
    }
}

// =========================================================================
// Public API
// =========================================================================

/// Is `target` attacked by any piece of `by`?
///
/// Scans rank-major and returns on the first attacker found.
pub fn is_attacked(board: &Board, target: Square, by: Side) -> bool {
    attacker_of(board, target, by).is_some()
}

/// The first square (rank-major) holding a piece of `by` that attacks
/// `target`.
pub fn attacker_of(board: &Board, target: Square, by: Side) -> Option<Square> {
    Square::all().find(|&from| {
        board
            .get(from)
            .is_some_and(|piece| piece.side == by && can_attack(board, from, piece, target))
    })
}

/// Can `piece`, standing on `from`, attack `target` on this board?
pub fn can_attack(board: &Board, from: Square, piece: &Piece, target: Square) -> bool {
    let df = target.file() as i8 - from.file() as i8;
    let dr = target.rank() as i8 - from.rank() as i8;

    match piece.kind {
        PieceKind::Pawn => dr == piece.side.forward() && df.abs() == 1,
        PieceKind::Knight => matches!((df.abs(), dr.abs()), (1, 2) | (2, 1)),
        PieceKind::Bishop => is_diagonal(df, dr) && has_clear_path(board, from, target),
        PieceKind::Rook => is_straight(df, dr) && has_clear_path(board, from, target),
        PieceKind::Queen => {
            (is_straight(df, dr) || is_diagonal(df, dr)) && has_clear_path(board, from, target)
        }
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1 && (df, dr) != (0, 0),
    }
}

/// Every square strictly between `from` and `to` is empty.
///
/// Steps by the unit vector from `from` toward `to`; only meaningful for
/// squares sharing a rank, file or diagonal. Adjacent or identical squares
/// are trivially clear.
pub fn has_clear_path(board: &Board, from: Square, to: Square) -> bool {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    let steps = df.abs().max(dr.abs());
    if steps <= 1 {
        return true;
    }

    let (step_f, step_r) = (df.signum(), dr.signum());
    (1..steps).all(|i| {
        from.offset(step_f * i, step_r * i)
            .is_some_and(|between| board.is_empty(between))
    })
}

#[inline]
fn is_straight(df: i8, dr: i8) -> bool {
    (df == 0) != (dr == 0)
}

#[inline]
fn is_diagonal(df: i8, dr: i8) -> bool {
    df != 0 && df.abs() == dr.abs()
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

    fn lone(at: &str, kind: PieceKind, side: Side) -> Board {
        Board::empty().with_piece(sq(at), Piece::new(kind, side))
    }

    // -------------------------------------------------------------------
    // Per-kind patterns
    // -------------------------------------------------------------------

    #[test]
    fn pawn_attacks_diagonals_only() {
        let b = lone("e4", PieceKind::Pawn, Side::White);
        assert!(is_attacked(&b, sq("d5"), Side::White));
        assert!(is_attacked(&b, sq("f5"), Side::White));
        assert!(!is_attacked(&b, sq("e5"), Side::White));
        assert!(!is_attacked(&b, sq("d3"), Side::White));

        let b = lone("e5", PieceKind::Pawn, Side::Black);
        assert!(is_attacked(&b, sq("d4"), Side::Black));
        assert!(is_attacked(&b, sq("f4"), Side::Black));
        assert!(!is_attacked(&b, sq("e4"), Side::Black));
        assert!(!is_attacked(&b, sq("f6"), Side::Black));
    }

    #[test]
    fn pawn_on_edge_file() {
        let b = lone("a2", PieceKind::Pawn, Side::White);
        let attacked: Vec<Square> = Square::all()
            .filter(|&t| is_attacked(&b, t, Side::White))
            .collect();
        assert_eq!(attacked, vec![sq("b3")]);
    }

    #[test]
    fn knight_jumps_over_blockers() {
        // Enemy blockers, so every white attack comes from the knight.
        let b = lone("g1", PieceKind::Knight, Side::White)
            .with_piece(sq("g2"), Piece::new(PieceKind::Pawn, Side::Black))
            .with_piece(sq("f2"), Piece::new(PieceKind::Pawn, Side::Black))
            .with_piece(sq("h2"), Piece::new(PieceKind::Pawn, Side::Black));
        let attacked: Vec<Square> = Square::all()
            .filter(|&t| is_attacked(&b, t, Side::White))
            .collect();
        assert_eq!(attacked, vec![sq("e2"), sq("f3"), sq("h3")]);
        assert!(!is_attacked(&b, sq("g3"), Side::White));
    }

    #[test]
    fn king_attacks_neighbours_not_itself() {
        let b = lone("d4", PieceKind::King, Side::Black);
        let attacked = Square::all()
            .filter(|&t| is_attacked(&b, t, Side::Black))
            .count();
        assert_eq!(attacked, 8);
        assert!(!is_attacked(&b, sq("d4"), Side::Black));
        assert!(!is_attacked(&b, sq("d6"), Side::Black));
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let b = lone("d4", PieceKind::Queen, Side::White);
        assert!(is_attacked(&b, sq("d8"), Side::White));
        assert!(is_attacked(&b, sq("a4"), Side::White));
        assert!(is_attacked(&b, sq("h8"), Side::White));
        assert!(is_attacked(&b, sq("a1"), Side::White));
        assert!(!is_attacked(&b, sq("e6"), Side::White));
        let count = Square::all()
            .filter(|&t| is_attacked(&b, t, Side::White))
            .count();
        assert_eq!(count, 27);
    }

    #[test]
    fn bishop_blocked_on_diagonal() {
        let b = lone("c1", PieceKind::Bishop, Side::White)
            .with_piece(sq("e3"), Piece::new(PieceKind::Pawn, Side::Black));
        assert!(is_attacked(&b, sq("e3"), Side::White));
        assert!(!is_attacked(&b, sq("f4"), Side::White));
        assert!(is_attacked(&b, sq("a3"), Side::White));
    }

    // -------------------------------------------------------------------
    // Clear path & blockers
    // -------------------------------------------------------------------

    #[test]
    fn rook_blocker_on_rank() {
        // Rook a1, target d1 three files away, blocker on b1.
        let blocked = lone("a1", PieceKind::Rook, Side::White)
            .with_piece(sq("b1"), Piece::new(PieceKind::Knight, Side::Black));
        assert!(!is_attacked(&blocked, sq("d1"), Side::White));

        let mut cleared = blocked.clone();
        cleared.take(sq("b1"));
        assert!(is_attacked(&cleared, sq("d1"), Side::White));
    }

    #[test]
    fn target_occupant_is_ignored() {
        // An ally on the target square is still attacked.
        let b = lone("a1", PieceKind::Rook, Side::White)
            .with_piece(sq("a5"), Piece::new(PieceKind::Pawn, Side::White));
        assert!(is_attacked(&b, sq("a5"), Side::White));
        assert!(!is_attacked(&b, sq("a6"), Side::White));
    }

    #[test]
    fn clear_path_trivial_for_adjacent() {
        let b = Board::starting();
        assert!(has_clear_path(&b, sq("e1"), sq("e2")));
        assert!(has_clear_path(&b, sq("e1"), sq("e1")));
        assert!(!has_clear_path(&b, sq("e1"), sq("e3")));
        assert!(has_clear_path(&b, sq("e2"), sq("e7")));
    }

    #[test]
    fn attacker_scan_reports_first_square() {
        let b = Board::empty()
            .with_piece(sq("a8"), Piece::new(PieceKind::Rook, Side::White))
            .with_piece(sq("h1"), Piece::new(PieceKind::Rook, Side::White));
        assert_eq!(attacker_of(&b, sq("h8"), Side::White), Some(sq("h1")));
        assert_eq!(attacker_of(&b, sq("h8"), Side::Black), None);
    }

    #[test]
    fn starting_position_attacks() {
        let b = Board::starting();
        // Third rank fully covered by white, fourth rank not at all.
        for file in 0..8 {
            let third = Square::new(file, 2).unwrap();
            let fourth = Square::new(file, 3).unwrap();
            assert!(is_attacked(&b, third, Side::White), "{third}");
            assert!(!is_attacked(&b, fourth, Side::White), "{fourth}");
        }
        assert!(!is_attacked(&b, sq("e1"), Side::Black));
        assert!(!is_attacked(&b, sq("e8"), Side::White));
    }
}
