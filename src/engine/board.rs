//! Mailbox board representation.
//!
//! `Board` is a plain 8×8 grid of optional pieces indexed rank-major
//! (a1 = 0, h1 = 7, a8 = 56). It has no rules of its own; attack detection
//! and move generation live in sibling modules and read it through the
//! accessors here.

use crate::engine::types::{ChessError, Piece, PieceKind, Side, Square};

/// Back-rank order from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// 64 cells, each holding at most one piece.
///
/// `Clone` is a deep copy: the clone owns its own pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; Square::NUM],
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

impl Board {
    /// Create an empty board with no pieces.
    pub fn empty() -> Self {
        Board {
            cells: std::array::from_fn(|_| None),
        }
    }

    /// Standard starting position, every piece unmoved.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for side in [Side::White, Side::Black] {
            let home = side.home_rank();
            let pawns = side.pawn_rank();
            for (file, kind) in BACK_RANK.iter().enumerate() {
                let file = file as u8;
                board.set(sq_at(file, home), Some(Piece::new(*kind, side)));
                board.set(sq_at(file, pawns), Some(Piece::new(PieceKind::Pawn, side)));
            }
        }
        board
    }

    /// Builder-style placement for fixtures: `Board::empty().with_piece(..)`.
    pub fn with_piece(mut self, sq: Square, piece: Piece) -> Self {
        self.set(sq, Some(piece));
        self
    }

    // -----------------------------------------------------------------------
    // Cell access
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        self.cells[sq.index()].as_ref()
    }

    /// Like [`get`](Self::get) but from raw coordinates, failing closed when
    /// they are off the board.
    pub fn get_checked(&self, file: i32, rank: i32) -> Result<Option<&Piece>, ChessError> {
        let sq = Square::new(file, rank)?;
        Ok(self.get(sq))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.cells[sq.index()].as_mut()
    }

    /// Unconditional write; the caller keeps the board consistent.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index()] = piece;
    }

    /// Move the occupant out of `sq`, leaving it empty.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    /// Put `piece` on `sq` and hand back whatever was there.
    #[inline]
    pub fn replace(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[sq.index()], piece)
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    /// Is there a piece of `side` on `sq`?
    #[inline]
    pub fn has_side(&self, sq: Square, side: Side) -> bool {
        self.get(sq).is_some_and(|p| p.side == side)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Linear scan for the king of `side`. `None` means the board is
    /// malformed.
    pub fn find_king(&self, side: Side) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq).is_some_and(|p| p.is(PieceKind::King, side)))
    }

    /// Squares holding pieces of `side`, rank-major.
    pub fn pieces(&self, side: Side) -> Vec<Square> {
        Square::all().filter(|&sq| self.has_side(sq, side)).collect()
    }

    /// Number of kings of `side` on the board.
    pub fn king_count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|p| p.is(PieceKind::King, side))
            .count()
    }

    /// Number of occupied cells.
    pub fn piece_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8u8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8u8 {
                let ch = self.get(sq_at(file, rank)).map_or('.', Piece::to_char);
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

/// In-range coordinates to a square; only called with loop bounds 0..8.
#[inline]
fn sq_at(file: u8, rank: u8) -> Square {
    Square::from_index(rank as usize * 8 + file as usize).unwrap_or_else(|| {
        unreachable!("board loops stay within 0..8, got ({file}, {rank})")
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn starting_position_layout() {
        let b = Board::starting();
        assert_eq!(b.piece_count(), 32);
        assert_eq!(b.get(sq("e1")), Some(&Piece::new(PieceKind::King, Side::White)));
        assert_eq!(b.get(sq("d8")), Some(&Piece::new(PieceKind::Queen, Side::Black)));
        assert_eq!(b.get(sq("a2")), Some(&Piece::new(PieceKind::Pawn, Side::White)));
        assert_eq!(b.get(sq("h7")), Some(&Piece::new(PieceKind::Pawn, Side::Black)));
        assert_eq!(b.get(sq("e4")), None);
        assert_eq!(b.pieces(Side::White).len(), 16);
        assert_eq!(b.pieces(Side::Black).len(), 16);
    }

    #[test]
    fn find_king() {
        let b = Board::starting();
        assert_eq!(b.find_king(Side::White), Some(sq("e1")));
        assert_eq!(b.find_king(Side::Black), Some(sq("e8")));
        assert_eq!(Board::empty().find_king(Side::White), None);
    }

    #[test]
    fn get_checked_rejects_off_board() {
        let b = Board::starting();
        assert!(b.get_checked(4, 0).unwrap().is_some());
        assert!(b.get_checked(4, 4).unwrap().is_none());
        assert_eq!(
            b.get_checked(8, 0),
            Err(ChessError::OutOfBounds { file: 8, rank: 0 })
        );
        assert_eq!(
            b.get_checked(0, -1),
            Err(ChessError::OutOfBounds { file: 0, rank: -1 })
        );
    }

    #[test]
    fn clone_is_independent() {
        let original = Board::starting();
        let mut copy = original.clone();
        copy.take(sq("e2"));
        copy.get_mut(sq("e1")).unwrap().has_moved = true;
        assert!(original.get(sq("e2")).is_some());
        assert!(!original.get(sq("e1")).unwrap().has_moved);
        assert_ne!(original, copy);
    }

    #[test]
    fn take_and_replace_relocate() {
        let mut b = Board::starting();
        let pawn = b.take(sq("e2"));
        assert!(b.is_empty(sq("e2")));
        let previous = b.replace(sq("e4"), pawn);
        assert_eq!(previous, None);
        assert_eq!(b.piece_count(), 32);
        assert!(b.has_side(sq("e4"), Side::White));
    }

    #[test]
    fn builder_places_pieces() {
        let b = Board::empty()
            .with_piece(sq("h8"), Piece::new(PieceKind::King, Side::Black))
            .with_piece(sq("a1"), Piece::new(PieceKind::King, Side::White));
        assert_eq!(b.piece_count(), 2);
        assert_eq!(b.king_count(Side::White), 1);
        assert_eq!(b.king_count(Side::Black), 1);
    }

    #[test]
    fn board_string_layout() {
        let s = Board::starting().board_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }
}
