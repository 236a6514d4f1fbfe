use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Rank direction pawns of this side advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Rank holding this side's king and rooks at the start.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    /// Rank this side's pawns start on (double push allowed from here).
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// Farthest rank from this side's start; pawns promote on arrival.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }
}

impl std::ops::Not for Side {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, side: Side) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// Parse a FEN piece letter; case selects the side.
    pub fn from_char(c: char) -> Option<(Side, PieceKind)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((side, kind))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the board: file 0..8 (a..h), rank 0..8 (1..8).
///
/// Always on the board; raw coordinates go through [`Square::new`] which
/// rejects anything outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub const NUM: usize = 64;

    /// Validate raw coordinates.
    pub fn new(file: i32, rank: i32) -> Result<Self, ChessError> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Ok(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            Err(ChessError::OutOfBounds { file, rank })
        }
    }

    /// Square from a rank-major index (a1 = 0, h1 = 7, a8 = 56).
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::NUM).then(|| Square {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        })
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// The square `(df, dr)` away, or `None` if that falls off the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, rank-major ascending.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM).filter_map(Square::from_index)
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.file) as char;
        let rank = (b'1' + self.rank) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_algebraic()
    }
}

impl TryFrom<String> for Square {
    type Error = ChessError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&s).ok_or(ChessError::InvalidSquare(s))
    }
}

impl std::str::FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece standing on the board.
///
/// Deliberately not `Copy`: a piece lives in exactly one cell and moving it
/// means taking it out of one cell and putting it into another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    /// Only consulted for kings and rooks (castling eligibility).
    pub has_moved: bool,
}

impl Piece {
    /// An unmoved piece.
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Piece {
            kind,
            side,
            has_moved: false,
        }
    }

    /// A piece that has already moved; fixtures use this for kings and
    /// rooks that must not castle.
    pub fn moved(kind: PieceKind, side: Side) -> Self {
        Piece {
            kind,
            side,
            has_moved: true,
        }
    }

    #[inline]
    pub fn is(&self, kind: PieceKind, side: Side) -> bool {
        self.kind == kind && self.side == side
    }

    pub fn to_char(&self) -> char {
        self.kind.to_char(self.side)
    }
}

// ---------------------------------------------------------------------------
// CastlingRule
// ---------------------------------------------------------------------------

/// How strictly castling is filtered beyond the landing-square check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CastlingRule {
    /// Only the king's destination is tested for check.
    #[default]
    Permissive,
    /// Additionally forbids castling out of check or across an attacked square.
    Strict,
}

impl CastlingRule {
    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "permissive" => Some(CastlingRule::Permissive),
            "strict" => Some(CastlingRule::Strict),
            _ => None,
        }
    }
}

impl fmt::Display for CastlingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastlingRule::Permissive => write!(f, "permissive"),
            CastlingRule::Strict => write!(f, "strict"),
        }
    }
}

// ---------------------------------------------------------------------------
// TerminalResult & MoveOutcome
// ---------------------------------------------------------------------------

/// Game state as seen by the side to move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminalResult {
    #[default]
    None,
    /// The given side's king is attacked but it has a way out.
    Check(Side),
    Checkmate {
        winner: Side,
    },
    Stalemate,
}

impl TerminalResult {
    pub fn as_str(&self) -> &str {
        match self {
            TerminalResult::None => "active",
            TerminalResult::Check(_) => "check",
            TerminalResult::Checkmate { .. } => "checkmate",
            TerminalResult::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            TerminalResult::Checkmate { .. } | TerminalResult::Stalemate
        )
    }
}

impl fmt::Display for TerminalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalResult::Check(side) => write!(f, "check ({side} king)"),
            TerminalResult::Checkmate { winner } => write!(f, "checkmate ({winner} wins)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// What a successful [`apply_move`](crate::engine::game::GameState::apply_move)
/// did, for the presentation layer to animate afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub from: Square,
    pub to: Square,
    /// Kind of the piece that moved, before any promotion.
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub castled: bool,
    pub promoted: bool,
    /// Terminal state for the side now to move.
    pub terminal: TerminalResult,
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("coordinate ({file}, {rank}) is off the board")]
    OutOfBounds { file: i32, rank: i32 },

    #[error("no piece of the side to move on {0}")]
    NoPieceOrWrongTurn(Square),

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("game is already over: {0}")]
    GameOver(TerminalResult),

    #[error("malformed board: no {0} king")]
    MalformedBoard(Side),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    #[error("invalid promotion piece: {0} (pawns always promote to a queen)")]
    InvalidPromotion(char),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
