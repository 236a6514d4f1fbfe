//! Stateful game controller wrapping the board.
//!
//! `GameState` owns the board, the side to move, and the terminal state. It
//! is the only place a move is actually played: it validates the move
//! against the legality filter, relocates pieces (both of them when
//! castling), promotes pawns, flips the turn, and re-evaluates check, mate
//! and stalemate for the side now to move.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::engine::board::Board;
use crate::engine::fen::{self, FenPosition};
use crate::engine::legality;
use crate::engine::movegen;
use crate::engine::notation;
use crate::engine::types::{
    CastlingRule, ChessError, MoveOutcome, Piece, PieceKind, Side, Square, TerminalResult,
};

// =========================================================================
// MoveRecord
// =========================================================================

/// A played move, kept for display. The rules never read the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// UCI text of the move (`e7e8q` for a promotion).
    pub uci: String,
    /// Side that played it.
    pub side: Side,
    pub outcome: MoveOutcome,
}

// =========================================================================
// GameState
// =========================================================================

/// A game in progress: board, turn, terminal state and history.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Side,
    terminal: TerminalResult,
    castling: CastlingRule,
    history: Vec<MoveRecord>,

    // FEN bookkeeping only; no draw rule reads these.
    halfmove_clock: u16,
    fullmove_number: u16,

    /// Position `new_game` returns to.
    start: FenPosition,
}

impl GameState {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Standard starting position, permissive castling.
    pub fn new() -> Self {
        Self::with_rules(CastlingRule::default())
    }

    /// Standard starting position under the given castling rule.
    pub fn with_rules(castling: CastlingRule) -> Self {
        let start = FenPosition {
            board: Board::starting(),
            side_to_move: Side::White,
            halfmove_clock: 0,
            fullmove_number: 1,
        };
        Self {
            board: start.board.clone(),
            side_to_move: Side::White,
            terminal: TerminalResult::None,
            castling,
            history: Vec::new(),
            halfmove_clock: 0,
            fullmove_number: 1,
            start,
        }
    }

    /// Start from an arbitrary board.
    ///
    /// Requires exactly one king per side. The terminal state is computed
    /// for `side_to_move`, so a fixture can start already mated.
    pub fn from_board(
        board: Board,
        side_to_move: Side,
        castling: CastlingRule,
    ) -> Result<Self, ChessError> {
        Self::from_position(
            FenPosition {
                board,
                side_to_move,
                halfmove_clock: 0,
                fullmove_number: 1,
            },
            castling,
        )
    }

    /// Start from a FEN string.
    pub fn from_fen(fen: &str, castling: CastlingRule) -> Result<Self, ChessError> {
        Self::from_position(fen::parse(fen)?, castling)
    }

    /// Start from the configured position and castling rule.
    pub fn from_config(config: &RulesConfig) -> Result<Self, ChessError> {
        match &config.start_fen {
            Some(fen) => Self::from_fen(fen, config.castling),
            None => Ok(Self::with_rules(config.castling)),
        }
    }

    fn from_position(start: FenPosition, castling: CastlingRule) -> Result<Self, ChessError> {
        for side in [Side::White, Side::Black] {
            if start.board.king_count(side) != 1 {
                return Err(ChessError::MalformedBoard(side));
            }
        }

        let mut game = Self {
            board: start.board.clone(),
            side_to_move: start.side_to_move,
            terminal: TerminalResult::None,
            castling,
            history: Vec::new(),
            halfmove_clock: start.halfmove_clock,
            fullmove_number: start.fullmove_number,
            start,
        };
        game.terminal = game.evaluate_terminal();
        Ok(game)
    }

    /// Reset to the position this game was created from and clear history.
    pub fn new_game(&mut self) {
        self.board = self.start.board.clone();
        self.side_to_move = self.start.side_to_move;
        self.halfmove_clock = self.start.halfmove_clock;
        self.fullmove_number = self.start.fullmove_number;
        self.history.clear();
        self.terminal = self.evaluate_terminal();
        tracing::info!(side = %self.side_to_move, "new game");
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Check / mate / stalemate state for the side to move.
    pub fn terminal(&self) -> TerminalResult {
        self.terminal
    }

    pub fn is_game_over(&self) -> bool {
        self.terminal.is_game_over()
    }

    pub fn castling_rule(&self) -> CastlingRule {
        self.castling
    }

    /// Moves played since the game (re)started, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        fen::format(
            &self.board,
            self.side_to_move,
            self.halfmove_clock,
            self.fullmove_number,
        )
    }

    // -----------------------------------------------------------------
    // Rule queries
    // -----------------------------------------------------------------

    /// Legal destinations for the piece on `from`, whichever side owns it.
    ///
    /// Takes `&mut self` because the filter simulates on the live board;
    /// the board is unchanged on return.
    pub fn legal_moves(&mut self, from: Square) -> Vec<Square> {
        legality::legal_moves(&mut self.board, from, self.castling)
    }

    /// Every legal `(from, to)` pair for the side to move.
    pub fn all_legal_moves(&mut self) -> Vec<(Square, Square)> {
        legality::all_legal_moves(&mut self.board, self.side_to_move, self.castling)
    }

    pub fn is_king_in_check(&self, side: Side) -> bool {
        legality::is_king_in_check(&self.board, side)
    }

    pub fn is_checkmate(&mut self, side: Side) -> bool {
        legality::is_checkmate(&mut self.board, side, self.castling)
    }

    pub fn is_stalemate(&mut self, side: Side) -> bool {
        legality::is_stalemate(&mut self.board, side, self.castling)
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Play `from → to` for the side to move.
    ///
    /// Nothing is mutated when an error is returned.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
        if self.terminal.is_game_over() {
            tracing::warn!(%from, %to, terminal = %self.terminal, "move rejected: game is over");
            return Err(ChessError::GameOver(self.terminal));
        }

        let side = self.side_to_move;
        let Some(kind) = self
            .board
            .get(from)
            .filter(|p| p.side == side)
            .map(|p| p.kind)
        else {
            tracing::warn!(%from, %side, "move rejected: no piece of the side to move");
            return Err(ChessError::NoPieceOrWrongTurn(from));
        };

        if !self.legal_moves(from).contains(&to) {
            tracing::warn!(%from, %to, %side, "move rejected: illegal");
            return Err(ChessError::IllegalMove { from, to });
        }

        // --- Relocate ---
        let rook_squares = match kind {
            PieceKind::King => movegen::castling_rook_squares(from, to),
            _ => None,
        };
        let castled = rook_squares.is_some();
        let captured = match rook_squares {
            Some((rook_from, rook_to)) => {
                self.relocate(from, to);
                self.relocate(rook_from, rook_to);
                None
            }
            None => self.relocate(from, to).map(|p| p.kind),
        };

        // --- Promotion (always to a queen) ---
        let promoted = kind == PieceKind::Pawn && to.rank() == side.promotion_rank();
        if promoted {
            self.board.set(to, Some(Piece::moved(PieceKind::Queen, side)));
        }

        // --- Turn and clocks ---
        if kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if side == Side::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !side;
        self.terminal = self.evaluate_terminal();

        let outcome = MoveOutcome {
            from,
            to,
            piece: kind,
            captured,
            castled,
            promoted,
            terminal: self.terminal,
        };
        let uci = notation::format_uci_move(from, to, promoted);
        tracing::info!(
            %side,
            mv = %uci,
            captured = ?captured,
            castled,
            promoted,
            terminal = %self.terminal,
            "move applied"
        );
        if self.terminal.is_game_over() {
            tracing::info!(result = %self.terminal, moves = self.history.len() + 1, "game over");
        }

        self.history.push(MoveRecord {
            uci,
            side,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Parse UCI move text and play it.
    pub fn apply_uci(&mut self, text: &str) -> Result<MoveOutcome, ChessError> {
        let (from, to) = notation::parse_uci_move(text)?;
        if notation::has_promotion_suffix(text)
            && !self
                .board
                .get(from)
                .is_some_and(|p| p.kind == PieceKind::Pawn)
        {
            tracing::warn!(mv = text.trim(), "move rejected: promotion suffix on a non-pawn move");
            return Err(ChessError::InvalidMoveText(text.trim().to_string()));
        }
        self.apply_move(from, to)
    }

    /// Move the piece on `from` to `to`, marking it moved. Returns the
    /// previous occupant of `to`.
    fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut mover = self.board.take(from);
        if let Some(piece) = mover.as_mut() {
            piece.has_moved = true;
        }
        self.board.replace(to, mover)
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn evaluate_terminal(&mut self) -> TerminalResult {
        let side = self.side_to_move;
        let in_check = legality::is_king_in_check(&self.board, side);
        let can_move = legality::has_any_legal_move(&mut self.board, side, self.castling);

        match (in_check, can_move) {
            (true, false) => TerminalResult::Checkmate { winner: !side },
            (true, true) => TerminalResult::Check(side),
            (false, false) => TerminalResult::Stalemate,
            (false, true) => TerminalResult::None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
