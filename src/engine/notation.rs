//! UCI coordinate move text (`e2e4`, `e7e8q`).
//!
//! The external engine speaks this format. Pawns only ever promote to a
//! queen, so the optional fifth character must be `q`, and it is only
//! accepted on a one-step move onto the first or last rank.

use crate::engine::types::{ChessError, Square};

/// Parse `"e2e4"` or `"e7e8q"` into a square pair.
pub fn parse_uci_move(text: &str) -> Result<(Square, Square), ChessError> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(ChessError::InvalidMoveText(text.to_string()));
    }

    let from = Square::from_algebraic(&text[0..2])
        .ok_or_else(|| ChessError::InvalidMoveText(text.to_string()))?;
    let to = Square::from_algebraic(&text[2..4])
        .ok_or_else(|| ChessError::InvalidMoveText(text.to_string()))?;

    if let Some(promo) = text[4..].chars().next() {
        if !promo.eq_ignore_ascii_case(&'q') {
            return Err(ChessError::InvalidPromotion(promo));
        }
        if !is_promotion_shaped(from, to) {
            return Err(ChessError::InvalidMoveText(text.to_string()));
        }
    }

    Ok((from, to))
}

/// Does the text carry a promotion suffix? Only meaningful for text that
/// [`parse_uci_move`] accepted.
pub fn has_promotion_suffix(text: &str) -> bool {
    text.trim().len() == 5
}

/// A single step forward onto the far rank, for either side.
fn is_promotion_shaped(from: Square, to: Square) -> bool {
    let forward = matches!((from.rank(), to.rank()), (6, 7) | (1, 0));
    forward && from.file().abs_diff(to.file()) <= 1
}

/// Format a move as UCI text, appending `q` when it promoted.
pub fn format_uci_move(from: Square, to: Square, promoted: bool) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&from.to_algebraic());
    s.push_str(&to.to_algebraic());
    if promoted {
        s.push('q');
    }
    s
}
