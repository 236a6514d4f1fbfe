pub mod attacks;
pub mod board;
pub mod fen;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod notation;
pub mod types;

pub use board::Board;
pub use fen::FenPosition;
pub use game::{GameState, MoveRecord};
pub use legality::{all_legal_moves, is_king_in_check, legal_moves};
pub use notation::{format_uci_move, parse_uci_move};
pub use types::*;
