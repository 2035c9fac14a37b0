//! 国际象棋规则库
//!
//! 包含:
//! - 棋子、棋盘、格子等核心数据结构
//! - 走法生成和规则验证（易位、吃过路兵、升变）
//! - 可撤销的走法执行
//! - 将死、逼和与规则和棋判定
//! - FEN 格式与 Zobrist 哈希

mod board;
mod constants;
mod error;
mod fen;
mod moves;
mod piece;
mod status;
mod zobrist;

pub use board::{Board, BoardState, CastlingRights};
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator};
pub use piece::{Piece, PieceType, Side, Square};
pub use status::{DrawReason, GameStatus};
pub use zobrist::ZobristTable;
