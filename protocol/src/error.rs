//! 错误类型定义

use thiserror::Error;

use crate::piece::Square;

/// 国际象棋规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    /// 无效的位置
    #[error("Invalid square: ({x}, {y})")]
    InvalidSquare { x: i8, y: i8 },

    /// 无效的走法
    #[error("Invalid move: {from} -> {to}")]
    InvalidMove { from: Square, to: Square },

    /// 升变缺失或不合法
    #[error("Invalid promotion for move {from} -> {to}")]
    InvalidPromotion { from: Square, to: Square },

    /// 没有棋子
    #[error("No piece at {square}")]
    NoPiece { square: Square },

    /// 不是你的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 没有可以撤销的走法
    #[error("No move to undo")]
    NothingToUndo,

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 无效的 UCI 走法字符串
    #[error("Invalid UCI move: {text}")]
    InvalidUci { text: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
