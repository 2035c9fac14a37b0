//! 错误类型定义

use protocol::{ChessError, GameStatus};
use thiserror::Error;

/// 搜索错误
///
/// 除 `WorkerLost` 外都表示规则引擎违反了约定，搜索会立即中止。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// 规则引擎拒绝了自己生成的合法走法
    #[error("Rules engine rejected its own legal move {mv}: {source}")]
    MoveRejected { mv: String, source: ChessError },

    /// 撤销走法失败
    #[error("Undo failed after {mv}: {source}")]
    UndoFailed { mv: String, source: ChessError },

    /// 撤销后局面与执行前不一致
    #[error("Undo after {mv} did not restore the position (key {expected:#018x}, got {actual:#018x})")]
    UndoMismatch { mv: String, expected: u64, actual: u64 },

    /// 局面未结束却没有合法走法
    #[error("Position is {status} but has no legal moves")]
    NoMovesInLivePosition { status: GameStatus },

    /// 局面已结束却仍有合法走法
    #[error("Position is {status} but still reports {count} legal moves")]
    MovesInFinishedPosition { status: GameStatus, count: usize },

    /// 后台搜索线程异常退出
    #[error("Search worker lost: {reason}")]
    WorkerLost { reason: String },
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON 解析错误
    #[error("Invalid AI config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// 搜索深度无效
    #[error("max_depth must be at least 1, got {0}")]
    InvalidDepth(u8),
}
