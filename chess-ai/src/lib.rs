//! 国际象棋 AI 引擎
//!
//! 包含:
//! - 子力评估函数
//! - Minimax + Alpha-Beta 搜索
//! - 根节点走法选择（同分随机）
//! - 后台搜索任务

mod config;
mod engine;
mod error;
mod evaluate;
mod rules;
mod search;
mod worker;

#[cfg(test)]
mod testing;

pub use config::{AiConfig, Difficulty};
pub use engine::{best_move, select, AiEngine, Selection};
pub use error::{ConfigError, SearchError};
pub use evaluate::{Evaluator, DRAW_SCORE, MATE_SCORE, REFERENCE_SIDE};
pub use rules::{MoveGuard, Rules};
pub use search::{Role, SearchStats, Searcher, INFINITY};
pub use worker::{spawn_best_move, SearchTask};
