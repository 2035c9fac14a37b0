//! 对局状态（将死、逼和、和棋）

use serde::{Deserialize, Serialize};

use crate::piece::Side;

/// 和棋原因（不含逼和，逼和单独作为 `GameStatus::Stalemate`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    /// 子力不足以将死
    InsufficientMaterial,
    /// 75 步规则
    SeventyFiveMoveRule,
    /// 五次重复局面
    FivefoldRepetition,
}

/// 当前局面的对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// 对局进行中
    Ongoing,
    /// 走子方被将死
    Checkmate {
        /// 被将死的一方（即走子方）
        loser: Side,
    },
    /// 走子方无子可动且未被将军
    Stalemate,
    /// 规则判和
    Draw(DrawReason),
}

impl GameStatus {
    /// 对局是否结束
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self, GameStatus::Checkmate { .. })
    }

    pub fn is_stalemate(&self) -> bool {
        matches!(self, GameStatus::Stalemate)
    }

    /// 规则和棋（不含逼和）
    pub fn is_draw(&self) -> bool {
        matches!(self, GameStatus::Draw(_))
    }

    /// 胜方（仅将死时存在）
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameStatus::Checkmate { loser } => Some(loser.opponent()),
            _ => None,
        }
    }

    /// 状态提示文本
    pub fn message(&self) -> String {
        match self {
            GameStatus::Ongoing => String::new(),
            GameStatus::Checkmate { loser } => {
                format!("Checkmate! {} wins!", loser.opponent().name())
            }
            GameStatus::Stalemate => "Stalemate - Draw!".to_string(),
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                "Draw - Insufficient material".to_string()
            }
            GameStatus::Draw(DrawReason::SeventyFiveMoveRule) => "Draw - 75 move rule".to_string(),
            GameStatus::Draw(DrawReason::FivefoldRepetition) => {
                "Draw - Fivefold repetition".to_string()
            }
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Checkmate { loser } => write!(f, "checkmate ({} mated)", loser.name()),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(reason) => write!(f, "draw ({:?})", reason),
        }
    }
}
