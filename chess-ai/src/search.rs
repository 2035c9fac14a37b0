//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝

use crate::error::SearchError;
use crate::evaluate::Evaluator;
use crate::rules::{MoveGuard, Rules};

/// 搜索窗口的无穷大（取 `i32::MAX`，使正负对称）
pub const INFINITY: i32 = i32::MAX;

/// 当前层代表哪一方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// 追求白方视角的最大分值
    Maximizing,
    /// 追求白方视角的最小分值
    Minimizing,
}

impl Role {
    /// 下一层的角色
    pub fn opposite(self) -> Role {
        match self {
            Role::Maximizing => Role::Minimizing,
            Role::Minimizing => Role::Maximizing,
        }
    }
}

/// 搜索统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// 访问的节点数
    pub nodes: u64,
    /// 剪枝次数
    pub cutoffs: u64,
}

/// Alpha-Beta 搜索器
#[derive(Debug, Default)]
pub struct Searcher {
    stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累计的搜索统计
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// 清空统计
    pub fn reset(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Alpha-Beta 搜索
    ///
    /// 返回值与同深度的完整 Minimax 相同，剪枝只减少访问的节点。
    /// 返回前局面总是恢复到调用时的状态。
    pub fn search<R: Rules>(
        &mut self,
        position: &mut R,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        role: Role,
    ) -> Result<i32, SearchError> {
        self.stats.nodes += 1;

        let status = position.status();
        if depth == 0 || status.is_over() {
            return Ok(Evaluator::evaluate_with_status(position, status));
        }

        let moves = position.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::NoMovesInLivePosition { status });
        }

        match role {
            Role::Maximizing => {
                let mut best = -INFINITY;
                for mv in moves {
                    let mut guard = MoveGuard::enter(position, mv)?;
                    let score = self.search(&mut *guard, depth - 1, alpha, beta, role.opposite())?;
                    guard.release()?;

                    best = best.max(score);
                    alpha = alpha.max(score);
                    if beta <= alpha {
                        self.stats.cutoffs += 1;
                        break; // Beta 剪枝
                    }
                }
                Ok(best)
            }
            Role::Minimizing => {
                let mut best = INFINITY;
                for mv in moves {
                    let mut guard = MoveGuard::enter(position, mv)?;
                    let score = self.search(&mut *guard, depth - 1, alpha, beta, role.opposite())?;
                    guard.release()?;

                    best = best.min(score);
                    beta = beta.min(score);
                    if beta <= alpha {
                        self.stats.cutoffs += 1;
                        break; // Alpha 剪枝
                    }
                }
                Ok(best)
            }
        }
    }
}
