//! 后台搜索
//!
//! 搜索是同步、阻塞的，交互场景应放在阻塞线程池中运行，只把最终走法带回来。
//! 放弃搜索时直接丢弃 [`SearchTask`]：搜索线程会跑完，但结果被丢弃；
//! 传入的局面副本不会交还给调用方。

use std::time::{Duration, Instant};

use protocol::{BoardState, Move};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::AiConfig;
use crate::engine::AiEngine;
use crate::error::SearchError;

/// 后台搜索任务
pub struct SearchTask {
    handle: JoinHandle<Result<Option<Move>, SearchError>>,
    started_at: Instant,
}

/// 在 tokio 阻塞线程池中为 `state` 的走子方搜索走法
///
/// 必须在 tokio 运行时内调用。
pub fn spawn_best_move(mut state: BoardState, config: AiConfig) -> SearchTask {
    info!(
        difficulty = ?config.difficulty,
        depth = config.max_depth,
        side = ?state.current_turn,
        "AI 开始思考..."
    );

    let handle = tokio::task::spawn_blocking(move || {
        let mut engine = AiEngine::new(config);
        engine.best_move(&mut state)
    });

    SearchTask {
        handle,
        started_at: Instant::now(),
    }
}

impl SearchTask {
    /// 搜索是否已结束（不阻塞）
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// 思考时长
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// 等待搜索结果
    pub async fn outcome(self) -> Result<Option<Move>, SearchError> {
        let elapsed = self.started_at.elapsed();
        match self.handle.await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, ?elapsed, "AI 搜索线程异常退出");
                Err(SearchError::WorkerLost {
                    reason: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::testing::state;

    #[tokio::test]
    async fn test_background_search() {
        let position = BoardState::initial();
        let task = spawn_best_move(
            position.clone(),
            AiConfig::from_difficulty(Difficulty::Medium).with_seed(3),
        );

        let mv = task.outcome().await.unwrap().unwrap();
        assert!(position.legal_moves().contains(&mv));
    }

    #[tokio::test]
    async fn test_background_search_matches_sync() {
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        let config = AiConfig::from_difficulty(Difficulty::Medium).with_seed(8);

        let background = spawn_best_move(state(fen), config.clone()).outcome().await.unwrap();
        let sync = AiEngine::new(config).best_move(&mut state(fen)).unwrap();

        assert_eq!(background, sync);
        assert_eq!(background, Some(Move::from_uci("a1a8").unwrap()));
    }

    #[tokio::test]
    async fn test_background_search_terminal() {
        let task = spawn_best_move(
            state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1"),
            AiConfig::from_difficulty(Difficulty::Easy),
        );
        assert_eq!(task.outcome().await, Ok(None));
    }

    #[tokio::test]
    async fn test_task_finishes() {
        let task = spawn_best_move(
            state("k7/8/8/8/8/8/8/1R5K b - - 0 1"),
            AiConfig::from_difficulty(Difficulty::Easy),
        );

        while !task.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(task.elapsed() > Duration::ZERO);
        assert_eq!(
            task.outcome().await,
            Ok(Some(Move::from_uci("a8a7").unwrap()))
        );
    }

    #[tokio::test]
    async fn test_abandoned_search() {
        let position = BoardState::initial();
        let task = spawn_best_move(position.clone(), AiConfig::from_difficulty(Difficulty::Easy));
        drop(task);

        // 调用方的局面不受影响，可以立即开始新的搜索
        let mv = spawn_best_move(position.clone(), AiConfig::from_difficulty(Difficulty::Easy))
            .outcome()
            .await
            .unwrap();
        assert!(mv.is_some());
        assert_eq!(position, BoardState::initial());
    }
}
