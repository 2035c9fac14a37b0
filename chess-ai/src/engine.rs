//! 走法选择
//!
//! 在根节点逐一展开全部合法走法（不剪枝），对每个走法做 Alpha-Beta 搜索，
//! 再从得分最高的同分走法中随机挑选一个。

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::{AiConfig, Difficulty};
use crate::error::SearchError;
use crate::rules::{MoveGuard, Rules};
use crate::search::{Role, SearchStats, Searcher, INFINITY};

/// 根节点的选择结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<M> {
    /// 选中的走法
    pub mv: M,
    /// 该走法的搜索分值（白方视角）
    pub score: i32,
    /// 同分走法的数量
    pub tied: usize,
}

/// 为走子方选择一个走法
///
/// 没有合法走法时返回 `Ok(None)`。同分走法由 `rng` 均匀选择。
///
/// 根节点总是取白方视角的最高分，即使走子方是黑方。
pub fn best_move<R, G>(position: &mut R, depth: u8, rng: &mut G) -> Result<Option<R::Move>, SearchError>
where
    R: Rules,
    G: Rng + ?Sized,
{
    let mut searcher = Searcher::new();
    Ok(select(&mut searcher, position, depth, rng)?.map(|selection| selection.mv))
}

/// 根节点搜索，返回选中的走法及其分值
///
/// `depth` 为 0 时按 1 处理。
pub fn select<R, G>(
    searcher: &mut Searcher,
    position: &mut R,
    depth: u8,
    rng: &mut G,
) -> Result<Option<Selection<R::Move>>, SearchError>
where
    R: Rules,
    G: Rng + ?Sized,
{
    let moves = position.legal_moves();
    if moves.is_empty() {
        return Ok(None);
    }

    let status = position.status();
    if status.is_checkmate() || status.is_stalemate() {
        return Err(SearchError::MovesInFinishedPosition {
            status,
            count: moves.len(),
        });
    }

    // 走完一步后轮到对手，子搜索从对手一层开始
    let child_depth = depth.saturating_sub(1);
    let mut best_score = -INFINITY;
    let mut tie_set: Vec<R::Move> = Vec::new();

    for mv in moves {
        let mut guard = MoveGuard::enter(position, mv)?;
        let score = searcher.search(&mut *guard, child_depth, -INFINITY, INFINITY, Role::Minimizing)?;
        guard.release()?;

        debug!(%mv, score, "根节点候选");

        if score > best_score {
            best_score = score;
            tie_set.clear();
            tie_set.push(mv);
        } else if score == best_score {
            tie_set.push(mv);
        }
    }

    Ok(tie_set.choose(rng).map(|mv| Selection {
        mv: *mv,
        score: best_score,
        tied: tie_set.len(),
    }))
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    searcher: Searcher,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            searcher: Searcher::new(),
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 按配置的深度搜索最佳走法
    pub fn best_move<R: Rules>(&mut self, position: &mut R) -> Result<Option<R::Move>, SearchError> {
        self.best_move_at_depth(position, self.config.max_depth)
    }

    /// 按指定深度搜索最佳走法
    pub fn best_move_at_depth<R: Rules>(
        &mut self,
        position: &mut R,
        depth: u8,
    ) -> Result<Option<R::Move>, SearchError> {
        Ok(self.select_at_depth(position, depth)?.map(|selection| selection.mv))
    }

    /// 按指定深度搜索，返回完整的选择结果
    pub fn select_at_depth<R: Rules>(
        &mut self,
        position: &mut R,
        depth: u8,
    ) -> Result<Option<Selection<R::Move>>, SearchError> {
        self.searcher.reset();
        let started_at = Instant::now();

        let result = select(&mut self.searcher, position, depth, &mut self.rng);
        let stats = self.searcher.stats();

        match &result {
            Ok(Some(selection)) => info!(
                mv = %selection.mv,
                score = selection.score,
                tied = selection.tied,
                depth,
                nodes = stats.nodes,
                cutoffs = stats.cutoffs,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "AI 选定走法"
            ),
            Ok(None) => info!(side = ?position.side_to_move(), "无合法走法，对局已结束"),
            Err(err) => warn!(error = %err, nodes = stats.nodes, "搜索中止：规则引擎违反约定"),
        }

        result
    }

    /// 上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.searcher.stats().nodes
    }

    /// 上一次搜索的统计
    pub fn stats(&self) -> SearchStats {
        self.searcher.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::MATE_SCORE;
    use crate::testing::{state, Fault, FaultyRules};
    use protocol::{BoardState, Move};
    use std::collections::HashSet;

    fn uci(text: &str) -> Move {
        Move::from_uci(text).unwrap()
    }

    fn seeded(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_search_initial_position() {
        let mut position = BoardState::initial();
        let mut engine = AiEngine::new(AiConfig::from_difficulty(Difficulty::Medium).with_seed(1));

        let mv = engine.best_move(&mut position).unwrap().unwrap();
        assert!(position.legal_moves().contains(&mv));
        assert!(engine.nodes_searched() > 20);
        assert_eq!(position, BoardState::initial());
    }

    #[test]
    fn test_no_legal_moves_returns_none() {
        // 将死与逼和
        for fen in [
            "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1",
            "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
        ] {
            let mut position = state(fen);
            for depth in 1..=3 {
                assert_eq!(best_move(&mut position, depth, &mut seeded(0)), Ok(None));
            }
        }
    }

    #[test]
    fn test_none_iff_no_legal_moves() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1",
            "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
            "4k3/8/8/8/8/8/8/4KN2 w - - 0 1",
            "k7/8/8/8/8/8/8/1R5K b - - 0 1",
        ];
        for fen in fens {
            let mut position = state(fen);
            let has_moves = !position.legal_moves().is_empty();
            let chosen = best_move(&mut position, 2, &mut seeded(3)).unwrap();
            assert_eq!(chosen.is_some(), has_moves, "{}", fen);
        }
    }

    #[test]
    fn test_returned_move_is_legal() {
        let fens = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq d3 0 3",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "8/4P3/8/8/8/8/k7/4K3 w - - 0 1",
        ];
        for fen in fens {
            for seed in 0..3 {
                let mut position = state(fen);
                let legal = position.legal_moves();
                let mv = best_move(&mut position, 2, &mut seeded(seed)).unwrap().unwrap();
                assert!(legal.contains(&mv), "{} not legal in {}", mv, fen);
                assert_eq!(position, state(fen));
            }
        }
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Ra8# 是唯一的将杀
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        for depth in 2..=3 {
            for seed in 0..4 {
                let mut position = state(fen);
                let mut searcher = Searcher::new();
                let selection = select(&mut searcher, &mut position, depth, &mut seeded(seed))
                    .unwrap()
                    .unwrap();
                assert_eq!(selection.mv, uci("a1a8"));
                assert_eq!(selection.score, MATE_SCORE);
                assert_eq!(selection.tied, 1);
            }
        }
    }

    #[test]
    fn test_single_legal_move() {
        let fen = "k7/8/8/8/8/8/8/1R5K b - - 0 1";
        assert_eq!(state(fen).legal_moves(), vec![uci("a8a7")]);

        for depth in 0..=4 {
            let mut position = state(fen);
            let mv = best_move(&mut position, depth, &mut seeded(9)).unwrap();
            assert_eq!(mv, Some(uci("a8a7")), "depth {}", depth);
        }
    }

    #[test]
    fn test_tie_break_is_seeded() {
        let mut searcher = Searcher::new();
        let mut position = BoardState::initial();
        let selection = select(&mut searcher, &mut position, 1, &mut seeded(5))
            .unwrap()
            .unwrap();
        // 第一步无法吃子，20 个走法全部同分
        assert_eq!(selection.score, 0);
        assert_eq!(selection.tied, 20);

        let first = best_move(&mut position, 1, &mut seeded(11)).unwrap();
        let second = best_move(&mut position, 1, &mut seeded(11)).unwrap();
        assert_eq!(first, second);

        let a = AiEngine::new(AiConfig::from_difficulty(Difficulty::Easy).with_seed(99))
            .best_move(&mut position)
            .unwrap();
        let b = AiEngine::new(AiConfig::from_difficulty(Difficulty::Easy).with_seed(99))
            .best_move(&mut position)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tie_break_varies_with_seed() {
        let mut position = BoardState::initial();
        let legal = position.legal_moves();

        let chosen: HashSet<Move> = (0..32)
            .map(|seed| best_move(&mut position, 1, &mut seeded(seed)).unwrap().unwrap())
            .collect();

        assert!(chosen.len() > 1);
        assert!(chosen.iter().all(|mv| legal.contains(mv)));
    }

    #[test]
    fn test_root_always_maximizes_white_score() {
        // 黑方走：Qxa1 能白得一个后，但根节点按白方视角取最高分，
        // 因此会避开这步吃子。这是保留的已知行为。
        let mut position = state("7k/8/8/8/8/8/1q6/Q6K b - - 0 1");
        let mut searcher = Searcher::new();
        assert!(position.legal_moves().contains(&uci("b2a1")));

        for seed in 0..8 {
            let selection = select(&mut searcher, &mut position, 1, &mut seeded(seed))
                .unwrap()
                .unwrap();
            assert_ne!(selection.mv, uci("b2a1"));
            assert_eq!(selection.score, 0);
        }
    }

    #[test]
    fn test_rejected_root_move() {
        let mut position = FaultyRules::new(BoardState::initial(), Fault::RejectApply);
        let err = best_move(&mut position, 2, &mut seeded(0)).unwrap_err();
        assert!(matches!(err, SearchError::MoveRejected { .. }));
    }

    #[test]
    fn test_broken_undo_at_root() {
        let mut position = FaultyRules::new(BoardState::initial(), Fault::SkipUndo);
        let err = best_move(&mut position, 1, &mut seeded(0)).unwrap_err();
        assert!(matches!(err, SearchError::UndoMismatch { .. }));
    }

    #[test]
    fn test_moves_in_finished_position() {
        let mut position = FaultyRules::new(BoardState::initial(), Fault::ClaimCheckmate);
        let err = best_move(&mut position, 1, &mut seeded(0)).unwrap_err();
        assert_eq!(
            err,
            SearchError::MovesInFinishedPosition {
                status: protocol::GameStatus::Checkmate {
                    loser: protocol::Side::White
                },
                count: 20,
            }
        );
    }

    #[test]
    fn test_no_moves_at_root_is_terminal_signal() {
        let mut position = FaultyRules::new(BoardState::initial(), Fault::NoMoves);
        assert_eq!(best_move(&mut position, 2, &mut seeded(0)), Ok(None));
    }
}
