//! 棋局评估函数

use protocol::{GameStatus, Piece, Side, Square};

use crate::rules::Rules;

/// 将死分值
pub const MATE_SCORE: i32 = 20_000;

/// 和棋（含逼和）分值
pub const DRAW_SCORE: i32 = 0;

/// 分值为正时占优的一方
pub const REFERENCE_SIDE: Side = Side::White;

/// 评估器
///
/// 只计算子力，不考虑位置、机动性或王的安全。
pub struct Evaluator;

impl Evaluator {
    /// 评估局面（白方视角，正值对白方有利）
    pub fn evaluate<R: Rules + ?Sized>(position: &R) -> i32 {
        Self::evaluate_with_status(position, position.status())
    }

    /// 使用已知的对局状态评估，避免重复生成走法
    pub fn evaluate_with_status<R: Rules + ?Sized>(position: &R, status: GameStatus) -> i32 {
        match status {
            // 被将死的是走子方
            GameStatus::Checkmate { .. } => {
                if position.side_to_move() == REFERENCE_SIDE {
                    -MATE_SCORE
                } else {
                    MATE_SCORE
                }
            }
            GameStatus::Stalemate | GameStatus::Draw(_) => DRAW_SCORE,
            GameStatus::Ongoing => Self::evaluate_material(&position.occupancy()),
        }
    }

    /// 子力差（白方减黑方）
    pub fn evaluate_material(pieces: &[(Square, Piece)]) -> i32 {
        pieces
            .iter()
            .map(|(_, piece)| match piece.side {
                REFERENCE_SIDE => piece.value(),
                _ => -piece.value(),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::state;
    use protocol::BoardState;

    #[test]
    fn test_initial_evaluation() {
        let position = BoardState::initial();
        assert_eq!(Evaluator::evaluate(&position), 0);
    }

    #[test]
    fn test_material_advantage() {
        // 黑方少一个后
        let position = state("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(Evaluator::evaluate(&position), 900);

        // 白方少一个车和一个兵
        let position = state("rnbqkbnr/pppppppp/8/8/8/8/1PPPPPPP/1NBQKBNR w Kkq - 0 1");
        assert_eq!(Evaluator::evaluate(&position), -600);
    }

    #[test]
    fn test_material_sum() {
        let position = state("4k3/8/8/8/8/8/8/RNB1K3 w - - 0 1");
        let pieces = position.board.all_pieces();
        assert_eq!(Evaluator::evaluate_material(&pieces), 500 + 320 + 330);
    }

    #[test]
    fn test_black_checkmated() {
        let position = state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(Evaluator::evaluate(&position), MATE_SCORE);
    }

    #[test]
    fn test_white_checkmated() {
        // 白方被将死时，即使白方子力占优也是 -20000
        let position = state("3k4/8/8/8/8/8/QQQ2PPP/4r1K1 w - - 0 1");
        assert!(position.is_checkmate());
        assert_eq!(Evaluator::evaluate(&position), -MATE_SCORE);
    }

    #[test]
    fn test_stalemate_is_zero() {
        // 白方多一个后，但黑方被逼和
        let position = state("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(Evaluator::evaluate(&position), DRAW_SCORE);
    }

    #[test]
    fn test_draw_is_zero() {
        // 王马对王：子力上白方多 320，但已判和
        let position = state("4k3/8/8/8/8/8/8/4KN2 w - - 0 1");
        assert_eq!(Evaluator::evaluate(&position), DRAW_SCORE);
        assert_eq!(Evaluator::evaluate_material(&position.occupancy()), 320);
    }

    #[test]
    fn test_evaluate_does_not_mutate() {
        let position = state("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let before = position.clone();
        let _ = Evaluator::evaluate(&position);
        assert_eq!(position, before);
    }
}
