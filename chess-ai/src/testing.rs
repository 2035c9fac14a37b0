//! 测试辅助：FEN 局面、无剪枝参考搜索、违反约定的规则引擎

use protocol::{BoardState, ChessError, Fen, GameStatus, Move, Piece, Side, Square};

use crate::evaluate::Evaluator;
use crate::rules::Rules;
use crate::search::Role;

pub fn state(fen: &str) -> BoardState {
    Fen::parse(fen).unwrap()
}

/// 不剪枝的完整 Minimax
pub fn minimax<R: Rules>(position: &mut R, depth: u8, role: Role) -> i32 {
    let status = position.status();
    if depth == 0 || status.is_over() {
        return Evaluator::evaluate_with_status(position, status);
    }

    let mut scores = Vec::new();
    for mv in position.legal_moves() {
        position.apply(mv).unwrap();
        scores.push(minimax(position, depth - 1, role.opposite()));
        position.undo().unwrap();
    }

    match role {
        Role::Maximizing => scores.into_iter().max().unwrap(),
        Role::Minimizing => scores.into_iter().min().unwrap(),
    }
}

/// 故障类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// 拒绝执行任何走法
    RejectApply,
    /// 撤销时什么都不做
    SkipUndo,
    /// 不返回任何走法，但状态仍为进行中
    NoMoves,
    /// 声称走子方已被将死，但仍返回走法
    ClaimCheckmate,
}

/// 按指定方式违反约定的规则引擎
pub struct FaultyRules {
    pub inner: BoardState,
    pub fault: Fault,
}

impl FaultyRules {
    pub fn new(inner: BoardState, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

impl Rules for FaultyRules {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        match self.fault {
            Fault::NoMoves => Vec::new(),
            _ => self.inner.legal_moves(),
        }
    }

    fn apply(&mut self, mv: Move) -> Result<(), ChessError> {
        match self.fault {
            Fault::RejectApply => Err(ChessError::InvalidMove {
                from: mv.from,
                to: mv.to,
            }),
            _ => self.inner.apply(mv),
        }
    }

    fn undo(&mut self) -> Result<(), ChessError> {
        match self.fault {
            Fault::SkipUndo => Ok(()),
            _ => self.inner.undo().map(|_| ()),
        }
    }

    fn status(&self) -> GameStatus {
        match self.fault {
            Fault::ClaimCheckmate => GameStatus::Checkmate {
                loser: self.inner.current_turn,
            },
            _ => self.inner.status(),
        }
    }

    fn side_to_move(&self) -> Side {
        self.inner.current_turn
    }

    fn occupancy(&self) -> Vec<(Square, Piece)> {
        self.inner.board.all_pieces()
    }

    fn position_key(&self) -> u64 {
        self.inner.zobrist_key()
    }
}
