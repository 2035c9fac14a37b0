//! 规则引擎接口
//!
//! 搜索只通过 [`Rules`] 访问局面：枚举合法走法、执行与撤销走法、
//! 查询对局状态和棋子分布。[`MoveGuard`] 把执行/撤销包装成作用域，
//! 保证任何退出路径上都会撤销走法。

use std::fmt;
use std::ops::{Deref, DerefMut};

use protocol::{BoardState, ChessError, GameStatus, Move, Piece, Side, Square};

use crate::error::SearchError;

/// 搜索所需的规则引擎能力
pub trait Rules {
    /// 走法类型
    type Move: Copy + PartialEq + fmt::Debug + fmt::Display;

    /// 走子方的全部合法走法
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// 原地执行走法
    fn apply(&mut self, mv: Self::Move) -> Result<(), ChessError>;

    /// 撤销最近一次 `apply`
    fn undo(&mut self) -> Result<(), ChessError>;

    /// 对局状态
    fn status(&self) -> GameStatus;

    /// 走子方
    fn side_to_move(&self) -> Side;

    /// 所有棋子及其所在格子
    fn occupancy(&self) -> Vec<(Square, Piece)>;

    /// 局面哈希，用于校验撤销是否完全恢复局面
    fn position_key(&self) -> u64;

    fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    fn is_checkmate(&self) -> bool {
        self.status().is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.status().is_stalemate()
    }

    fn is_draw(&self) -> bool {
        self.status().is_draw()
    }
}

impl Rules for BoardState {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        BoardState::legal_moves(self)
    }

    fn apply(&mut self, mv: Move) -> Result<(), ChessError> {
        BoardState::apply(self, mv)
    }

    fn undo(&mut self) -> Result<(), ChessError> {
        BoardState::undo(self).map(|_| ())
    }

    fn status(&self) -> GameStatus {
        BoardState::status(self)
    }

    fn side_to_move(&self) -> Side {
        self.current_turn
    }

    fn occupancy(&self) -> Vec<(Square, Piece)> {
        self.board.all_pieces()
    }

    fn position_key(&self) -> u64 {
        self.zobrist_key()
    }
}

/// 已执行走法的作用域守卫
///
/// `release` 撤销走法并校验局面哈希；未调用 `release` 就被丢弃时
/// （`?` 提前返回或 panic），`Drop` 负责撤销。
pub struct MoveGuard<'a, R: Rules> {
    position: &'a mut R,
    mv: R::Move,
    key_before: u64,
    released: bool,
}

impl<'a, R: Rules> MoveGuard<'a, R> {
    /// 执行走法并返回守卫
    pub fn enter(position: &'a mut R, mv: R::Move) -> Result<Self, SearchError> {
        let key_before = position.position_key();
        position
            .apply(mv)
            .map_err(|source| SearchError::MoveRejected {
                mv: mv.to_string(),
                source,
            })?;

        Ok(Self {
            position,
            mv,
            key_before,
            released: false,
        })
    }

    /// 守卫对应的走法
    pub fn mv(&self) -> R::Move {
        self.mv
    }

    /// 撤销走法，并确认局面与执行前一致
    pub fn release(mut self) -> Result<(), SearchError> {
        self.released = true;
        self.position
            .undo()
            .map_err(|source| SearchError::UndoFailed {
                mv: self.mv.to_string(),
                source,
            })?;

        let actual = self.position.position_key();
        if actual != self.key_before {
            return Err(SearchError::UndoMismatch {
                mv: self.mv.to_string(),
                expected: self.key_before,
                actual,
            });
        }
        Ok(())
    }
}

impl<R: Rules> Deref for MoveGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.position
    }
}

impl<R: Rules> DerefMut for MoveGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.position
    }
}

impl<R: Rules> Drop for MoveGuard<'_, R> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.position.undo() {
            tracing::error!(mv = %self.mv, error = %err, "守卫释放时撤销走法失败");
        }
    }
}
