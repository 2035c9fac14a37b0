//! 棋盘状态

use crate::constants::{
    BOARD_SIZE, FIVEFOLD_REPETITION, SEVENTY_FIVE_MOVE_LIMIT, SQUARE_COUNT, STARTING_BISHOPS,
    STARTING_KNIGHTS, STARTING_PAWNS, STARTING_QUEENS, STARTING_ROOKS,
};
use crate::error::{ChessError, Result};
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Piece, PieceType, Side, Square};
use crate::status::{DrawReason, GameStatus};
use crate::zobrist::ZobristTable;

/// 棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// 8x8 棋盘，索引为 y * 8 + x（a1=0）
    squares: [Option<Piece>; SQUARE_COUNT],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: [None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for side in [Side::White, Side::Black] {
            for (x, piece_type) in back_rank.iter().enumerate() {
                board.set(
                    Square::new_unchecked(x as u8, side.back_rank()),
                    Some(Piece::new(*piece_type, side)),
                );
                board.set(
                    Square::new_unchecked(x as u8, side.pawn_rank()),
                    Some(Piece::new(PieceType::Pawn, side)),
                );
            }
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        if square.is_valid() {
            self.squares[square.to_index()]
        } else {
            None
        }
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.squares[square.to_index()] = piece;
        }
    }

    /// 移动棋子（不检查规则）
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 在棋盘上执行走法（不检查规则），处理王车易位、吃过路兵与升变
    ///
    /// 返回被吃棋子及其所在格子。
    pub fn play(&mut self, mv: Move, en_passant: Option<Square>) -> Option<(Square, Piece)> {
        let piece = self.get(mv.from)?;

        // 王横移两格即王车易位，同时移动车
        if piece.piece_type == PieceType::King && (mv.to.x as i8 - mv.from.x as i8).abs() == 2 {
            let (rook_from, rook_to) = if mv.to.x > mv.from.x {
                (7, 5)
            } else {
                (0, 3)
            };
            self.move_piece(
                Square::new_unchecked(rook_from, mv.from.y),
                Square::new_unchecked(rook_to, mv.from.y),
            );
        }

        let mut captured = self.get(mv.to).map(|p| (mv.to, p));

        // 斜走到空的过路兵格子即吃过路兵
        if piece.piece_type == PieceType::Pawn
            && mv.from.x != mv.to.x
            && captured.is_none()
            && en_passant == Some(mv.to)
        {
            let victim_square = Square::new_unchecked(mv.to.x, mv.from.y);
            captured = self.get(victim_square).map(|p| (victim_square, p));
            self.set(victim_square, None);
        }

        let placed = match mv.promotion {
            Some(promotion) => Piece::new(promotion, piece.side),
            None => piece,
        };
        self.set(mv.from, None);
        self.set(mv.to, Some(placed));

        captured
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, side: Side) -> Option<Square> {
        self.squares
            .iter()
            .enumerate()
            .find(|(_, piece)| *piece == &Some(Piece::new(PieceType::King, side)))
            .and_then(|(index, _)| Square::from_index(index))
    }

    /// 获取指定阵营的所有棋子
    pub fn pieces(&self, side: Side) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        let mut result = Vec::with_capacity(32);
        for (index, piece) in self.squares.iter().enumerate() {
            if let (Some(piece), Some(square)) = (piece, Square::from_index(index)) {
                result.push((square, *piece));
            }
        }
        result
    }

    /// 统计指定棋子的数量
    pub fn count(&self, piece: Piece) -> usize {
        self.squares.iter().filter(|p| **p == Some(piece)).count()
    }

    /// 子力不足以将死（仅剩王、王+单个轻子、或所有象同色）
    pub fn is_insufficient_material(&self) -> bool {
        let others: Vec<(Square, Piece)> = self
            .all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.piece_type != PieceType::King)
            .collect();

        if others.iter().any(|(_, piece)| {
            matches!(
                piece.piece_type,
                PieceType::Pawn | PieceType::Rook | PieceType::Queen
            )
        }) {
            return false;
        }

        if others.len() <= 1 {
            return true;
        }

        let all_bishops = others
            .iter()
            .all(|(_, piece)| piece.piece_type == PieceType::Bishop);
        all_bishops && {
            let first = others[0].0.is_light();
            others.iter().all(|(square, _)| square.is_light() == first)
        }
    }

    /// 计算指定阵营被吃掉的棋子（与初始子力对比，升变后的多余棋子不计）
    pub fn captured_pieces(&self, side: Side) -> Vec<PieceType> {
        let starting = [
            (PieceType::Pawn, STARTING_PAWNS),
            (PieceType::Knight, STARTING_KNIGHTS),
            (PieceType::Bishop, STARTING_BISHOPS),
            (PieceType::Rook, STARTING_ROOKS),
            (PieceType::Queen, STARTING_QUEENS),
        ];

        let mut captured = Vec::new();
        for (piece_type, count) in starting {
            let current = self.count(Piece::new(piece_type, side));
            let missing = count.saturating_sub(current);
            captured.extend(std::iter::repeat(piece_type).take(missing));
        }
        captured
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..BOARD_SIZE as u8).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..BOARD_SIZE as u8 {
                let c = self
                    .get(Square::new_unchecked(x, y))
                    .map(|p| p.display_char())
                    .unwrap_or('·');
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// 王车易位权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    /// 双方全部易位权
    pub fn all() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    /// 无易位权
    pub fn none() -> Self {
        Self::default()
    }

    pub fn king_side(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_king_side,
            Side::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_queen_side,
            Side::Black => self.black_queen_side,
        }
    }

    /// 取消一方的全部易位权（王已移动）
    pub fn revoke_side(&mut self, side: Side) {
        match side {
            Side::White => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            Side::Black => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
        }
    }

    /// 车的初始角格有棋子离开或被吃时，取消对应的易位权
    pub fn revoke_square(&mut self, square: Square) {
        match (square.x, square.y) {
            (0, 0) => self.white_queen_side = false,
            (7, 0) => self.white_king_side = false,
            (0, 7) => self.black_queen_side = false,
            (7, 7) => self.black_king_side = false,
            _ => {}
        }
    }

    /// 按 K Q k q 顺序展开
    pub fn flags(&self) -> [bool; 4] {
        [
            self.white_king_side,
            self.white_queen_side,
            self.black_king_side,
            self.black_queen_side,
        ]
    }
}

/// 撤销记录
#[derive(Debug, Clone, PartialEq, Eq)]
struct UndoRecord {
    mv: Move,
    board: Board,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    round: u32,
}

/// 完整的棋盘状态（包含走子方、易位权、步数等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub current_turn: Side,
    /// 王车易位权
    pub castling: CastlingRights,
    /// 吃过路兵目标格
    pub en_passant: Option<Square>,
    /// 半回合计数（无吃子、无兵走动，用于 75 步规则）
    pub halfmove_clock: u32,
    /// 完整回合数（黑方走完后 +1）
    pub round: u32,
    /// 走过的局面 Zobrist 哈希（不含当前局面），用于重复局面判定
    position_history: Vec<u64>,
    /// 撤销栈
    undo_stack: Vec<UndoRecord>,
}

impl BoardState {
    /// 创建初始状态
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            current_turn: Side::White,
            castling: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            round: 1,
            position_history: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    /// 从棋盘创建状态（无易位权、无过路兵）
    pub fn from_board(board: Board, current_turn: Side) -> Self {
        Self {
            board,
            current_turn,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            round: 1,
            position_history: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    /// 当前局面的 Zobrist 哈希
    pub fn zobrist_key(&self) -> u64 {
        ZobristTable::global().hash(self)
    }

    /// 执行走法
    ///
    /// 只做廉价的结构校验（起点棋子、走子方、目标格、升变、易位条件），
    /// 不重新生成全部合法走法。
    pub fn apply(&mut self, mv: Move) -> Result<()> {
        let piece = self
            .board
            .get(mv.from)
            .ok_or(ChessError::NoPiece { square: mv.from })?;
        if piece.side != self.current_turn {
            return Err(ChessError::NotYourTurn);
        }
        if mv.from == mv.to || !mv.to.is_valid() {
            return Err(ChessError::InvalidMove {
                from: mv.from,
                to: mv.to,
            });
        }
        if let Some(target) = self.board.get(mv.to) {
            if target.side == piece.side || target.piece_type == PieceType::King {
                return Err(ChessError::InvalidMove {
                    from: mv.from,
                    to: mv.to,
                });
            }
        }

        let reaches_last_rank =
            piece.piece_type == PieceType::Pawn && mv.to.y == piece.side.promotion_rank();
        let promotion_ok = match mv.promotion {
            Some(promotion) => reaches_last_rank && promotion.is_promotion_target(),
            None => !reaches_last_rank,
        };
        if !promotion_ok {
            return Err(ChessError::InvalidPromotion {
                from: mv.from,
                to: mv.to,
            });
        }

        if piece.piece_type == PieceType::King && (mv.to.x as i8 - mv.from.x as i8).abs() == 2 {
            self.validate_castling(mv, piece.side)?;
        }

        let key = self.zobrist_key();
        self.undo_stack.push(UndoRecord {
            mv,
            board: self.board,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            round: self.round,
        });
        self.position_history.push(key);

        let captured = self.board.play(mv, self.en_passant);

        // 兵走动或吃子时重置半回合计数
        if piece.piece_type == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if piece.piece_type == PieceType::King {
            self.castling.revoke_side(piece.side);
        }
        self.castling.revoke_square(mv.from);
        self.castling.revoke_square(mv.to);

        self.en_passant = if piece.piece_type == PieceType::Pawn
            && (mv.to.y as i8 - mv.from.y as i8).abs() == 2
        {
            mv.from.offset(0, piece.side.pawn_direction())
        } else {
            None
        };

        if piece.side == Side::Black {
            self.round += 1;
        }
        self.current_turn = self.current_turn.opponent();

        Ok(())
    }

    /// 撤销最近一步走法，恢复到执行前的完全相同状态
    pub fn undo(&mut self) -> Result<Move> {
        let record = self.undo_stack.pop().ok_or(ChessError::NothingToUndo)?;
        self.position_history.pop();

        self.board = record.board;
        self.castling = record.castling;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.round = record.round;
        self.current_turn = self.current_turn.opponent();

        Ok(record.mv)
    }

    /// 易位结构校验：王在初始位置、有易位权、车在角格
    fn validate_castling(&self, mv: Move, side: Side) -> Result<()> {
        let back = side.back_rank();
        let king_side = mv.to.x > mv.from.x;
        let has_right = if king_side {
            self.castling.king_side(side)
        } else {
            self.castling.queen_side(side)
        };
        let rook_square = Square::new_unchecked(if king_side { 7 } else { 0 }, back);
        let between: &[u8] = if king_side { &[5, 6] } else { &[1, 2, 3] };

        let ok = has_right
            && mv.from == Square::new_unchecked(4, back)
            && mv.to.y == back
            && self.board.get(rook_square) == Some(Piece::new(PieceType::Rook, side))
            && between
                .iter()
                .all(|x| self.board.get(Square::new_unchecked(*x, back)).is_none());
        if ok {
            Ok(())
        } else {
            Err(ChessError::InvalidMove {
                from: mv.from,
                to: mv.to,
            })
        }
    }

    /// 走子方是否被将军
    pub fn is_check(&self) -> bool {
        MoveGenerator::is_in_check(&self.board, self.current_turn)
    }

    /// 当前局面出现的次数（含当前）
    pub fn repetition_count(&self) -> usize {
        let key = self.zobrist_key();
        1 + self.position_history.iter().filter(|k| **k == key).count()
    }

    /// 计算对局状态
    ///
    /// 判定顺序：将死、逼和、子力不足、75 步规则、五次重复。
    pub fn status(&self) -> GameStatus {
        let has_moves = MoveGenerator::has_legal_move(self);

        if !has_moves && self.is_check() {
            return GameStatus::Checkmate {
                loser: self.current_turn,
            };
        }
        if !has_moves {
            return GameStatus::Stalemate;
        }
        if self.board.is_insufficient_material() {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if self.halfmove_clock >= SEVENTY_FIVE_MOVE_LIMIT {
            return GameStatus::Draw(DrawReason::SeventyFiveMoveRule);
        }
        if self.repetition_count() >= FIVEFOLD_REPETITION {
            return GameStatus::Draw(DrawReason::FivefoldRepetition);
        }

        GameStatus::Ongoing
    }

    /// 状态提示文本，对局进行中且被将军时为 "Check!"
    pub fn status_message(&self) -> String {
        match self.status() {
            GameStatus::Ongoing if self.is_check() => "Check!".to_string(),
            status => status.message(),
        }
    }

    /// 对局是否结束
    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    /// 合法走法
    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::generate_legal(self)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}
