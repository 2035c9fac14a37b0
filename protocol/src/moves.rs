//! 走法生成和验证

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardState};
use crate::error::ChessError;
use crate::piece::{Piece, PieceType, Side, Square};

/// 马的 8 个跳跃方向
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// 王的 8 个方向
const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格子
    pub from: Square,
    /// 目标格子
    pub to: Square,
    /// 升变棋子（如果有）
    pub promotion: Option<PieceType>,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// 创建升变走法
    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// UCI 格式，如 `e2e4`、`e7e8q`
    pub fn to_uci(&self) -> String {
        let mut text = format!("{}{}", self.from, self.to);
        if let Some(promotion) = self.promotion {
            text.push(promotion.to_lower_char());
        }
        text
    }

    /// 解析 UCI 格式走法
    pub fn from_uci(text: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidUci {
            text: text.to_string(),
        };

        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(invalid());
        }
        let from = Square::from_algebraic(&text[0..2]).map_err(|_| invalid())?;
        let to = Square::from_algebraic(&text[2..4]).map_err(|_| invalid())?;

        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_fen_char(c) {
                Some((piece_type, Side::Black)) if piece_type.is_promotion_target() => {
                    Some(piece_type)
                }
                _ => return Err(invalid()),
            },
        };

        Ok(Self { from, to, promotion })
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成走子方的所有伪合法走法（不考虑自身被将军）
    pub fn generate_pseudo_legal(state: &BoardState) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let side = state.current_turn;

        for (square, piece) in state.board.pieces(side) {
            Self::generate_piece_moves(state, square, piece, &mut moves);
        }

        moves
    }

    /// 生成走子方的所有合法走法（过滤掉会导致被将军的走法）
    pub fn generate_legal(state: &BoardState) -> Vec<Move> {
        Self::generate_pseudo_legal(state)
            .into_iter()
            .filter(|mv| Self::leaves_king_safe(state, *mv))
            .collect()
    }

    /// 是否存在至少一个合法走法
    pub fn has_legal_move(state: &BoardState) -> bool {
        Self::generate_pseudo_legal(state)
            .into_iter()
            .any(|mv| Self::leaves_king_safe(state, mv))
    }

    /// 模拟走法后，走子方的王是否安全
    fn leaves_king_safe(state: &BoardState, mv: Move) -> bool {
        let mut test_board = state.board;
        test_board.play(mv, state.en_passant);
        !Self::is_in_check(&test_board, state.current_turn)
    }

    /// 生成指定棋子的所有伪合法走法
    fn generate_piece_moves(state: &BoardState, square: Square, piece: Piece, moves: &mut Vec<Move>) {
        let board = &state.board;
        match piece.piece_type {
            PieceType::Pawn => Self::generate_pawn_moves(state, square, piece.side, moves),
            PieceType::Knight => {
                Self::generate_step_moves(board, square, piece.side, &KNIGHT_OFFSETS, moves)
            }
            PieceType::Bishop => {
                Self::generate_slider_moves(board, square, piece.side, &BISHOP_DIRECTIONS, moves)
            }
            PieceType::Rook => {
                Self::generate_slider_moves(board, square, piece.side, &ROOK_DIRECTIONS, moves)
            }
            PieceType::Queen => {
                Self::generate_slider_moves(board, square, piece.side, &ROOK_DIRECTIONS, moves);
                Self::generate_slider_moves(board, square, piece.side, &BISHOP_DIRECTIONS, moves);
            }
            PieceType::King => {
                Self::generate_step_moves(board, square, piece.side, &KING_OFFSETS, moves);
                Self::generate_castling_moves(state, square, piece.side, moves);
            }
        }
    }

    /// 生成兵的走法（前进、双步、吃子、吃过路兵、升变）
    fn generate_pawn_moves(state: &BoardState, square: Square, side: Side, moves: &mut Vec<Move>) {
        let board = &state.board;
        let forward = side.pawn_direction();

        if let Some(one) = square.offset(0, forward) {
            if board.get(one).is_none() {
                Self::push_pawn_move(square, one, side, moves);

                // 初始位置可以走两步
                if square.y == side.pawn_rank() {
                    if let Some(two) = square.offset(0, forward * 2) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(square, two));
                        }
                    }
                }
            }
        }

        for dx in [-1i8, 1i8] {
            if let Some(to) = square.offset(dx, forward) {
                match board.get(to) {
                    Some(target) if target.side != side => {
                        Self::push_pawn_move(square, to, side, moves)
                    }
                    None if state.en_passant == Some(to) => moves.push(Move::new(square, to)),
                    _ => {}
                }
            }
        }
    }

    /// 兵到达底线时展开为四种升变
    fn push_pawn_move(from: Square, to: Square, side: Side, moves: &mut Vec<Move>) {
        if to.y == side.promotion_rank() {
            for promotion in PieceType::PROMOTIONS {
                moves.push(Move::with_promotion(from, to, promotion));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    }

    /// 生成单步走法（马、王）
    fn generate_step_moves(
        board: &Board,
        square: Square,
        side: Side,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for (dx, dy) in offsets {
            if let Some(to) = square.offset(*dx, *dy) {
                Self::try_add_move(board, square, to, side, moves);
            }
        }
    }

    /// 生成滑行走法（象、车、后）
    fn generate_slider_moves(
        board: &Board,
        square: Square,
        side: Side,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for (dx, dy) in directions {
            let mut current = square;
            while let Some(to) = current.offset(*dx, *dy) {
                if let Some(target) = board.get(to) {
                    if target.side != side {
                        moves.push(Move::new(square, to));
                    }
                    break;
                }
                moves.push(Move::new(square, to));
                current = to;
            }
        }
    }

    /// 生成王车易位走法：有易位权、中间无子、王经过的格子不被攻击
    fn generate_castling_moves(state: &BoardState, square: Square, side: Side, moves: &mut Vec<Move>) {
        let board = &state.board;
        let back = side.back_rank();
        if square != Square::new_unchecked(4, back) {
            return;
        }

        let opponent = side.opponent();
        let rook = Some(Piece::new(PieceType::Rook, side));
        let empty = |xs: &[u8]| {
            xs.iter()
                .all(|x| board.get(Square::new_unchecked(*x, back)).is_none())
        };
        let safe = |xs: &[u8]| {
            xs.iter()
                .all(|x| !Self::is_square_attacked(board, Square::new_unchecked(*x, back), opponent))
        };

        if state.castling.king_side(side)
            && board.get(Square::new_unchecked(7, back)) == rook
            && empty(&[5, 6])
            && safe(&[4, 5, 6])
        {
            moves.push(Move::new(square, Square::new_unchecked(6, back)));
        }

        if state.castling.queen_side(side)
            && board.get(Square::new_unchecked(0, back)) == rook
            && empty(&[1, 2, 3])
            && safe(&[4, 3, 2])
        {
            moves.push(Move::new(square, Square::new_unchecked(2, back)));
        }
    }

    /// 尝试添加走法（检查目标格是否可以移动）
    fn try_add_move(board: &Board, from: Square, to: Square, side: Side, moves: &mut Vec<Move>) {
        match board.get(to) {
            Some(target) if target.side == side => {}
            _ => moves.push(Move::new(from, to)),
        }
    }

    /// 检查指定阵营是否被将军
    pub fn is_in_check(board: &Board, side: Side) -> bool {
        match board.find_king(side) {
            Some(king) => Self::is_square_attacked(board, king, side.opponent()),
            None => false, // 没有王，视为不被将军
        }
    }

    /// 检查格子是否被指定阵营攻击
    pub fn is_square_attacked(board: &Board, square: Square, by: Side) -> bool {
        let is = |to: Option<Square>, piece_type: PieceType| {
            to.and_then(|s| board.get(s)) == Some(Piece::new(piece_type, by))
        };

        // 兵从反方向斜前方攻击
        let back = -by.pawn_direction();
        if is(square.offset(-1, back), PieceType::Pawn) || is(square.offset(1, back), PieceType::Pawn)
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|(dx, dy)| is(square.offset(*dx, *dy), PieceType::Knight))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|(dx, dy)| is(square.offset(*dx, *dy), PieceType::King))
        {
            return true;
        }

        Self::slider_attacks(board, square, by, &ROOK_DIRECTIONS, PieceType::Rook)
            || Self::slider_attacks(board, square, by, &BISHOP_DIRECTIONS, PieceType::Bishop)
    }

    /// 沿方向查找第一个棋子，判断是否为对应滑行子或后
    fn slider_attacks(
        board: &Board,
        square: Square,
        by: Side,
        directions: &[(i8, i8)],
        slider: PieceType,
    ) -> bool {
        for (dx, dy) in directions {
            let mut current = square;
            while let Some(next) = current.offset(*dx, *dy) {
                if let Some(piece) = board.get(next) {
                    if piece.side == by
                        && (piece.piece_type == slider || piece.piece_type == PieceType::Queen)
                    {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }
        false
    }
}
