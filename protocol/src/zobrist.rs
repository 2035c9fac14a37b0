//! Zobrist 哈希
//!
//! 用于重复局面判定，以及校验撤销走法后局面是否完全恢复

use std::sync::OnceLock;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::BoardState;
use crate::constants::{BOARD_SIZE, SQUARE_COUNT};
use crate::piece::{Piece, PieceType, Side, Square};

static GLOBAL_TABLE: OnceLock<ZobristTable> = OnceLock::new();

/// Zobrist 哈希表
///
/// 使用随机数为每个格子的每种棋子生成唯一的哈希值
pub struct ZobristTable {
    /// 棋子哈希值 [side][piece_type][square]
    pieces: [[[u64; SQUARE_COUNT]; 6]; 2],
    /// 黑方走子哈希值
    side_to_move: u64,
    /// 易位权哈希值（K Q k q）
    castling: [u64; 4],
    /// 过路兵所在列
    en_passant_file: [u64; BOARD_SIZE],
}

impl ZobristTable {
    /// 创建新的 Zobrist 表（使用固定种子保证确定性）
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF_CAFE_1234);

        let mut pieces = [[[0u64; SQUARE_COUNT]; 6]; 2];
        for side in pieces.iter_mut() {
            for piece in side.iter_mut() {
                for square in piece.iter_mut() {
                    *square = rng.gen();
                }
            }
        }

        let side_to_move = rng.gen();
        let castling = [rng.gen(), rng.gen(), rng.gen(), rng.gen()];
        let mut en_passant_file = [0u64; BOARD_SIZE];
        for file in en_passant_file.iter_mut() {
            *file = rng.gen();
        }

        Self {
            pieces,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    /// 全局共享的哈希表
    pub fn global() -> &'static ZobristTable {
        GLOBAL_TABLE.get_or_init(ZobristTable::new)
    }

    /// 计算局面的完整哈希值
    pub fn hash(&self, state: &BoardState) -> u64 {
        let mut hash = 0u64;

        for (square, piece) in state.board.all_pieces() {
            hash ^= self.piece_hash(piece.side, piece.piece_type, square);
        }

        if state.current_turn == Side::Black {
            hash ^= self.side_to_move;
        }

        for (flag, key) in state.castling.flags().iter().zip(self.castling) {
            if *flag {
                hash ^= key;
            }
        }

        if let Some(square) = state.en_passant.filter(|square| can_capture_en_passant(state, *square)) {
            hash ^= self.en_passant_file[square.x as usize];
        }

        hash
    }

    /// 获取棋子的哈希值
    #[inline]
    pub fn piece_hash(&self, side: Side, piece_type: PieceType, square: Square) -> u64 {
        self.pieces[side.index()][piece_type.index()][square.to_index()]
    }
}

/// 走子方是否有兵紧邻过路兵目标格的斜后方
///
/// 没有兵能吃过路兵时，过路兵标记不影响局面是否重复。
fn can_capture_en_passant(state: &BoardState, target: Square) -> bool {
    let side = state.current_turn;
    let pawn = Piece::new(PieceType::Pawn, side);
    [-1, 1].into_iter().any(|dx| {
        target
            .offset(dx, -side.pawn_direction())
            .is_some_and(|square| state.board.get(square) == Some(pawn))
    })
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
