//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::error::ChessError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 兵
    Pawn,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 车
    Rook,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceType {
    /// 可升变的棋子类型
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// 获取棋子的基础分值（用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 320,
            PieceType::Bishop => 330,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 20000,
        }
    }

    /// 类型索引 (0-5)
    pub fn index(&self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }

    /// 是否可以作为升变目标
    pub fn is_promotion_target(&self) -> bool {
        Self::PROMOTIONS.contains(self)
    }

    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = self.to_lower_char();
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 小写字母表示（UCI 升变后缀也使用它）
    pub fn to_lower_char(&self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceType, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((piece_type, side))
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（先手，在下方）
    White,
    /// 黑方（后手，在上方）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 阵营索引 (White=0, Black=1)
    pub fn index(&self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// 兵的前进方向
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// 兵的初始横排
    pub fn pawn_rank(&self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// 底线（王和车的初始横排）
    pub fn back_rank(&self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    /// 兵的升变横排
    pub fn promotion_rank(&self) -> u8 {
        self.opponent().back_rank()
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'w' | 'W' => Some(Side::White),
            'b' | 'B' => Some(Side::Black),
            _ => None,
        }
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side) -> Self {
        Self { piece_type, side }
    }

    /// 获取棋子的 Unicode 符号
    pub fn display_char(&self) -> char {
        match (self.piece_type, self.side) {
            (PieceType::Pawn, Side::White) => '♙',
            (PieceType::Knight, Side::White) => '♘',
            (PieceType::Bishop, Side::White) => '♗',
            (PieceType::Rook, Side::White) => '♖',
            (PieceType::Queen, Side::White) => '♕',
            (PieceType::King, Side::White) => '♔',
            (PieceType::Pawn, Side::Black) => '♟',
            (PieceType::Knight, Side::Black) => '♞',
            (PieceType::Bishop, Side::Black) => '♝',
            (PieceType::Rook, Side::Black) => '♜',
            (PieceType::Queen, Side::Black) => '♛',
            (PieceType::King, Side::Black) => '♚',
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_fen_char(c).map(|(piece_type, side)| Piece { piece_type, side })
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.piece_type.value()
    }
}

/// 棋盘格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    /// 列 (0-7, a-h)
    pub x: u8,
    /// 行 (0-7, 1-8)
    pub y: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 检查格子是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// 是否为浅色格（a1 为深色格）
    pub fn is_light(&self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /// 获取偏移后的格子
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Square> {
        let new_x = self.x as i8 + dx;
        let new_y = self.y as i8 + dy;
        if new_x >= 0 && (new_x as usize) < BOARD_SIZE && new_y >= 0 && (new_y as usize) < BOARD_SIZE {
            Some(Square {
                x: new_x as u8,
                y: new_y as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引 (a1=0, h8=63)
    pub fn to_index(&self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Square {
                x: (index % BOARD_SIZE) as u8,
                y: (index / BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 从代数记号解析，如 "e4"
    pub fn from_algebraic(text: &str) -> Result<Self, ChessError> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare { x: -1, y: -1 });
        }
        let x = bytes[0].wrapping_sub(b'a') as i8;
        let y = bytes[1].wrapping_sub(b'1') as i8;
        if x < 0 || y < 0 {
            return Err(ChessError::InvalidSquare { x, y });
        }
        Square::new(x as u8, y as u8).ok_or(ChessError::InvalidSquare { x, y })
    }

    /// 列字母
    pub fn file_char(&self) -> char {
        (b'a' + self.x) as char
    }

    /// 行数字
    pub fn rank_char(&self) -> char {
        (b'1' + self.y) as char
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_display_char() {
        let white_king = Piece::new(PieceType::King, Side::White);
        assert_eq!(white_king.display_char(), '♔');

        let black_queen = Piece::new(PieceType::Queen, Side::Black);
        assert_eq!(black_queen.display_char(), '♛');
    }

    #[test]
    fn test_piece_fen_char() {
        let white_king = Piece::new(PieceType::King, Side::White);
        assert_eq!(white_king.to_fen_char(), 'K');

        let black_knight = Piece::new(PieceType::Knight, Side::Black);
        assert_eq!(black_knight.to_fen_char(), 'n');

        assert_eq!(
            Piece::from_fen_char('R'),
            Some(Piece::new(PieceType::Rook, Side::White))
        );
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn test_piece_values() {
        assert_eq!(PieceType::Pawn.value(), 100);
        assert_eq!(PieceType::Knight.value(), 320);
        assert_eq!(PieceType::Bishop.value(), 330);
        assert_eq!(PieceType::Rook.value(), 500);
        assert_eq!(PieceType::Queen.value(), 900);
        assert_eq!(PieceType::King.value(), 20000);
    }

    #[test]
    fn test_square_valid() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!(Square::new_unchecked(3, 3).offset(5, 0).is_none());
    }

    #[test]
    fn test_square_algebraic() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4, Square::new_unchecked(4, 3));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Square::from_index(e4.to_index()), Some(e4));

        assert!(Square::from_algebraic("i1").is_err());
        assert!(Square::from_algebraic("a9").is_err());
        assert!(Square::from_algebraic("e").is_err());
    }

    #[test]
    fn test_square_color() {
        assert!(!Square::from_algebraic("a1").unwrap().is_light());
        assert!(Square::from_algebraic("h1").unwrap().is_light());
        assert!(!Square::from_algebraic("h8").unwrap().is_light());
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::Black.opponent(), Side::White);
        assert_eq!(Side::White.promotion_rank(), 7);
        assert_eq!(Side::Black.promotion_rank(), 0);
    }
}
