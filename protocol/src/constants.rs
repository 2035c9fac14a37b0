//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 75 步规则（以半回合计）：连续 150 个半回合无吃子、无兵走动即和棋
pub const SEVENTY_FIVE_MOVE_LIMIT: u32 = 150;

/// 五次重复局面判和
pub const FIVEFOLD_REPETITION: usize = 5;

/// 每方初始棋子数量（兵、马、象、车、后）
pub const STARTING_PAWNS: usize = 8;
pub const STARTING_KNIGHTS: usize = 2;
pub const STARTING_BISHOPS: usize = 2;
pub const STARTING_ROOKS: usize = 2;
pub const STARTING_QUEENS: usize = 1;
