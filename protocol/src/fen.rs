//! FEN 格式解析和生成
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> <易位权> <过路兵格> <半回合数> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`
//!
//! 除棋盘外的字段均可省略，省略时分别取 `w`、`-`、`-`、`0`、`1`。

use crate::board::{Board, BoardState, CastlingRights};
use crate::constants::BOARD_SIZE;
use crate::error::ChessError;
use crate::piece::{Piece, Side, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为棋盘状态
    pub fn parse(fen: &str) -> Result<BoardState, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(invalid("Empty FEN string"));
        }
        if parts.len() > 6 {
            return Err(invalid(format!("Expected at most 6 fields, got {}", parts.len())));
        }

        let board = Self::parse_board(parts[0])?;

        let current_turn = match parts.get(1) {
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next().and_then(Side::from_fen_char), chars.next()) {
                    (Some(side), None) => side,
                    _ => return Err(invalid(format!("Invalid side to move: {}", text))),
                }
            }
            None => Side::White,
        };

        let castling = match parts.get(2) {
            Some(text) => Self::parse_castling(text)?,
            None => CastlingRights::none(),
        };

        let en_passant = match parts.get(3) {
            Some(&"-") | None => None,
            Some(text) => Some(
                Square::from_algebraic(text)
                    .map_err(|_| invalid(format!("Invalid en passant square: {}", text)))?,
            ),
        };

        let halfmove_clock = match parts.get(4) {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("Invalid halfmove clock: {}", text)))?,
            None => 0,
        };

        let round = match parts.get(5) {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("Invalid fullmove number: {}", text)))?,
            None => 1,
        };

        let mut state = BoardState::from_board(board, current_turn);
        state.castling = castling;
        state.en_passant = en_passant;
        state.halfmove_clock = halfmove_clock;
        state.round = round;
        Ok(state)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, ChessError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(invalid(format!("Expected 8 rows, got {}", rows.len())));
        }

        // FEN 从上到下是第 8 行到第 1 行
        for (row_idx, row) in rows.iter().enumerate() {
            let y = (BOARD_SIZE - 1 - row_idx) as u8;
            let mut x = 0u8;

            for c in row.chars() {
                if x as usize >= BOARD_SIZE {
                    return Err(invalid(format!("Row {} has too many columns", row_idx)));
                }

                if let Some(empty_count) = c.to_digit(10) {
                    if empty_count == 0 {
                        return Err(invalid(format!("Row {} has a zero skip", row_idx)));
                    }
                    x += empty_count as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(x, y), Some(piece));
                    x += 1;
                } else {
                    return Err(invalid(format!("Invalid piece character: {}", c)));
                }
            }

            if x as usize != BOARD_SIZE {
                return Err(invalid(format!(
                    "Row {} has {} columns, expected 8",
                    row_idx, x
                )));
            }
        }

        Ok(board)
    }

    /// 解析易位权字段
    fn parse_castling(text: &str) -> Result<CastlingRights, ChessError> {
        let mut rights = CastlingRights::none();
        if text == "-" {
            return Ok(rights);
        }
        for c in text.chars() {
            match c {
                'K' => rights.white_king_side = true,
                'Q' => rights.white_queen_side = true,
                'k' => rights.black_king_side = true,
                'q' => rights.black_queen_side = true,
                _ => return Err(invalid(format!("Invalid castling rights: {}", text))),
            }
        }
        Ok(rights)
    }

    /// 将棋盘状态转换为 FEN 字符串
    pub fn to_string(state: &BoardState) -> String {
        let en_passant = state
            .en_passant
            .map(|square| square.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            Self::board_to_string(&state.board),
            state.current_turn.to_fen_char(),
            Self::castling_to_string(&state.castling),
            en_passant,
            state.halfmove_clock,
            state.round
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for y in (0..BOARD_SIZE as u8).rev() {
            let mut row = String::new();
            let mut empty_count = 0;

            for x in 0..BOARD_SIZE as u8 {
                if let Some(piece) = board.get(Square::new_unchecked(x, y)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }

    fn castling_to_string(rights: &CastlingRights) -> String {
        let text: String = rights
            .flags()
            .iter()
            .zip(['K', 'Q', 'k', 'q'])
            .filter(|(flag, _)| **flag)
            .map(|(_, c)| c)
            .collect();
        if text.is_empty() {
            "-".to_string()
        } else {
            text
        }
    }

    /// 解析初始局面
    pub fn initial() -> BoardState {
        BoardState::initial()
    }
}

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::InvalidFen {
        reason: reason.into(),
    }
}
