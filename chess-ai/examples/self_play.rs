//! 引擎自我对弈
//!
//! 运行方式:
//! ```bash
//! RUST_LOG=chess_ai=info cargo run -p chess-ai --example self_play -- [白方难度] [黑方难度] [最大回合数]
//! ```
//!
//! 难度取值: easy / medium / hard / expert

use chess_ai::{spawn_best_move, AiConfig, Difficulty};
use protocol::{BoardState, Fen, PieceType, Side};

fn parse_difficulty(arg: Option<String>, default: Difficulty) -> anyhow::Result<Difficulty> {
    let Some(arg) = arg else {
        return Ok(default);
    };
    match arg.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        "expert" => Ok(Difficulty::Expert),
        other => anyhow::bail!("未知难度: {}", other),
    }
}

fn captured_summary(state: &BoardState, side: Side) -> String {
    let captured = state.board.captured_pieces(side);
    let value: i32 = captured.iter().map(PieceType::value).sum();
    let pieces: String = captured
        .iter()
        .map(|piece_type| piece_type.to_fen_char(side))
        .collect();
    format!("{} 被吃: [{}] 共 {} 分", side.name(), pieces, value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chess_ai=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let white = parse_difficulty(args.next(), Difficulty::Medium)?;
    let black = parse_difficulty(args.next(), Difficulty::Easy)?;
    let max_rounds: u32 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 40,
    };

    println!("=== 自我对弈: 白方 {:?} vs 黑方 {:?} ===\n", white, black);

    let mut state = BoardState::initial();
    while !state.is_game_over() && state.round <= max_rounds {
        let difficulty = match state.current_turn {
            Side::White => white,
            Side::Black => black,
        };

        let task = spawn_best_move(state.clone(), AiConfig::from_difficulty(difficulty));
        let Some(mv) = task.outcome().await? else {
            break;
        };

        let mover = state.current_turn;
        state.apply(mv)?;

        let check = if state.is_check() { "+" } else { "" };
        if mover == Side::White {
            print!("{:>3}. {}{} ", state.round, mv, check);
        } else {
            println!("{}{}", mv, check);
        }
    }

    println!("\n\n{}", state.board);
    println!("FEN: {}", Fen::to_string(&state));
    println!("{}", captured_summary(&state, Side::White));
    println!("{}", captured_summary(&state, Side::Black));

    if state.is_game_over() {
        println!("\n{}", state.status_message());
    } else {
        println!("\n达到 {} 回合上限，对局未结束 {}", max_rounds, state.status_message());
    }

    Ok(())
}
