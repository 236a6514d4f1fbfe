use std::io::{self, BufRead, Write};

use chess_rules::config::RulesConfig;
use chess_rules::engine::{GameState, Square};

const HELP: &str = "commands: <uci move> | moves <square> | board | fen | status | history | new | help | quit";

fn main() {
    let config = RulesConfig::from_env();

    // Initialize tracing (structured logging). stdout carries replies.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut game = match GameState::from_config(&config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("invalid starting position: {e}");
            eprintln!("invalid starting position: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "chess-rules v{} ready ({} castling)",
        env!("CARGO_PKG_VERSION"),
        config.castling
    );

    let mut out = io::stdout().lock();
    if writeln!(out, "{}\n{HELP}", game.board()).is_err() {
        return;
    }

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("failed to read stdin: {e}");
                break;
            }
        };
        let Some(reply) = execute(&mut game, &line) else {
            break;
        };
        if !reply.is_empty() && writeln!(out, "{reply}").is_err() {
            break;
        }
    }
}

/// Run one command line against the game. `None` means quit.
fn execute(game: &mut GameState, line: &str) -> Option<String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Some(String::new());
    };

    let reply = match command {
        "quit" | "exit" => return None,
        "help" => HELP.to_string(),
        "board" => game.board().to_string(),
        "fen" => game.to_fen(),
        "status" => format!("{} to move, {}", game.side_to_move(), game.terminal()),
        "new" => {
            game.new_game();
            game.board().to_string()
        }
        "history" => game
            .history()
            .iter()
            .map(|record| record.uci.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        "moves" => match words.next().map(str::parse::<Square>) {
            Some(Ok(square)) => {
                let moves: Vec<String> = game
                    .legal_moves(square)
                    .into_iter()
                    .map(|to| to.to_algebraic())
                    .collect();
                if moves.is_empty() {
                    format!("{square}: no legal moves")
                } else {
                    format!("{square}: {}", moves.join(" "))
                }
            }
            Some(Err(e)) => format!("error: {e}"),
            None => "usage: moves <square>".to_string(),
        },
        text => match game.apply_uci(text) {
            Ok(outcome) => {
                let mut reply = format!("{}\n{}", game.board(), outcome.terminal);
                if let Some(captured) = outcome.captured {
                    reply.push_str(&format!(" (captured {captured})"));
                }
                reply
            }
            Err(e) => format!("error: {e}"),
        },
    };
    Some(reply)
}
