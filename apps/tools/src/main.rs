use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use engine::{
    keys::{key_by_id, keyboard_key_id, KeyConfig},
    CalculatorSession, HistoryEntry,
};
use storage::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nebula_calc_tools", about = "Headless Nebula Calc utilities")]
struct Cli {
    #[arg(long, env = "NEBULA_CALC__DATABASE_URL", default_value = "sqlite://nebula_calc.sqlite3")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Press keys in order and print the resulting display.
    ///
    /// Keys are keyboard names (`7`, `+`, `*`, `Enter`, `Escape`) or keypad ids
    /// (`num-7`, `op-add`).
    Replay {
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
        /// Load and save history in the database around the replay.
        #[arg(long)]
        record: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print stored history, newest first.
    History {
        #[arg(long)]
        json: bool,
    },
    ClearHistory,
    /// Show the stored mute preference, or set it.
    Muted { value: Option<bool> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay { keys, record, json } => {
            let storage = if record {
                Some(Storage::new(&cli.database_url).await?)
            } else {
                None
            };
            let mut session = match &storage {
                Some(storage) => CalculatorSession::with_history(storage.load_history().await?),
                None => CalculatorSession::new(),
            };

            let recorded = replay(&mut session, &keys)?;
            if let Some(storage) = &storage {
                if !recorded.is_empty() {
                    storage.save_history(session.history()).await?;
                    tracing::info!(count = recorded.len(), "saved replayed calculations");
                }
            }

            let state = session.state();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(state).context("failed to encode state")?
                );
            } else {
                if !state.expression.is_empty() {
                    println!("{}", state.expression);
                }
                println!("{}", state.display);
                if let Some(message) = state.error_message() {
                    println!("error: {message}");
                }
            }
        }
        Command::History { json } => {
            let storage = Storage::new(&cli.database_url).await?;
            let history = storage.load_history().await?;
            if json {
                println!("{}", history.to_json().context("failed to encode history")?);
            } else if history.is_empty() {
                println!("no history");
            } else {
                for entry in history.entries() {
                    println!("{}", history_line(entry));
                }
            }
        }
        Command::ClearHistory => {
            let storage = Storage::new(&cli.database_url).await?;
            storage.clear_history().await?;
            println!("cleared history");
        }
        Command::Muted { value } => {
            let storage = Storage::new(&cli.database_url).await?;
            if let Some(muted) = value {
                storage.save_muted(muted).await?;
            }
            println!("muted={}", storage.load_muted().await?);
        }
    }

    Ok(())
}

fn resolve_key(token: &str) -> Result<&'static KeyConfig> {
    key_by_id(token)
        .or_else(|| keyboard_key_id(token).and_then(key_by_id))
        .ok_or_else(|| anyhow::anyhow!("unknown key '{token}'"))
}

/// Dispatch every key; returns the calculations that were recorded.
fn replay(session: &mut CalculatorSession, tokens: &[String]) -> Result<Vec<HistoryEntry>> {
    let keys = tokens
        .iter()
        .map(|token| resolve_key(token))
        .collect::<Result<Vec<_>>>()?;

    let mut recorded = Vec::new();
    for key in keys {
        let outcome = session.dispatch(key.action);
        tracing::debug!(
            key = key.id,
            feedback = ?outcome.feedback,
            display = %session.state().display,
            "replayed key"
        );
        recorded.extend(outcome.recorded);
    }
    Ok(recorded)
}

fn history_line(entry: &HistoryEntry) -> String {
    let when = DateTime::from_timestamp_millis(entry.timestamp)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| entry.timestamp.to_string());
    format!("{when}  {} = {}", entry.expression, entry.result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn replays_keyboard_names_and_keypad_ids() {
        let mut session = CalculatorSession::new();
        let recorded = replay(&mut session, &tokens("7 op-subtract 2 Enter")).expect("replay");
        assert_eq!(session.state().display, "5");
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].expression, "7 - 2");
    }

    #[test]
    fn chained_operations_record_each_step() {
        let mut session = CalculatorSession::new();
        let recorded = replay(&mut session, &tokens("5 + 3 * 2 =")).expect("replay");
        assert_eq!(session.state().display, "16");
        let results: Vec<_> = recorded.iter().map(|e| e.result.as_str()).collect();
        assert_eq!(results, vec!["8", "16"]);
    }

    #[test]
    fn unknown_key_rejects_whole_sequence() {
        let mut session = CalculatorSession::new();
        let err = replay(&mut session, &tokens("1 + x")).expect_err("unknown key");
        assert!(err.to_string().contains("'x'"));
        assert_eq!(session.state().display, "0");
    }

    #[test]
    fn division_by_zero_latches_error() {
        let mut session = CalculatorSession::new();
        let recorded = replay(&mut session, &tokens("5 / 0 = 1")).expect("replay");
        assert!(recorded.is_empty());
        assert_eq!(session.state().error_message(), Some("Cannot divide by zero"));
    }

    #[test]
    fn history_line_shows_expression_and_result() {
        let entry = HistoryEntry::new("0.1 + 0.2", "0.3", 0);
        assert_eq!(history_line(&entry), "1970-01-01 00:00:00  0.1 + 0.2 = 0.3");
    }

    #[test]
    fn cli_accepts_operator_tokens() {
        let cli = Cli::try_parse_from(["nebula_calc_tools", "replay", "9", "-", "3", "="])
            .expect("parse");
        match cli.command {
            Command::Replay { keys, .. } => assert_eq!(keys, tokens("9 - 3 =")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
