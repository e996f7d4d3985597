//! logs サブコマンド
//!
//! 質問ログを表示・消去します。

use crate::audit::{ClearOutcome, QuestionLogStore};
use crate::config::log_file_path;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// logs サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    /// Log operation
    #[command(subcommand)]
    pub command: LogsCommand,
}

/// logs の操作
#[derive(Subcommand, Debug, Clone)]
pub enum LogsCommand {
    /// Print every entry as one JSON object per line
    Show {
        /// Question log file (default: FINQUERY_LOG_FILE or logs/queries.log)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Truncate the question log
    Clear {
        /// Question log file (default: FINQUERY_LOG_FILE or logs/queries.log)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn store_for(file: &Option<PathBuf>) -> QuestionLogStore {
    QuestionLogStore::new(file.clone().unwrap_or_else(log_file_path))
}

/// logs コマンドを実行
pub async fn execute(command: &LogsCommand) -> Result<(), anyhow::Error> {
    match command {
        LogsCommand::Show { file } => {
            let store = store_for(file);
            match store.load().await? {
                None => println!("No logs found ({})", store.path().display()),
                Some(entries) => {
                    for entry in entries {
                        println!("{}", serde_json::to_string(&entry)?);
                    }
                }
            }
        }
        LogsCommand::Clear { file } => {
            let store = store_for(file);
            match store.clear().await? {
                ClearOutcome::Cleared => println!("Logs cleared successfully"),
                ClearOutcome::NothingToClear => println!("No logs to clear"),
            }
        }
    }
    Ok(())
}
