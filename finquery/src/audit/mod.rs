//! 金融質問の監査ログ
//!
//! 質問文を切り詰め・ハッシュ化した記録を追記専用ファイルに残す

/// 監査ログの型定義
pub mod types;

/// 区切りトークン形式のファイルストア
pub mod store;

pub use store::{ClearOutcome, LogStoreError, QuestionLogStore};
pub use types::QuestionLogEntry;
