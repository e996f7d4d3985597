//! 質問ログストア
//!
//! 単一テキストファイルへの追記専用ログ。各エントリはJSONで表現され、
//! 直後に区切りトークン `**` が続く。
//!
//! 書き込みはベストエフォートで、失敗してもログ出力のみで呼び出し元には伝播しない。
//! 読み込みは破損したフラグメントを読み飛ばす。

use crate::audit::types::QuestionLogEntry;
use crate::common::sanitize::sanitize;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// エントリ区切りトークン
pub const LOG_SEPARATOR: &str = "**";

/// 質問ログストアのエラー
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// 追記失敗（呼び出し元には伝播しない）
    #[error("Failed to write question log: {0}")]
    Write(#[source] std::io::Error),

    /// エントリのシリアライズ失敗
    #[error("Failed to serialize question log entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 読み込み失敗
    #[error("Failed to read question log: {0}")]
    Read(#[source] std::io::Error),

    /// クリア失敗
    #[error("Failed to clear question log: {0}")]
    Clear(#[source] std::io::Error),
}

/// `clear` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// ログファイルを空にした
    Cleared,
    /// ログファイルが存在しなかった
    NothingToClear,
}

/// 質問ログストア
#[derive(Debug, Clone)]
pub struct QuestionLogStore {
    path: PathBuf,
}

impl QuestionLogStore {
    /// 指定パスのログストアを作成する（ファイルは初回追記時に作成される）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ログファイルのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 質問を1件追記する（ベストエフォート）
    pub async fn append(&self, question: &str) {
        let entry = QuestionLogEntry::new(&sanitize(question), Utc::now());
        match self.write_entry(&entry).await {
            Ok(()) => info!(hash = %entry.hash, "Question log entry created"),
            Err(e) => warn!("Question log storage error: {}", e),
        }
    }

    async fn write_entry(&self, entry: &QuestionLogEntry) -> Result<(), LogStoreError> {
        let mut record = encode_entry(entry)?;
        record.push_str(LOG_SEPARATOR);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(LogStoreError::Write)?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(LogStoreError::Write)?;
        // エントリと区切りは1回の書き込みで出力する
        file.write_all(record.as_bytes())
            .await
            .map_err(LogStoreError::Write)?;
        file.flush().await.map_err(LogStoreError::Write)?;
        Ok(())
    }

    /// 全エントリを読み込む
    ///
    /// ログファイルが存在しない場合は `None` を返す。
    pub async fn load(&self) -> Result<Option<Vec<QuestionLogEntry>>, LogStoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LogStoreError::Read(e)),
        };
        Ok(Some(parse_log(&String::from_utf8_lossy(&bytes))))
    }

    /// 全エントリを追記順に読み込む（ファイル未作成時は空）
    pub async fn read_all(&self) -> Result<Vec<QuestionLogEntry>, LogStoreError> {
        Ok(self.load().await?.unwrap_or_default())
    }

    /// ログを空にする（ファイル未作成時は何もしない）
    pub async fn clear(&self) -> Result<ClearOutcome, LogStoreError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ClearOutcome::NothingToClear),
            Err(e) => return Err(LogStoreError::Clear(e)),
        }
        tokio::fs::write(&self.path, b"")
            .await
            .map_err(LogStoreError::Clear)?;
        info!("Question log cleared");
        Ok(ClearOutcome::Cleared)
    }
}

/// エントリをJSONへエンコードする
///
/// JSON中の `*` は全て `\u002a` にエスケープされるため、区切りトークンが
/// エントリ内部に現れることはない。`*` はJSONの構文文字ではないので、
/// 出現箇所は必ず文字列リテラルの内側になる。
pub fn encode_entry(entry: &QuestionLogEntry) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(entry)?.replace('*', "\\u002a"))
}

/// ログ本文をエントリ列に分解する
///
/// 空のフラグメント（末尾の区切り等）は無視し、デコードできないフラグメントは
/// 破損として読み飛ばす。
pub fn parse_log(text: &str) -> Vec<QuestionLogEntry> {
    text.split(LOG_SEPARATOR)
        .filter(|fragment| !fragment.trim().is_empty())
        .filter_map(|fragment| match serde_json::from_str(fragment) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(len = fragment.len(), "Skipping corrupt question log fragment: {}", e);
                None
            }
        })
        .collect()
}
