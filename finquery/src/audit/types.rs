//! 質問ログの型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 保存する質問文の最大文字数
pub const MAX_STORED_QUESTION_CHARS: usize = 200;

/// フィンガープリントとして残すSHA-256 hexの桁数
pub const FINGERPRINT_HEX_LEN: usize = 10;

/// 質問ログエントリ
///
/// 一度書き込まれたエントリは変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLogEntry {
    /// サニタイズ済み質問文の先頭200文字
    pub question: String,
    /// サニタイズ済み質問文全体のSHA-256先頭10桁
    pub hash: String,
    /// 保存日時（RFC 3339, ミリ秒精度）
    #[serde(with = "millis_rfc3339")]
    pub timestamp: DateTime<Utc>,
}

impl QuestionLogEntry {
    /// サニタイズ済みの質問文からエントリを作成する
    pub fn new(sanitized_question: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            question: sanitized_question
                .chars()
                .take(MAX_STORED_QUESTION_CHARS)
                .collect(),
            hash: fingerprint(sanitized_question),
            timestamp,
        }
    }
}

/// 質問文のフィンガープリントを計算する
///
/// 一方向で、元の質問文を復元することはできない。
pub fn fingerprint(question: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(question.as_bytes()));
    digest[..FINGERPRINT_HEX_LEN].to_string()
}

mod millis_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
