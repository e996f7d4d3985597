//! OpenAI互換 Chat Completions による回答生成

use super::{map_reqwest_error, ProviderError};
use crate::config::AnswerProviderConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

const FINANCE_SYSTEM_PROMPT: &str = "WealthWhisperer is your personal financial guru, leveraging proprietary data and sophisticated algorithms to deliver tailored financial advice, empowering you to make informed decisions for a prosperous future.";
const CHAT_SYSTEM_PROMPT: &str =
    "You are a chatbot, Please reply politely to the following questions.";

const FINANCE_KEYWORDS: [&str; 3] = ["financial", "finance", "business"];

/// 回答モード（システムプロンプトの切り替え）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    /// 汎用チャット
    Chat,
    /// 金融アドバイザー
    Finance,
}

impl AnswerMode {
    /// 質問文から回答モードを判定する
    pub fn detect(question: &str) -> Self {
        let lowered = question.to_lowercase();
        if FINANCE_KEYWORDS.iter().any(|term| lowered.contains(term)) {
            Self::Finance
        } else {
            Self::Chat
        }
    }

    /// システムプロンプト
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Chat => CHAT_SYSTEM_PROMPT,
            Self::Finance => FINANCE_SYSTEM_PROMPT,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Finance => "finance",
        }
    }
}

/// 回答プロバイダの抽象化 trait
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// プロバイダ名（ログ用）
    fn provider_name(&self) -> &str;

    /// 質問に対する回答テキストを生成する
    async fn answer(&self, question: &str, mode: AnswerMode) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI互換APIを使う回答プロバイダ
pub struct OpenAiAnswerProvider {
    client: reqwest::Client,
    config: AnswerProviderConfig,
}

impl OpenAiAnswerProvider {
    /// 設定からプロバイダを作成する
    pub fn new(config: AnswerProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl AnswerProvider for OpenAiAnswerProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn answer(&self, question: &str, mode: AnswerMode) -> Result<String, ProviderError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ProviderError::InvalidInput("empty question".to_string()));
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("OpenAI API key is not set".to_string()))?;

        let req_id = Uuid::new_v4();
        let started = Instant::now();
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": mode.system_prompt() },
                { "role": "user", "content": question },
            ],
        });

        let res = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body: text.trim().to_string(),
            });
        }

        let completion: ChatCompletion = res
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        // 回答本文はログに出さない
        info!(
            provider = self.provider_name(),
            request_id = %req_id,
            completion_id = completion.id.as_deref().unwrap_or("-"),
            mode = mode.as_str(),
            latency_ms = started.elapsed().as_millis(),
            "Received response from answer provider"
        );

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}
