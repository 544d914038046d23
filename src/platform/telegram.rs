use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use teloxide::prelude::*;
use teloxide::types::{
    InlineQueryId, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
    InputMessageContentText,
};
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::dispatcher::{InboundUpdate, InlineResult, ReplyAction};
use crate::platform::PlatformClient;

// Only the fields the dispatcher needs; everything else in the payload is ignored.

#[derive(Debug, Deserialize)]
struct WireUpdate {
    #[serde(default)]
    inline_query: Option<WireInlineQuery>,
    #[serde(default)]
    message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireInlineQuery {
    id: String,
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    chat: WireChat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChat {
    id: i64,
}

impl From<WireUpdate> for InboundUpdate {
    fn from(update: WireUpdate) -> Self {
        // An inline query takes precedence; Telegram never sends both.
        if let Some(query) = update.inline_query {
            return InboundUpdate::InlineQuery {
                id: query.id,
                query_text: query.query,
            };
        }
        match update.message {
            Some(WireMessage {
                chat,
                text: Some(text),
            }) => InboundUpdate::DirectMessage {
                chat_id: chat.id,
                text,
            },
            _ => InboundUpdate::Unrecognized,
        }
    }
}

/// Decode a webhook body into an update.
/// Fails only when the body is not a JSON object of the expected shape.
pub fn decode_update(body: &[u8]) -> Result<InboundUpdate> {
    let update: WireUpdate =
        serde_json::from_slice(body).context("Failed to decode Telegram update")?;
    Ok(update.into())
}

fn to_article(result: &InlineResult) -> InlineQueryResult {
    let content =
        InputMessageContent::Text(InputMessageContentText::new(result.message_text.clone()));
    let mut article =
        InlineQueryResultArticle::new(result.id.clone(), result.title.clone(), content);
    article.description = Some(result.description.clone());
    InlineQueryResult::Article(article)
}

/// Bot API client backed by teloxide
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let mut bot = Bot::with_client(&config.bot_token, client);
        if let Some(api_url) = &config.api_url {
            let url = Url::parse(api_url)
                .with_context(|| format!("Invalid Bot API url: {}", api_url))?;
            bot = bot.set_api_url(url);
        }

        Ok(Self { bot })
    }
}

#[async_trait]
impl PlatformClient for TelegramClient {
    async fn send(&self, action: &ReplyAction) -> Result<()> {
        match action {
            ReplyAction::AnswerInlineQuery { query_id, results } => {
                debug!(
                    "Answering inline query {} with {} result(s)",
                    query_id,
                    results.len()
                );
                let articles: Vec<InlineQueryResult> = results.iter().map(to_article).collect();
                self.bot
                    .answer_inline_query(InlineQueryId(query_id.clone()), articles)
                    .await
                    .context("answerInlineQuery failed")?;
            }
            ReplyAction::SendMessage { chat_id, text } => {
                debug!("Sending message to chat {}", chat_id);
                self.bot
                    .send_message(ChatId(*chat_id), text.clone())
                    .await
                    .context("sendMessage failed")?;
            }
            ReplyAction::NoAction => {}
        }
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).with_context(|| format!("Invalid webhook url: {}", url))?;
        self.bot
            .set_webhook(url.clone())
            .await
            .context("setWebhook failed")?;
        info!("Webhook registered at {}", url);
        Ok(())
    }

    async fn webhook_info(&self) -> Result<serde_json::Value> {
        let info = self
            .bot
            .get_webhook_info()
            .await
            .context("getWebhookInfo failed")?;
        serde_json::to_value(&info).context("Failed to encode webhook info")
    }
}
