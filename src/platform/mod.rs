pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

use crate::dispatcher::ReplyAction;

/// Outbound side of a chat platform.
/// The webhook server only talks to the platform through this trait.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Deliver a reply. `NoAction` sends nothing.
    async fn send(&self, action: &ReplyAction) -> Result<()>;

    /// Point the platform's update delivery at `url`
    async fn set_webhook(&self, url: &str) -> Result<()>;

    /// Current webhook registration as reported by the platform
    async fn webhook_info(&self) -> Result<serde_json::Value>;
}
