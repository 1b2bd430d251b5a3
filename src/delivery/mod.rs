// Delivery of the finished video
//
// - Telegram: Bot API `sendVideo` upload

pub mod telegram;

use async_trait::async_trait;
use std::path::Path;

pub use telegram::*;
use crate::config::DeliveryConfig;
use crate::error::Result;

/// Sends a finished file to a recipient
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, file: &Path, token: &str, recipient: &str) -> Result<()>;
}

pub struct DeliveryFactory;

impl DeliveryFactory {
    pub fn create_channel(config: DeliveryConfig) -> Box<dyn DeliveryChannel> {
        Box::new(TelegramDelivery::new(config))
    }
}
