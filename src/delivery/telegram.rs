use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use std::path::Path;
use tokio::fs::File;
use tracing::{debug, info};

use crate::config::DeliveryConfig;
use crate::error::{Result, SubburnError};
use super::DeliveryChannel;

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramDelivery {
    config: DeliveryConfig,
    client: Client,
}

impl TelegramDelivery {
    pub fn new(config: DeliveryConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_base.trim_end_matches('/'), token, method)
    }

    async fn send(&self, file: &Path, token: &str, recipient: &str) -> Result<()> {
        let (part, length) = video_part(file).await?;

        debug!("Uploading {} ({} bytes)", file.display(), length);
        let form = Form::new()
            .text("chat_id", recipient.to_string())
            .part("video", part);

        let response: TelegramResponse = self
            .client
            .post(self.method_url(token, "sendVideo"))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(SubburnError::Delivery(
                response
                    .description
                    .unwrap_or_else(|| "Telegram rejected the upload".to_string()),
            ));
        }
        Ok(())
    }
}

/// Multipart part streaming `file` from disk, with its length.
async fn video_part(file: &Path) -> Result<(Part, u64)> {
    let handle = File::open(file).await?;
    let length = handle.metadata().await?.len();
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video.mp4".to_string());

    let part = Part::stream_with_length(Body::from(handle), length).file_name(file_name);
    Ok((part, length))
}

#[async_trait]
impl DeliveryChannel for TelegramDelivery {
    async fn deliver(&self, file: &Path, token: &str, recipient: &str) -> Result<()> {
        info!("Sending {} to chat {}", file.display(), recipient);

        self.send(file, token, recipient).await.map_err(|e| match e {
            SubburnError::Delivery(message) => SubburnError::Delivery(message),
            other => SubburnError::Delivery(other.to_string()),
        })?;

        info!("Delivery completed");
        Ok(())
    }
}
