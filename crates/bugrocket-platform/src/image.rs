//! Image adapter for the BugRocket `/api/image` endpoint.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use bugrocket_core::ports::ImagePort;
use bugrocket_types::{Result, RocketError};

pub struct ImageClient {
    url: String,
}

impl ImageClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    image_url: String,
}

#[async_trait(?Send)]
impl ImagePort for ImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let response = Request::post(&self.url)
            .json(&ImageRequest { prompt })
            .map_err(|e| RocketError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| RocketError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RocketError::Network(format!("HTTP {}: {}", status, text)));
        }

        let data: ImageResponse = response
            .json()
            .await
            .map_err(|e| RocketError::Serialization(e.to_string()))?;
        log::info!("Image ready: {}", data.image_url);
        Ok(data.image_url)
    }
}
