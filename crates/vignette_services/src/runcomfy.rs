//! RunComfy image generation client.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use vignette_error::{HttpError, VignetteResult};
use vignette_interface::{ImageGeneration, ImageRequest};

const RUNCOMFY_API_URL: &str = "https://api.runcomfy.com/generate";

/// RunComfy generation request body.
#[derive(Debug, Clone, Serialize)]
struct GenerateBody {
    prompt: String,
    negative_prompt: String,
    width: u32,
    height: u32,
    character_reference: String,
    user_id: String,
}

/// RunComfy generation response body.
#[derive(Debug, Clone, Deserialize)]
struct GenerateReply {
    image_url: String,
}

/// RunComfy API client.
///
/// Generation is a two-step exchange: launch a job carrying the prompt and
/// a base64-encoded character-reference image, then fetch the rendered
/// image from the returned URL.
#[derive(Debug, Clone)]
pub struct RunComfyClient {
    client: Client,
    api_key: String,
    user_id: String,
    api_url: String,
}

impl RunComfyClient {
    /// Creates a new RunComfy client.
    pub fn new(api_key: impl Into<String>, user_id: impl Into<String>) -> Self {
        debug!("Creating new RunComfy client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            user_id: user_id.into(),
            api_url: RUNCOMFY_API_URL.to_string(),
        }
    }

    /// Overrides the generation endpoint. Used by tests.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn launch(&self, body: &GenerateBody) -> VignetteResult<GenerateReply> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send RunComfy generation request");
                HttpError::new(format!("RunComfy request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "RunComfy API returned error");
            return Err(HttpError::new(format!("RunComfy API error {status}: {body}")).into());
        }

        let reply: GenerateReply = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse RunComfy response");
            HttpError::new(format!("Failed to parse RunComfy response: {e}"))
        })?;
        Ok(reply)
    }

    async fn fetch_image(&self, url: &str) -> VignetteResult<Vec<u8>> {
        debug!(url = %url, "Fetching rendered image");
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = ?e, "Failed to fetch rendered image");
            HttpError::new(format!("Image fetch failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HttpError::new(format!("Image fetch error {status}")).into());
        }

        let bytes = response.bytes().await.map_err(|e| {
            HttpError::new(format!("Failed to read image bytes: {e}"))
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageGeneration for RunComfyClient {
    #[instrument(skip(self, request), fields(width = request.width(), height = request.height()))]
    async fn generate_image(&self, request: &ImageRequest) -> VignetteResult<Vec<u8>> {
        let reference = tokio::fs::read(request.reference_image())
            .await
            .map_err(|e| {
                error!(path = %request.reference_image().display(), error = ?e, "Failed to read reference image");
                HttpError::new(format!(
                    "Failed to read reference image {}: {e}",
                    request.reference_image().display()
                ))
            })?;

        let body = GenerateBody {
            prompt: request.prompt().clone(),
            negative_prompt: request.negative_prompt().clone(),
            width: *request.width(),
            height: *request.height(),
            character_reference: BASE64.encode(reference),
            user_id: self.user_id.clone(),
        };

        let reply = self.launch(&body).await?;
        let image = self.fetch_image(&reply.image_url).await?;
        debug!(bytes = image.len(), "Received rendered image");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_reference_image_is_reported_with_path() {
        let client = RunComfyClient::new("key", "user");
        let request = ImageRequest::builder()
            .prompt("abandoned farmhouse at dusk")
            .reference_image("/nonexistent/narrator.png")
            .build()
            .unwrap();
        let err = client.generate_image(&request).await.unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/narrator.png"));
    }
}
