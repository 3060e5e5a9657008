//! ElevenLabs voice synthesis client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, instrument};
use vignette_error::{HttpError, VignetteResult};
use vignette_interface::VoiceSynthesis;

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";
const ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";

/// A named narrator voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarratorVoice {
    /// Human-readable voice name
    pub name: &'static str,
    /// Provider voice identifier
    pub id: &'static str,
}

/// The narrator voices offered to callers.
pub fn narrator_voices() -> &'static [NarratorVoice] {
    &[
        NarratorVoice {
            name: "Rachel",
            id: "21m00Tcm4TlvDq8ikWAM",
        },
        NarratorVoice {
            name: "Drew",
            id: "29vD33N1CtxCmqQRPOHJ",
        },
        NarratorVoice {
            name: "Charlotte",
            id: "XB0fDUnXU5powFXDhCwa",
        },
    ]
}

/// Text-to-speech request body.
#[derive(Debug, Clone, Serialize)]
struct SpeechBody {
    text: String,
    model_id: String,
}

/// ElevenLabs text-to-speech client.
///
/// Returns MP3 bytes for a narration text and voice identity.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl ElevenLabsClient {
    /// Creates a new ElevenLabs client.
    pub fn new(api_key: impl Into<String>) -> Self {
        debug!("Creating new ElevenLabs client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_url: ELEVENLABS_API_URL.to_string(),
        }
    }

    /// Overrides the API endpoint. Used by tests.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl VoiceSynthesis for ElevenLabsClient {
    #[instrument(skip(self, text), fields(voice_id = %voice_id, text_len = text.len()))]
    async fn synthesize(&self, text: &str, voice_id: &str) -> VignetteResult<Vec<u8>> {
        let url = format!(
            "{}/text-to-speech/{voice_id}",
            self.api_url.trim_end_matches('/')
        );
        debug!(url = %url, "Sending voice synthesis request");

        let body = SpeechBody {
            text: text.to_string(),
            model_id: ELEVENLABS_MODEL.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send voice synthesis request");
                HttpError::new(format!("Voice synthesis request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "ElevenLabs API returned error");
            return Err(HttpError::new(format!(
                "ElevenLabs API error {status}: {body}"
            ))
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| {
            HttpError::new(format!("Failed to read audio bytes: {e}"))
        })?;
        debug!(bytes = bytes.len(), "Received synthesized audio");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_roster_is_stable() {
        let voices = narrator_voices();
        assert_eq!(voices.len(), 3);
        let rachel = voices.iter().find(|v| v.name == "Rachel").unwrap();
        assert_eq!(rachel.id, "21m00Tcm4TlvDq8ikWAM");
    }
}
