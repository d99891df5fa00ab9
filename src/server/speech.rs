use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::warn;
use uuid::Uuid;

/// Configuration for the external speech services.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// API key for the TTS service (from IAPP_API_KEY env var)
    pub tts_api_key: String,
    /// TTS endpoint URL
    pub tts_url: String,
    /// Whisper-compatible transcription endpoint URL
    pub stt_url: String,
    /// Bearer token for the STT service, when it requires one
    pub stt_api_key: Option<String>,
}

impl SpeechConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let tts_api_key =
            std::env::var("IAPP_API_KEY").context("IAPP_API_KEY environment variable not set")?;

        Ok(Self {
            tts_api_key,
            tts_url: std::env::var("TTS_URL")
                .unwrap_or_else(|_| "https://api.iapp.co.th/thai-tts-kaitom2/tts".to_string()),
            stt_url: std::env::var("STT_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1/audio/transcriptions".to_string()),
            stt_api_key: std::env::var("STT_API_KEY").ok(),
        })
    }
}

/// Client for the Thai TTS service and a whisper-compatible STT endpoint.
///
/// Both directions degrade rather than abort: a conversation without audio
/// is still a conversation, and an empty transcript is handled by the
/// dialogue script like any other reply.
pub struct SpeechClient {
    client: Client,
    config: SpeechConfig,
    cache_dir: PathBuf,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig, cache_dir: PathBuf) -> Self {
        Self {
            client: Client::new(),
            config,
            cache_dir,
        }
    }

    /// Synthesize a robot line into the audio cache and return the public
    /// URL path of the WAV file. `None` when synthesis failed.
    pub async fn synthesize(&self, text: &str) -> Option<String> {
        match self.try_synthesize(text).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("TTS request failed: {:#}", e);
                None
            }
        }
    }

    async fn try_synthesize(&self, text: &str) -> Result<String> {
        let form = reqwest::multipart::Form::new()
            .text("text", text.to_string())
            .text("language", "TH");

        let response = self
            .client
            .post(&self.config.tts_url)
            .header("apikey", &self.config.tts_api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to send TTS request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("TTS service error: {} - {}", status, body);
        }

        let bytes = response.bytes().await.context("Failed to read TTS audio body")?;
        let filename = format!("{}.wav", Uuid::new_v4());
        let path = self.cache_dir.join(&filename);
        std::fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write audio file: {:?}", path))?;

        Ok(format!("/audio/{}", filename))
    }

    /// Transcribe patient audio. An empty transcript on failure.
    pub async fn transcribe(&self, wav: Vec<u8>) -> String {
        match self.try_transcribe(wav).await {
            Ok(text) => text,
            Err(e) => {
                warn!("STT request failed: {:#}", e);
                String::new()
            }
        }
    }

    async fn try_transcribe(&self, wav: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .context("Failed to build audio part")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("language", "th")
            .text("response_format", "json");

        let mut request = self.client.post(&self.config.stt_url).multipart(form);
        if let Some(key) = &self.config.stt_api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.context("Failed to send STT request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("STT service error: {} - {}", status, body);
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse STT response")?;
        Ok(body.text.trim().to_string())
    }
}

#[derive(Debug, serde::Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}
