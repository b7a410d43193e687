//! Resilient JSON client for the generative language API
//!
//! One request/retry/decode pattern, used by both the quote lookup and the
//! speech synthesis call. Transient failures (transport errors, non-success
//! statuses, unparsable response envelopes) are retried with exponential
//! backoff up to a bound; schema-shape failures after a valid envelope are
//! contract errors and surface immediately.

pub mod retry;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use retry::RetryPolicy;

/// Production endpoint for the generative language API
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Issues `generateContent` requests with bounded retry
pub struct GenerateClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    policy: RetryPolicy,
}

impl GenerateClient {
    /// Create a new client for the production endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config(
                "API key required for generation requests".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            policy: RetryPolicy::default(),
        })
    }

    /// Override the endpoint base URL (tests point this at a mock server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// POST a generation request to `model`, retrying transient failures.
    ///
    /// The attempt counter is incremented before the backoff wait is
    /// computed, so the first wait is `base_delay * multiplier`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetryExhausted`] wrapping the last transient error
    /// once the attempt bound is reached; non-transient errors pass through
    /// unretried.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&url, request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        tracing::error!(
                            model,
                            attempts = attempt,
                            waited_ms =
                                u64::try_from(self.policy.total_backoff().as_millis())
                                    .unwrap_or(u64::MAX),
                            error = %err,
                            "generation request failed, giving up"
                        );
                        return Err(Error::RetryExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }

                    let delay = retry::delay_for_attempt(&self.policy, attempt);
                    tracing::warn!(
                        model,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "generation request failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Perform a single attempt: POST, status check, envelope parse.
    async fn send_once(&self, url: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self.client.post(url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Request body for `generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation turns; a single user turn for both call sites here
    pub contents: Vec<Content>,
    /// Output shaping (structured JSON or audio modality)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a turn: text or inline binary data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Inline base64 payload with its MIME type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// e.g. `audio/L16;codec=pcm;rate=24000`
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Output shaping for `generateContent`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Structured-output schema, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

/// Voice selection for audio responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

/// Response envelope for `generateContent`
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// First part of the first candidate, if any
    fn first_part(&self) -> Option<&Part> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
    }

    /// The designated text field of the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the response carries no text
    /// part; the envelope was valid, so this is not retried.
    pub fn text(&self) -> Result<&str> {
        self.first_part()
            .and_then(|part| part.text.as_deref())
            .ok_or_else(|| Error::MalformedResponse("response carries no text part".to_string()))
    }

    /// The inline audio payload of the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the response carries no
    /// inline data part.
    pub fn inline_audio(&self) -> Result<&InlineData> {
        self.first_part()
            .and_then(|part| part.inline_data.as_ref())
            .ok_or_else(|| {
                Error::MalformedResponse("response carries no inline audio data".to_string())
            })
    }
}
