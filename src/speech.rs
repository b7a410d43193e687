//! Speech synthesis via the generative language TTS endpoint
//!
//! Requests an audio-modality response, decodes the inline base64 PCM it
//! returns, and packages it as a playable WAV buffer. The sample rate is
//! carried as a `rate=` parameter on the response MIME type.

use crate::audio::{decode_base64, pcm_from_bytes, pcm_to_wav};
use crate::client::{
    Content, GenerateClient, GenerateRequest, GenerationConfig, Part, PrebuiltVoiceConfig,
    SpeechConfig, VoiceConfig,
};
use crate::{Error, Result};

/// Model used for speech synthesis
const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Prebuilt voice used when the caller does not pick one
pub const DEFAULT_VOICE: &str = "Rasalgethi";

/// Sample rate assumed when the response MIME type carries no `rate=` parameter
const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Synthesizes spoken audio for quotations
pub struct SpeechSynthesizer {
    client: GenerateClient,
    voice: String,
}

impl SpeechSynthesizer {
    /// Create a new synthesizer using the default voice
    #[must_use]
    pub fn new(client: GenerateClient) -> Self {
        Self::with_voice(client, DEFAULT_VOICE)
    }

    /// Create a new synthesizer with a specific prebuilt voice
    #[must_use]
    pub fn with_voice(client: GenerateClient, voice: impl Into<String>) -> Self {
        Self {
            client,
            voice: voice.into(),
        }
    }

    /// Synthesize `text` and return a complete WAV byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetryExhausted`] when the API stays unreachable,
    /// [`Error::MalformedResponse`] when the response carries no usable
    /// audio, or [`Error::Decode`]/[`Error::InvalidSample`] when the inline
    /// payload is corrupt.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = build_request(text, &self.voice);
        let response = self.client.generate(TTS_MODEL, &request).await?;
        let audio = response.inline_audio()?;

        if !audio.mime_type.starts_with("audio/") {
            return Err(Error::MalformedResponse(format!(
                "expected an audio MIME type, got {}",
                audio.mime_type
            )));
        }

        let sample_rate = parse_rate_param(&audio.mime_type).unwrap_or(DEFAULT_SAMPLE_RATE);
        let pcm = pcm_from_bytes(&decode_base64(&audio.data)?)?;

        tracing::debug!(
            samples = pcm.len(),
            sample_rate,
            mime_type = %audio.mime_type,
            "synthesized speech"
        );

        pcm_to_wav(&pcm, sample_rate)
    }
}

fn build_request(text: &str, voice: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: None,
            parts: vec![Part {
                text: Some(format!("Say in a calm, thoughtful tone: {text}")),
                ..Part::default()
            }],
        }],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.to_string(),
                    },
                },
            }),
            ..GenerationConfig::default()
        }),
    }
}

/// Extract the sample rate from a MIME type's `rate=<int>` parameter.
///
/// Returns `None` if no parameter parses as an integer, e.g. for a bare
/// `audio/L16`.
fn parse_rate_param(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|value| value.parse().ok())
}
