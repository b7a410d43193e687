//! Quotevox - quote lookup and spoken-audio delivery
//!
//! Given a free-text thought, asks a generative language API for a matching
//! quotation and optionally synthesizes spoken audio of it, delivered as a
//! self-contained WAV buffer.
//!
//! The crate is built around three small, composable pieces:
//! - [`audio`]: base64 decoding and WAV packaging of raw 16-bit mono PCM
//! - [`client`]: a JSON-in/JSON-out request client with bounded
//!   exponential-backoff retry
//! - [`quote`] / [`speech`]: the two call sites composing them
//!
//! ```text
//! thought ──▶ QuoteFinder ──▶ QuoteCard
//!                │ quote text
//!                ▼
//!          SpeechSynthesizer ──▶ base64 PCM ──▶ WAV bytes
//! ```

pub mod audio;
pub mod client;
pub mod error;
pub mod quote;
pub mod session;
pub mod speech;

pub use client::{GenerateClient, GenerateRequest, GenerateResponse};
pub use client::retry::RetryPolicy;
pub use error::{Error, Result};
pub use quote::{QuoteCard, QuoteFinder, QuoteSource};
pub use session::{RequestTracker, RequestToken};
pub use speech::{DEFAULT_VOICE, SpeechSynthesizer};
