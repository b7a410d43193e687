//! Quote lookup via structured generation
//!
//! Asks the model for a quotation matching a free-text thought, constraining
//! the output with a JSON response schema, then parses the nested JSON
//! document the API returns inside its text part.

use serde::Deserialize;
use serde_json::json;

use crate::client::{Content, GenerateClient, GenerateRequest, GenerationConfig, Part};
use crate::{Error, Result};

/// Model used for quote lookup
const QUOTE_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// A quotation with its attribution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCard {
    /// The quotation text
    pub quote: String,
    /// Who said or wrote it
    pub author: String,
    /// Where the quotation comes from (speech, book passage, ...)
    pub source_description: String,
    /// Person-specific or book-specific attribution
    #[serde(flatten)]
    pub source: QuoteSource,
}

/// Attribution variants, keyed by the `sourceType` discriminator.
///
/// A person quote and a book quote carry different fields; the tagged enum
/// makes that exclusivity structural instead of a pile of nullable fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "sourceType", rename_all = "lowercase")]
pub enum QuoteSource {
    /// Quotation attributed to a person
    Person {
        /// e.g. "German"
        nationality: Option<String>,
        /// e.g. "physicist"
        field: Option<String>,
        /// e.g. "1879-1955"
        lifespan: Option<String>,
    },
    /// Passage from a book
    Book {
        #[serde(rename = "bookTitle")]
        book_title: String,
    },
}

/// Finds quotations matching a user's thought
pub struct QuoteFinder {
    client: GenerateClient,
}

impl QuoteFinder {
    /// Create a new finder over an existing client
    #[must_use]
    pub const fn new(client: GenerateClient) -> Self {
        Self { client }
    }

    /// Look up a quotation matching `thought`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetryExhausted`] when the API stays unreachable, or
    /// [`Error::MalformedResponse`] when the response does not contain a
    /// parseable quote document (not retried).
    pub async fn find(&self, thought: &str) -> Result<QuoteCard> {
        let request = build_request(thought);
        let response = self.client.generate(QUOTE_MODEL, &request).await?;
        let quote = parse_quote(response.text()?)?;

        tracing::debug!(author = %quote.author, "quote lookup succeeded");
        Ok(quote)
    }
}

/// Parse the nested JSON document carried in the response text part.
fn parse_quote(text: &str) -> Result<QuoteCard> {
    serde_json::from_str(text).map_err(|e| {
        Error::MalformedResponse(format!("quote payload is not the expected shape: {e}"))
    })
}

fn build_request(thought: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(build_prompt(thought)),
                ..Part::default()
            }],
        }],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema()),
            ..GenerationConfig::default()
        }),
    }
}

fn build_prompt(thought: &str) -> String {
    format!(
        "Find a quotation from a famous person, or a passage from a well-known \
         book, that matches or supports the user's thought. Respond in the \
         requested JSON shape.\n\
         \n\
         - 'sourceType': \"person\" if the quote comes from a person, \"book\" if \
         it comes from a book.\n\
         - 'quote': the quotation or passage.\n\
         - 'author': the author's name.\n\
         - 'sourceDescription': the concrete origin, e.g. 'speech at the March \
         on Washington, 1963' or 'a passage from the named book'.\n\
         - If 'sourceType' is \"person\", also fill 'nationality', 'field' \
         (e.g. 'philosopher', 'scientist') and 'lifespan' (e.g. '1879-1955').\n\
         - If 'sourceType' is \"book\", also fill 'bookTitle'.\n\
         \n\
         The user's thought: \"{thought}\""
    )
}

/// Structured-output schema constraining the model's response.
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sourceType": { "type": "STRING" },
            "quote": { "type": "STRING" },
            "author": { "type": "STRING" },
            "sourceDescription": { "type": "STRING", "nullable": true },
            "nationality": { "type": "STRING", "nullable": true },
            "field": { "type": "STRING", "nullable": true },
            "lifespan": { "type": "STRING", "nullable": true },
            "bookTitle": { "type": "STRING", "nullable": true }
        },
        "required": ["sourceType", "quote", "author", "sourceDescription"]
    })
}
