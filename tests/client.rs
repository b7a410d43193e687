//! Request client integration tests
//!
//! Drives the retry loop against a mock HTTP server: transient failures are
//! retried with backoff up to the bound, schema-shape failures are not.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quotevox::client::{Content, GenerateRequest, Part};
use quotevox::{Error, GenerateClient, QuoteFinder, RetryPolicy};

const MODEL: &str = "test-model";

/// Default policy shape with millisecond delays so tests stay fast
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_millis(2),
        multiplier: 2,
    }
}

fn client_for(server: &MockServer) -> GenerateClient {
    GenerateClient::new("test_key")
        .unwrap()
        .with_base_url(server.uri())
        .with_retry_policy(fast_policy())
}

fn text_request(text: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
                ..Part::default()
            }],
        }],
        generation_config: None,
    }
}

fn envelope_with_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            }
        }]
    })
}

fn endpoint(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

#[tokio::test]
async fn succeeds_on_first_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .and(query_param("key", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(MODEL, &text_request("hi"))
        .await
        .unwrap();

    assert_eq!(response.text().unwrap(), "hello");
}

#[tokio::test]
async fn retries_server_errors_until_success() {
    let server = MockServer::start().await;

    // First four attempts fail, fifth succeeds
    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text("eventually")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(MODEL, &text_request("hi"))
        .await
        .unwrap();

    assert_eq!(response.text().unwrap(), "eventually");
}

#[tokio::test]
async fn exhaustion_surfaces_last_error_and_stops() {
    let server = MockServer::start().await;

    // Exactly five attempts, never a sixth
    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(5)
        .mount(&server)
        .await;

    let result = client_for(&server).generate(MODEL, &text_request("hi")).await;

    match result {
        Err(Error::RetryExhausted { attempts, source }) => {
            assert_eq!(attempts, 5);
            assert!(matches!(*source, Error::Status { status: 503, .. }));
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }

    server.verify().await;
}

#[tokio::test]
async fn unparsable_envelope_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(MODEL, &text_request("hi"))
        .await
        .unwrap();

    assert_eq!(response.text().unwrap(), "recovered");
}

#[tokio::test]
async fn backoff_delays_grow_exponentially() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(endpoint(MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_millis(20),
        multiplier: 2,
    };
    let client = GenerateClient::new("test_key")
        .unwrap()
        .with_base_url(server.uri())
        .with_retry_policy(policy);

    let start = Instant::now();
    client.generate(MODEL, &text_request("hi")).await.unwrap();

    // Two failures wait base*2 + base*4 = 120ms before the third attempt
    assert!(
        start.elapsed() >= Duration::from_millis(120),
        "elapsed {:?} shorter than the expected backoff",
        start.elapsed()
    );
}

#[tokio::test]
async fn malformed_quote_payload_is_not_retried() {
    let server = MockServer::start().await;

    // Valid envelope whose nested text is not the expected JSON document
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope_with_text("no quote today")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let finder = QuoteFinder::new(client_for(&server));
    let result = finder.find("anything").await;

    assert!(matches!(result, Err(Error::MalformedResponse(_))));
    server.verify().await;
}

#[tokio::test]
async fn missing_text_part_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let finder = QuoteFinder::new(client_for(&server));
    let result = finder.find("anything").await;

    assert!(matches!(result, Err(Error::MalformedResponse(_))));
    server.verify().await;
}
