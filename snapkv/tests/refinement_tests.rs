mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use snapkv::config::RefinementConfig;
use snapkv::error::SnapError;
use snapkv::models::{KvPair, RawImage};
use snapkv::refine::RefinementProvider;

use common::{init_test_logger, pipeline_with, png_bytes, FakeRecognizer};

fn refinement_config(server: &MockServer) -> RefinementConfig {
    let mut config = RefinementConfig::new("test-key");
    config.base_url = server.uri();
    config.timeout_secs = 5;
    config
}

fn sample_pairs() -> Vec<KvPair> {
    vec![KvPair::new("Name", "Jonh Smith"), KvPair::new("Age", "3O")]
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_successful_refinement_returns_pairs_unchanged() {
    init_test_logger();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama3-8b-8192",
            "temperature": 0.0,
            "messages": [{"role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            "- Name: John Smith\n- Age: 30",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RefinementProvider::new(Some(&refinement_config(&server)));
    let pairs = sample_pairs();

    assert_eq!(provider.refine(pairs.clone()).await, pairs);
}

#[tokio::test]
async fn test_prompt_lists_every_pair() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("ok")))
        .mount(&server)
        .await;

    let provider = RefinementProvider::new(Some(&refinement_config(&server)));
    let reply = provider.try_refine(&sample_pairs()).await.unwrap();
    assert_eq!(reply.as_deref(), Some("ok"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.starts_with("Clean and correct these extracted key-value pairs from OCR."));
    assert!(prompt.contains("- Name: Jonh Smith\n- Age: 3O\n"));
}

#[tokio::test]
async fn test_server_error_falls_back_to_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(2)
        .mount(&server)
        .await;

    let provider = RefinementProvider::new(Some(&refinement_config(&server)));

    let err = provider.try_refine(&sample_pairs()).await.unwrap_err();
    assert!(matches!(
        err,
        SnapError::Refinement(ref msg) if msg == "API call failed with status 500: upstream exploded"
    ));

    // A single request per call; the mock expects exactly two.
    let pairs = sample_pairs();
    assert_eq!(provider.refine(pairs.clone()).await, pairs);
}

#[tokio::test]
async fn test_malformed_json_falls_back_to_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let provider = RefinementProvider::new(Some(&refinement_config(&server)));

    assert!(provider.try_refine(&sample_pairs()).await.is_err());
    let pairs = sample_pairs();
    assert_eq!(provider.refine(pairs.clone()).await, pairs);
}

#[tokio::test]
async fn test_missing_choices_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = RefinementProvider::new(Some(&refinement_config(&server)));

    let err = provider.try_refine(&sample_pairs()).await.unwrap_err();
    assert!(matches!(err, SnapError::Refinement(ref msg) if msg == "API response missing choices"));
}

#[tokio::test]
async fn test_timeout_falls_back_to_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = refinement_config(&server);
    config.timeout_secs = 1;
    let provider = RefinementProvider::new(Some(&config));

    assert!(provider.try_refine(&sample_pairs()).await.is_err());
    let pairs = sample_pairs();
    assert_eq!(provider.refine(pairs.clone()).await, pairs);
}

#[tokio::test]
async fn test_empty_pairs_make_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let provider = RefinementProvider::new(Some(&refinement_config(&server)));
    assert!(provider.refine(Vec::new()).await.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_does_not_fail_pipeline() {
    init_test_logger();
    let server = MockServer::start().await;
    let mut config = refinement_config(&server);
    // Shut the server down so the address refuses connections.
    drop(server);
    config.timeout_secs = 2;

    let recognizer = FakeRecognizer::new("Name: John Smith\nAge - 30\nInvoice Number 44521\n");
    let pipeline = pipeline_with(recognizer.clone(), RefinementProvider::new(Some(&config)));

    let report = pipeline
        .run(RawImage::new(png_bytes(), Some("image/png".to_string())))
        .await
        .expect("refinement failure must not surface");

    assert_eq!(
        report.pairs,
        vec![
            KvPair::new("Name", "John Smith"),
            KvPair::new("Age", "30"),
            KvPair::new("Invoice Number", "44521"),
        ]
    );
    assert!(report.warning.is_none());
    assert_eq!(recognizer.calls(), 1);
}
