//! Generative Provider Contract Tests
//!
//! These tests verify HTTP API format compliance for the Ollama, Grok, and
//! Hugging Face adapters: request shape, structured and prose output
//! recovery, and the offline synthesis path when a credential-gated
//! backend has no key.

use ghostquery_search::{
    Aggregator, GrokConfig, GrokProvider, HuggingFaceConfig, HuggingFaceProvider, OllamaConfig,
    OllamaProvider, ProviderAdapter, SearchError, SearchQuery,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama_config(server: &MockServer) -> OllamaConfig {
    OllamaConfig {
        base_url: server.uri(),
        model: "llama3.2:3b".into(),
        timeout_ms: 5_000,
    }
}

fn grok_config(server: &MockServer) -> GrokConfig {
    GrokConfig {
        api_key: Some("xai-test-key".into()),
        base_url: format!("{}/v1", server.uri()),
        model: "grok-beta".into(),
        timeout_ms: 5_000,
    }
}

fn huggingface_config(server: &MockServer) -> HuggingFaceConfig {
    HuggingFaceConfig {
        api_key: Some("hf-test-key".into()),
        base_url: server.uri(),
        embedding_model: "sentence-transformers/all-MiniLM-L6-v2".into(),
        timeout_ms: 5_000,
    }
}

fn structured_model_output() -> String {
    json!({
        "results": [
            {"title": "Solar Capacity Statistics", "snippet": "Installed capacity by country.", "url": "https://example.org/solar", "relevance_score": 0.95},
            {"title": "Grid Integration Studies", "snippet": "How grids absorb variable generation.", "relevance_score": 0.85}
        ]
    })
    .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Ollama
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ollama_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2:3b",
            "stream": false,
            "options": {"temperature": 0.7, "top_p": 0.9, "num_predict": 2000}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2:3b",
            "response": structured_model_output(),
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(ollama_config(&server)).unwrap();
    let query = SearchQuery::new("solar power", 10).unwrap();
    let results = provider.fetch(&query, 10).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Solar Capacity Statistics");
    assert!((results[0].relevance_score - 0.95).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_ollama_prose_output_falls_back_to_paragraphs() {
    let server = MockServer::start().await;

    let prose = "Renewable Generation Overview\nWind and solar now account for a growing share of installed capacity across most national grids.\n\nStorage Outlook\nBattery storage deployments have accelerated sharply as costs fall, changing how peak demand is served.";
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": prose, "done": true})),
        )
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(ollama_config(&server)).unwrap();
    let query = SearchQuery::new("renewables", 10).unwrap();
    let results = provider.fetch(&query, 10).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Renewable Generation Overview");
    assert_eq!(results[0].source, "Ollama AI");
    assert!(results[0].relevance_score > results[1].relevance_score);
}

#[tokio::test]
async fn test_ollama_error_status_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(ollama_config(&server)).unwrap();
    let query = SearchQuery::new("anything", 10).unwrap();
    let err = provider.fetch(&query, 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Upstream(500)));
}

#[tokio::test]
async fn test_ollama_probe_checks_tags_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(ollama_config(&server)).unwrap();
    assert!(provider.probe().await);
}

#[tokio::test]
async fn test_unreachable_ollama_probe_reports_unhealthy() {
    let provider = OllamaProvider::new(OllamaConfig {
        base_url: "http://127.0.0.1:1".into(),
        ..Default::default()
    })
    .unwrap();
    assert!(!provider.probe().await);
}

// ────────────────────────────────────────────────────────────────────────────
// Grok
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_grok_request_carries_bearer_key_and_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer xai-test-key"))
        .and(body_partial_json(json!({
            "model": "grok-beta",
            "temperature": 0.7,
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": structured_model_output()}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GrokProvider::new(grok_config(&server)).unwrap();
    let query = SearchQuery::new("solar power", 10).unwrap();
    let results = provider.fetch(&query, 10).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].source, "Grok AI");
}

#[tokio::test]
async fn test_grok_empty_choices_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = GrokProvider::new(grok_config(&server)).unwrap();
    let query = SearchQuery::new("anything", 10).unwrap();
    let err = provider.fetch(&query, 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Parse(_)));
}

#[tokio::test]
async fn test_unconfigured_grok_never_touches_the_network() {
    let server = MockServer::start().await;

    // Zero expected calls: the offline path must short-circuit.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = GrokProvider::new(GrokConfig {
        api_key: None,
        base_url: format!("{}/v1", server.uri()),
        ..Default::default()
    })
    .unwrap();
    let query = SearchQuery::new("machine learning research", 10).unwrap();
    let err = provider.fetch(&query, 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Unconfigured(_)));
}

#[tokio::test]
async fn test_grok_aggregator_upstream_failure_degrades_to_synthesis() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let aggregator = Aggregator::grok(grok_config(&server)).unwrap();
    let query = SearchQuery::new("climate research", 5).unwrap();
    let response = aggregator.search(&query).await;

    assert!(!response.results.is_empty());
    assert!(response.results.len() <= 5);
    assert!(response.summary.contains("synthesized"));
}

#[tokio::test]
async fn test_grok_probe_stays_healthy_when_api_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = GrokProvider::new(grok_config(&server)).unwrap();
    assert!(provider.probe().await);
}

// ────────────────────────────────────────────────────────────────────────────
// Hugging Face
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_huggingface_embedding_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/sentence-transformers/all-MiniLM-L6-v2"))
        .and(header("authorization", "Bearer hf-test-key"))
        .and(body_partial_json(json!({
            "inputs": ["quantum computing research"],
            "options": {"wait_for_model": true}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2, 0.3]])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = HuggingFaceProvider::new(huggingface_config(&server)).unwrap();
    let query = SearchQuery::new("quantum computing research", 10).unwrap();
    let results = provider.fetch(&query, 10).await.unwrap();

    // "research" matches the scientific category; overview and
    // applications are always present.
    assert!(results.iter().any(|r| r.source == "AI Scientific Analysis"));
    assert!(results.iter().any(|r| r.source == "AI Knowledge Synthesis"));
    assert!(results
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.relevance_score)));
}

#[tokio::test]
async fn test_huggingface_accepts_flat_embedding_vector() {
    let server = MockServer::start().await;

    // High-magnitude vector: 20 along one axis marks a complex query.
    Mock::given(method("POST"))
        .and(path("/models/sentence-transformers/all-MiniLM-L6-v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([20.0, 0.0])))
        .mount(&server)
        .await;

    let provider = HuggingFaceProvider::new(huggingface_config(&server)).unwrap();
    let query = SearchQuery::new("solar panels", 10).unwrap();
    let results = provider.fetch(&query, 10).await.unwrap();

    assert!(results.iter().any(|r| r.source == "AI Trend Analysis"));
}

#[tokio::test]
async fn test_huggingface_error_status_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/sentence-transformers/all-MiniLM-L6-v2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = HuggingFaceProvider::new(huggingface_config(&server)).unwrap();
    let query = SearchQuery::new("anything", 10).unwrap();
    let err = provider.fetch(&query, 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Upstream(503)));
}

#[tokio::test]
async fn test_unconfigured_huggingface_never_touches_the_network() {
    let server = MockServer::start().await;

    // Zero expected calls: the offline path must short-circuit.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = HuggingFaceProvider::new(HuggingFaceConfig {
        api_key: None,
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();
    let query = SearchQuery::new("machine learning research", 10).unwrap();
    let err = provider.fetch(&query, 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Unconfigured(_)));
}

#[tokio::test]
async fn test_huggingface_probe_stays_healthy_when_api_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/sentence-transformers/all-MiniLM-L6-v2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = HuggingFaceProvider::new(huggingface_config(&server)).unwrap();
    assert!(provider.probe().await);
}

#[tokio::test]
async fn test_huggingface_aggregator_without_key_serves_synthesized_share() {
    let aggregator = Aggregator::huggingface(HuggingFaceConfig::default()).unwrap();
    let query = SearchQuery::new("climate research", 5).unwrap();
    let response = aggregator.search(&query).await;

    assert!(!response.results.is_empty());
    assert!(response.results.len() <= 5);
    assert!(response
        .results
        .iter()
        .all(|r| r.source.starts_with("Synthesized")));
}
