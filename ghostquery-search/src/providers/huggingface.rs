//! Hugging Face generative adapter over the inference API.
//!
//! Unlike the prompt-driven backends, this adapter embeds the query with a
//! sentence-transformer model and generates results from the semantic
//! signal: the embedding magnitude classifies query complexity, keyword
//! categories select topical templates. A missing API key settles to
//! [`SearchError::Unconfigured`] without touching the network, same as
//! Grok, and the aggregator serves that share from the synthesizer.

use crate::config::{HuggingFaceConfig, PROBE_TIMEOUT_MS};
use crate::error::{Result, SearchError};
use crate::http;
use crate::provider::{map_transport_err, ProviderAdapter, ProviderOutcome};
use crate::types::{ProviderKind, SearchQuery, SearchResult};
use serde::Deserialize;
use serde_json::json;

/// Embedding vectors with L2 norm above this are treated as complex
/// queries worth a trend-analysis result.
const COMPLEX_MAGNITUDE: f64 = 15.0;

/// Words that mark an interrogative query.
const QUESTION_WORDS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "can", "should", "will", "is", "are",
    "does",
];

/// Adapter for the Hugging Face inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
}

/// The inference API returns one vector per input, but single-input calls
/// may come back as a flat vector.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Nested(Vec<Vec<f64>>),
    Flat(Vec<f64>),
}

impl EmbeddingResponse {
    fn into_query_vector(self) -> Vec<f64> {
        match self {
            Self::Nested(mut rows) => {
                if rows.is_empty() {
                    Vec::new()
                } else {
                    rows.swap_remove(0)
                }
            }
            Self::Flat(row) => row,
        }
    }
}

impl HuggingFaceProvider {
    /// Create the adapter after validating the endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an empty base URL or a zero
    /// timeout. A missing API key is not an error.
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        crate::config::validate_endpoint(&config.base_url, config.timeout_ms)?;
        Ok(Self { config })
    }

    /// Embed one text through the inference API.
    async fn embed(&self, text: &str, timeout_ms: u64) -> Result<Vec<f64>> {
        let client = http::build_client(timeout_ms)?;
        let url = format!("{}/models/{}", self.config.base_url, self.config.embedding_model);
        let body = json!({
            "inputs": [text],
            "options": {"wait_for_model": true}
        });
        let response = client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_err(e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Upstream(status.as_u16()));
        }

        let payload: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("invalid embedding response: {e}")))?;
        Ok(payload.into_query_vector())
    }
}

impl ProviderAdapter for HuggingFaceProvider {
    async fn fetch(&self, query: &SearchQuery, share: usize) -> ProviderOutcome {
        if !self.config.is_configured() {
            tracing::debug!(query = query.text(), "Hugging Face key absent, offline mode");
            return Err(SearchError::Unconfigured(
                "no Hugging Face API key set".into(),
            ));
        }

        tracing::debug!(
            query = query.text(),
            model = %self.config.embedding_model,
            "embedding query via Hugging Face"
        );
        let embedding = self.embed(query.text(), self.config.timeout_ms).await?;
        let magnitude = l2_norm(&embedding);

        Ok(contextual_results(query.text(), magnitude, share))
    }

    /// Always reports healthy, same policy as the other credential-gated
    /// backend: without a key the synthesizer serves every request, and a
    /// failing API falls through to synthesis at the aggregator.
    /// Connectivity is checked with a one-word embedding and logged.
    async fn probe(&self) -> bool {
        if !self.config.is_configured() {
            return true;
        }
        let reachable = self.embed("ping", PROBE_TIMEOUT_MS).await.is_ok();
        if !reachable {
            tracing::warn!(
                "Hugging Face API unreachable, requests will serve synthesized results"
            );
        }
        true
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }
}

/// Euclidean norm of the query embedding. Empty vector norms to zero.
fn l2_norm(vector: &[f64]) -> f64 {
    vector.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn is_question(query_lower: &str) -> bool {
    query_lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| QUESTION_WORDS.contains(&word))
}

/// Generate results from the query's semantic signal.
///
/// Keyword categories each emit one templated result; an overview and a
/// practical-applications result are always present; interrogative queries
/// get an expert-answer result and high-magnitude embeddings a trend
/// analysis. Output is truncated to `share`; the aggregator ranks.
fn contextual_results(query: &str, magnitude: f64, share: usize) -> Vec<SearchResult> {
    let query_lower = query.to_lowercase();
    let contains_any =
        |keywords: &[&str]| keywords.iter().any(|keyword| query_lower.contains(keyword));

    let mut results = Vec::new();
    let mut push = |title: String, snippet: String, url: Option<String>, score: f64, source: &str| {
        results.push(SearchResult {
            title,
            snippet,
            url,
            relevance_score: score,
            source: source.to_owned(),
            organization: None,
            last_updated: None,
        });
    };
    let encoded = urlencoding::encode(query).into_owned();

    if contains_any(&[
        "science", "research", "study", "data", "analysis", "experiment", "hypothesis", "theory",
    ]) {
        push(
            format!("Scientific Research on {query}"),
            format!(
                "Comprehensive scientific analysis and research findings related to {query}. \
                 Includes peer-reviewed studies, experimental data, theoretical frameworks, and \
                 evidence-based conclusions from the scientific community."
            ),
            Some(format!("https://scholar.google.com/scholar?q={encoded}")),
            0.95,
            "AI Scientific Analysis",
        );
    }
    if contains_any(&[
        "technology", "software", "programming", "computer", "digital", "algorithm", "system",
        "development",
    ]) {
        push(
            format!("Technical Deep Dive: {query}"),
            format!(
                "In-depth technical exploration of {query} covering implementation details, best \
                 practices, architecture patterns, and practical applications across systems."
            ),
            Some(format!("https://github.com/search?q={encoded}&type=repositories")),
            0.92,
            "AI Technical Intelligence",
        );
    }
    if contains_any(&[
        "health", "medical", "medicine", "treatment", "disease", "wellness", "therapy",
        "diagnosis",
    ]) {
        push(
            format!("Medical Information: {query}"),
            format!(
                "Evidence-based medical information about {query} from authoritative healthcare \
                 sources. Includes diagnosis, treatment options, prevention strategies, and recent \
                 research findings from peer-reviewed journals."
            ),
            Some(format!("https://pubmed.ncbi.nlm.nih.gov/?term={encoded}")),
            0.90,
            "AI Medical Knowledge",
        );
    }
    if contains_any(&[
        "business", "market", "company", "industry", "economics", "finance", "strategy",
        "management",
    ]) {
        push(
            format!("Business Intelligence: {query}"),
            format!(
                "Strategic business analysis of {query} including market trends, competitive \
                 landscape, growth opportunities, and key indicators for decision-makers."
            ),
            Some(format!("https://www.bloomberg.com/search?query={encoded}")),
            0.88,
            "AI Business Analytics",
        );
    }
    if contains_any(&[
        "education", "learning", "teaching", "course", "tutorial", "guide", "example",
        "explanation",
    ]) {
        push(
            format!("Complete Learning Guide: {query}"),
            format!(
                "Comprehensive educational resource for {query} designed for learners at all \
                 levels, with structured lessons, practical exercises, and step-by-step tutorials."
            ),
            Some(format!("https://www.coursera.org/search?query={encoded}")),
            0.85,
            "AI Educational Curation",
        );
    }

    push(
        format!("AI-Powered Overview: {query}"),
        format!(
            "Comprehensive AI-generated overview of {query} synthesizing information from \
             multiple authoritative sources: context, key insights, practical applications, and \
             related concepts."
        ),
        None,
        0.82,
        "AI Knowledge Synthesis",
    );

    if is_question(&query_lower) {
        push(
            format!("Expert Q&A: {query}"),
            format!(
                "Detailed answers about {query} based on expert knowledge and comprehensive \
                 analysis, with multiple perspectives and actionable insights."
            ),
            None,
            0.87,
            "AI Expert System",
        );
    }
    if magnitude > COMPLEX_MAGNITUDE {
        push(
            format!("Future Trends & Analysis: {query}"),
            format!(
                "Forward-looking analysis of {query} covering emerging trends, future \
                 developments, and potential implications based on current data patterns."
            ),
            None,
            0.75,
            "AI Trend Analysis",
        );
    }
    push(
        format!("Practical Applications of {query}"),
        format!(
            "Real-world applications and case studies demonstrating how {query} is implemented \
             in practice, including common challenges and lessons learned across industries."
        ),
        None,
        0.78,
        "AI Application Intelligence",
    );

    results.truncate(share);
    results
}
