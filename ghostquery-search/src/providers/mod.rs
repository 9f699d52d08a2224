//! Concrete adapters for the supported upstreams.

pub mod datagov;
pub mod eu_portal;
pub mod grok;
pub mod huggingface;
pub mod ollama;

pub use datagov::DataGovProvider;
pub use eu_portal::EuPortalProvider;
pub use grok::GrokProvider;
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;
