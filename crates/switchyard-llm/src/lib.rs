//! # switchyard-llm
//!
//! Clients for the two external services the router depends on:
//! an OpenAI-compatible chat completion endpoint and an Ollama-style
//! embedding endpoint.

pub mod completion_client;
pub mod embedding_client;

pub use completion_client::OpenAiCompatClient;
pub use embedding_client::OllamaEmbeddingProvider;

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
