//! Machine translation delegated to an external service.
//!
//! [`HttpTranslator`] speaks the LibreTranslate JSON API. Every failure, from an unusable
//! language code to a dropped connection, comes back as a [`TranslateError`] whose message is
//! safe to show to the caller.
use crate::client::HttpClient;
use async_trait::async_trait;
use axum::body::Body;
use bon::Builder;
use hyper::{Method, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

/// Upper bound on how much of an upstream response body is buffered.
const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("Invalid language code")]
    InvalidLanguage,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Invalid response from translation API")]
    InvalidResponse,
    #[error("Translation API returned the input string unchanged.")]
    NotTranslated,
}

#[async_trait]
pub trait Translator: std::fmt::Debug + Send + Sync {
    /// Translates `text` into the language identified by `target`. The code is passed through
    /// as-is; its validity is for the backend to decide.
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: String,
}

/// A [`Translator`] backed by a LibreTranslate-compatible HTTP endpoint.
#[derive(Debug, Clone, Builder)]
pub struct HttpTranslator<T: HttpClient> {
    client: T,
    /// Base URL of the service; requests go to `{base_url}/translate`.
    base_url: Url,
    api_key: Option<String>,
}

impl<T: HttpClient> HttpTranslator<T> {
    fn endpoint(&self) -> Result<Url, TranslateError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join("translate")
            .map_err(|e| TranslateError::Transport(e.to_string()))
    }
}

#[async_trait]
impl<T: HttpClient + Send + Sync> Translator for HttpTranslator<T> {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        if target.trim().is_empty() {
            return Err(TranslateError::InvalidLanguage);
        }

        let payload = TranslateRequest {
            q: text,
            source: "auto",
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let body =
            serde_json::to_vec(&payload).map_err(|e| TranslateError::Transport(e.to_string()))?;

        let endpoint = self.endpoint()?;
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri(endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|e| TranslateError::Transport(e.to_string()))?;

        debug!("Forwarding translation request to {}", endpoint);
        let response = self.client.request(req).await.map_err(|e| {
            warn!("Error contacting translation API at {}: {}", endpoint, e);
            TranslateError::Transport(e.to_string())
        })?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| TranslateError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<UpstreamError>(&bytes)
                .map(|e| e.error)
                .unwrap_or_else(|_| {
                    format!("Translation API returned status {}", status.as_u16())
                });
            warn!("Translation API rejected request: {}", message);
            return Err(TranslateError::Upstream(message));
        }

        let parsed: TranslateResponse =
            serde_json::from_slice(&bytes).map_err(|_| TranslateError::InvalidResponse)?;

        if parsed.translated_text.trim() == text.trim() {
            return Err(TranslateError::NotTranslated);
        }
        Ok(parsed.translated_text)
    }
}
