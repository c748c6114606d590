/// Request and response payloads for the text endpoints.
use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;
use crate::text::Category;

/// Default target language for `/translate`.
pub const DEFAULT_LANG: &str = "es";

/// The JSON body accepted by every text endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateQuery {
    pub lang: Option<String>,
}

impl TranslateQuery {
    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SentimentResponse {
    pub original: String,
    pub sentiment: Sentiment,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryResponse {
    pub original: String,
    pub summary: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TranslationResponse {
    pub original: String,
    pub translated: String,
    pub lang: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryResponse {
    pub original: String,
    pub category: Category,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadSummaryResponse {
    pub filename: String,
    pub summary: String,
    /// Word count of the decoded file, not its size in bytes.
    pub original_length: usize,
}
