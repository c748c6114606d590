/// Axum handlers for the text endpoints
use crate::AppState;
use crate::errors::ApiError;
use crate::models::{
    CategoryResponse, MessageResponse, SentimentResponse, SummaryResponse, TextInput,
    TranslateQuery, TranslationResponse, UploadSummaryResponse,
};
use crate::sentiment::Sentiment;
use crate::text;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use tracing::{debug, info, instrument};

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

const TEXT_EXTENSION: &str = ".txt";

#[instrument]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "🚀 Cognitive Twin API is running!".into(),
    })
}

#[instrument]
pub async fn hello(Path(name): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello {name}, welcome to your Cognitive Twin!"),
    })
}

#[instrument(skip(state, input))]
pub async fn analyze(
    State(state): State<AppState>,
    Json(input): Json<TextInput>,
) -> Json<SentimentResponse> {
    let score = state.sentiment.polarity(&input.text);
    let sentiment = Sentiment::from_polarity(score);
    debug!("Polarity {} labelled {:?}", score, sentiment);
    Json(SentimentResponse {
        original: input.text,
        sentiment,
    })
}

#[instrument(skip(input))]
pub async fn summarize(Json(input): Json<TextInput>) -> Json<SummaryResponse> {
    let summary = text::summarize(&input.text);
    Json(SummaryResponse {
        original: input.text,
        summary,
    })
}

#[instrument(skip(state, input))]
pub async fn translate(
    State(state): State<AppState>,
    Query(query): Query<TranslateQuery>,
    Json(input): Json<TextInput>,
) -> Result<Json<TranslationResponse>, ApiError> {
    let lang = query.lang();
    info!("Translating {} bytes to {}", input.text.len(), lang);
    let translated = state.translator.translate(&input.text, lang).await?;
    Ok(Json(TranslationResponse {
        original: input.text,
        translated,
        lang: lang.to_owned(),
    }))
}

#[instrument(skip(input))]
pub async fn classify(Json(input): Json<TextInput>) -> Json<CategoryResponse> {
    let category = text::classify(&input.text);
    Json(CategoryResponse {
        original: input.text,
        category,
    })
}

/// Summarizes an uploaded `.txt` file. The whole file is buffered before decoding.
#[instrument(skip(multipart))]
pub async fn upload_summarize(
    mut multipart: Multipart,
) -> Result<Json<UploadSummaryResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // A part without a filename is a plain form value, not a file.
        let Some(filename) = field.file_name().map(str::to_owned) else {
            return Err(ApiError::InvalidUpload(format!(
                "Expected an uploaded file for field: {UPLOAD_FIELD}"
            )));
        };
        if !filename.ends_with(TEXT_EXTENSION) {
            return Err(ApiError::UnsupportedFileType);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.body_text()))?;
        info!("Received upload {} ({} bytes)", filename, bytes.len());

        let contents =
            String::from_utf8(bytes.to_vec()).map_err(|e| ApiError::Internal(e.to_string()))?;

        return Ok(Json(UploadSummaryResponse {
            summary: text::summarize(&contents),
            original_length: text::word_count(&contents),
            filename,
        }));
    }

    Err(ApiError::InvalidUpload(format!(
        "Field required: {UPLOAD_FIELD}"
    )))
}
