//! Cognitive Twin - a small text analysis API
//!
//! This library provides the HTTP surface and the text operations behind it: sentiment
//! labelling, truncation summaries, keyword classification, translation through an external
//! service, and summaries of uploaded text files.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum_prometheus::{
    GenericMetricLayer, Handle, PrometheusMetricLayerBuilder,
    metrics_exporter_prometheus::PrometheusHandle,
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, instrument};
use url::Url;

pub mod client;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod sentiment;
pub mod text;
pub mod translate;

use client::PoolSettings;
use sentiment::{LexiconScorer, SentimentScorer};
use translate::{HttpTranslator, Translator};

/// Everything the handlers need, built once at startup and shared by every request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub sentiment: Arc<dyn SentimentScorer>,
    pub translator: Arc<dyn Translator>,
}

impl AppState {
    /// Create a new AppState using the lexicon scorer and an HTTP translator for `translate_url`
    pub fn new(translate_url: Url, api_key: Option<String>, pool: PoolSettings) -> Self {
        let translator = HttpTranslator::builder()
            .client(client::create_hyper_client(pool))
            .base_url(translate_url)
            .maybe_api_key(api_key)
            .build();
        Self::with_components(LexiconScorer::default(), translator)
    }

    /// Create a new AppState from custom components (useful for testing)
    pub fn with_components(
        sentiment: impl SentimentScorer + 'static,
        translator: impl Translator + 'static,
    ) -> Self {
        Self {
            sentiment: Arc::new(sentiment),
            translator: Arc::new(translator),
        }
    }
}

/// Build the main router
/// This creates routes for:
/// - `/` and `/hello/{name}` - Greetings
/// - `/analyze`, `/summarize`, `/translate`, `/classify` - JSON text endpoints
/// - `/upload-summarize` - Multipart `.txt` upload, without a body size limit
#[instrument(skip(state))]
pub fn build_router(state: AppState) -> Router {
    info!("Building router");
    Router::new()
        .route("/", get(handlers::root))
        .route("/hello/{name}", get(handlers::hello))
        .route("/analyze", post(handlers::analyze))
        .route("/summarize", post(handlers::summarize))
        .route("/translate", post(handlers::translate))
        .route("/classify", post(handlers::classify))
        .route(
            "/upload-summarize",
            post(handlers::upload_summarize).layer(DefaultBodyLimit::disable()),
        )
        .with_state(state)
}

/// Builds a router for the metrics endpoint.
#[instrument(skip(handle))]
pub fn build_metrics_router(handle: PrometheusHandle) -> Router {
    info!("Building metrics router");
    Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

type MetricsLayerAndHandle = (
    GenericMetricLayer<'static, PrometheusHandle, Handle>,
    PrometheusHandle,
);

/// Builds a layer and handle for prometheus metrics collection.
///
/// # Parameters
/// - `prefix`: A string prefix for the metrics. Accepts a literal or an owned string; the
///   Prometheus layer needs it for the lifetime of the program.
pub fn build_metrics_layer_and_handle(
    prefix: impl Into<Cow<'static, str>>,
) -> MetricsLayerAndHandle {
    info!("Building metrics layer");
    PrometheusMetricLayerBuilder::new()
        .with_prefix(prefix)
        .enable_response_body_size(true)
        .with_endpoint_label_type(axum_prometheus::EndpointLabel::MatchedPath)
        .with_default_metrics()
        .build_pair()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconScorer;
    use crate::translate::TranslateError;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use axum_test::multipart::{MultipartForm, Part};
    use rstest::*;
    use serde_json::json;
    use test_utils::{FixedScorer, MockTranslator};

    fn server_with(sentiment: impl SentimentScorer + 'static, translator: MockTranslator) -> TestServer {
        let app_state = AppState::with_components(sentiment, translator);
        TestServer::new(build_router(app_state)).unwrap()
    }

    #[fixture]
    fn server() -> TestServer {
        server_with(LexiconScorer::default(), MockTranslator::returning("hola"))
    }

    fn text_file(name: &str, contents: impl Into<Vec<u8>>) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(contents.into())
                .file_name(name)
                .mime_type("text/plain"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn test_root(server: TestServer) {
        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "🚀 Cognitive Twin API is running!" }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_hello(server: TestServer) {
        let response = server.get("/hello/Ada").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "Hello Ada, welcome to your Cognitive Twin!"
        }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_analyze_positive(server: TestServer) {
        let response = server
            .post("/analyze")
            .json(&json!({ "text": "I love this" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "original": "I love this", "sentiment": "positive" }));
    }

    #[rstest]
    #[case(0.25, "positive")]
    #[case(-0.25, "negative")]
    #[case(0.0, "neutral")]
    #[tokio::test]
    async fn test_analyze_label_follows_score(#[case] score: f64, #[case] label: &str) {
        let server = server_with(FixedScorer(score), MockTranslator::returning("unused"));
        let response = server.post("/analyze").json(&json!({ "text": "" })).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "original": "", "sentiment": label }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_analyze_missing_text_is_rejected(server: TestServer) {
        let response = server
            .post("/analyze")
            .json(&json!({ "body": "I love this" }))
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[rstest]
    #[tokio::test]
    async fn test_summarize_short_text(server: TestServer) {
        let response = server
            .post("/summarize")
            .json(&json!({ "text": "one two three" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "original": "one two three", "summary": "one two three" }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_summarize_long_text(server: TestServer) {
        let words: Vec<String> = (0..40).map(|i| format!("word{i}")).collect();
        let text = words.join("  ");
        let response = server.post("/summarize").json(&json!({ "text": text })).await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "original": text,
            "summary": format!("{}...", words[..30].join(" ")),
        }));
    }

    #[rstest]
    #[case("New AI breakthroughs in finance", "Technology")]
    #[case("Advances in medicine", "Health")]
    #[case("Where did the money go", "Finance")]
    #[case("A walk in the park", "General")]
    #[tokio::test]
    async fn test_classify(server: TestServer, #[case] text: &str, #[case] category: &str) {
        let response = server.post("/classify").json(&json!({ "text": text })).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "original": text, "category": category }));
    }

    #[tokio::test]
    async fn test_translate_defaults_to_spanish() {
        let translator = MockTranslator::returning("hola");
        let server = server_with(LexiconScorer::default(), translator.clone());

        let response = server
            .post("/translate")
            .json(&json!({ "text": "hello" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "original": "hello", "translated": "hola", "lang": "es" }));
        assert_eq!(
            translator.get_calls(),
            vec![("hello".to_string(), "es".to_string())]
        );
    }

    #[tokio::test]
    async fn test_translate_passes_lang_through() {
        let translator = MockTranslator::returning("bonjour");
        let server = server_with(LexiconScorer::default(), translator.clone());

        let response = server
            .post("/translate")
            .add_query_param("lang", "fr")
            .json(&json!({ "text": "hello" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "original": "hello", "translated": "bonjour", "lang": "fr" }));
        assert_eq!(translator.get_calls()[0].1, "fr");
    }

    #[tokio::test]
    async fn test_translate_failure_is_bad_request() {
        let server = server_with(
            LexiconScorer::default(),
            MockTranslator::failing(TranslateError::Upstream("zz is not supported".into())),
        );

        let response = server
            .post("/translate")
            .add_query_param("lang", "zz")
            .json(&json!({ "text": "hello" }))
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "detail": "zz is not supported" }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_accepts_txt(server: TestServer) {
        let response = server
            .post("/upload-summarize")
            .multipart(text_file("notes.txt", "one  two\nthree"))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "filename": "notes.txt",
            "summary": "one  two\nthree",
            "original_length": 3,
        }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_rejects_non_txt(server: TestServer) {
        let response = server
            .post("/upload-summarize")
            .multipart(text_file("notes.md", "# heading"))
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "detail": "Only .txt files are supported." }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_length_counts_words_not_bytes(server: TestServer) {
        let contents = "ünïcödé wörds everywhere ".repeat(20);
        let response = server
            .post("/upload-summarize")
            .multipart(text_file("long.txt", contents.clone()))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["original_length"], 60);
        let expected: Vec<&str> = text::words(&contents).take(30).collect();
        assert_eq!(body["summary"], format!("{}...", expected.join(" ")));
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_invalid_utf8_is_server_error(server: TestServer) {
        let response = server
            .post("/upload-summarize")
            .multipart(text_file("binary.txt", vec![0xff, 0xfe, 0x00, 0x80]))
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_without_file_field(server: TestServer) {
        let form = MultipartForm::new().add_text("note", "no file here");
        let response = server
            .post("/upload-summarize")
            .multipart(form)
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        response.assert_json(&json!({ "detail": "Field required: file" }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_file_field_without_filename(server: TestServer) {
        let form = MultipartForm::new().add_text("file", "just a form value");
        let response = server
            .post("/upload-summarize")
            .multipart(form)
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        response.assert_json(&json!({ "detail": "Expected an uploaded file for field: file" }));
    }

    #[rstest]
    #[tokio::test]
    async fn test_upload_is_not_size_limited(server: TestServer) {
        // Larger than axum's default 2MB body limit.
        let contents = "word ".repeat(600_000);
        let response = server
            .post("/upload-summarize")
            .multipart(text_file("big.txt", contents))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["original_length"], 600_000);
    }

    mod metrics {
        use super::*;

        /// The Prometheus recorder is process global, so every metrics test shares one pair of
        /// servers.
        #[fixture]
        #[once]
        fn get_shared_metrics_servers() -> (TestServer, TestServer) {
            let (prometheus_layer, handle) = build_metrics_layer_and_handle("cognitive_twin");

            let metrics_router = build_metrics_router(handle);
            let metrics_server = TestServer::new(metrics_router).unwrap();

            let app_state =
                AppState::with_components(LexiconScorer::default(), MockTranslator::returning("hola"));
            let router = build_router(app_state).layer(prometheus_layer);
            let server = TestServer::new(router).unwrap();

            (server, metrics_server)
        }

        fn request_count(metrics: &str, selector: &str) -> i32 {
            metrics
                .lines()
                .find(|line| line.contains(selector))
                .and_then(|line| line.split_whitespace().last())
                .and_then(|s| s.parse::<i32>().ok())
                .unwrap_or(0)
        }

        #[rstest]
        #[tokio::test]
        async fn test_metrics_count_classify_requests(
            get_shared_metrics_servers: &(TestServer, TestServer),
        ) {
            let (server, metrics_server) = get_shared_metrics_servers;
            let selector = "cognitive_twin_http_requests_total{method=\"POST\",status=\"200\",endpoint=\"/classify\"}";

            let initial_count = request_count(&metrics_server.get("/metrics").await.text(), selector);

            for _ in 0..5 {
                let response = server
                    .post("/classify")
                    .json(&json!({ "text": "money talks" }))
                    .await;
                assert_eq!(response.status_code(), 200);
            }

            let response = metrics_server.get("/metrics").await;
            assert_eq!(response.status_code(), 200);
            assert_eq!(
                request_count(&response.text(), selector),
                initial_count + 5,
                "Metrics should increment by 5"
            );
        }

        #[rstest]
        #[tokio::test]
        async fn test_metrics_use_route_template_for_paths(
            get_shared_metrics_servers: &(TestServer, TestServer),
        ) {
            let (server, metrics_server) = get_shared_metrics_servers;
            let selector = "cognitive_twin_http_requests_total{method=\"GET\",status=\"200\",endpoint=\"/hello/{name}\"}";

            let initial_count = request_count(&metrics_server.get("/metrics").await.text(), selector);

            server.get("/hello/Ada").await.assert_status_ok();
            server.get("/hello/Grace").await.assert_status_ok();

            let metrics_text = metrics_server.get("/metrics").await.text();
            assert_eq!(request_count(&metrics_text, selector), initial_count + 2);
        }
    }
}
