//! Web UI and HTTP API.
//!
//! Serves a single page with a PDF upload control, the generated summary
//! and a quiz panel, backed by JSON endpoints.

use crate::assistant::Assistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::PdfQuizError;
use crate::quiz::{QuizQuestion, QuizStyle};
use crate::response::ParseError;
use crate::uploads::{find_upload, save_upload};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

const INDEX_HTML: &str = include_str!("index.html");

/// Shared application state.
struct AppState {
    assistant: Assistant,
    upload_dir: PathBuf,
    api_key_env: String,
}

/// Run the HTTP server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings, None) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pdfquiz doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let state = Arc::new(AppState {
        assistant: Assistant::new(&settings)?,
        upload_dir: settings.upload_dir(),
        api_key_env: settings.model.api_key_env.clone(),
    });

    let app = router(state, upload_limit_bytes(settings.server.max_upload_mb));

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("PDF Assistant");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Web UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Upload + summary", "POST /api/upload");
    Output::kv("Quiz", "POST /api/quiz");
    Output::kv("Uploads", &settings.upload_dir().display().to_string());
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Request body limit for a configured size in megabytes.
fn upload_limit_bytes(max_upload_mb: usize) -> usize {
    max_upload_mb.saturating_mul(1024 * 1024)
}

fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/quiz", post(quiz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Serialize)]
struct UploadResponse {
    file_name: String,
    summary: String,
}

#[derive(Deserialize)]
struct QuizRequest {
    file_name: String,
    #[serde(default)]
    style: Option<String>,
}

#[derive(Serialize)]
struct QuizResponse {
    questions: Vec<QuizQuestion>,
}

#[derive(Serialize, Default)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

fn simple_error(status: StatusCode, message: String) -> Response {
    error_response(
        status,
        ErrorResponse {
            error: message,
            ..ErrorResponse::default()
        },
    )
}

fn agent_error(state: &AppState, context: &str, e: PdfQuizError) -> Response {
    error!("{}: {}", context, e);
    error_response(
        StatusCode::BAD_GATEWAY,
        ErrorResponse {
            error: format!("{}: {}", context, e),
            hint: Some(format!(
                "Check {} and tool configuration.",
                state.api_key_env
            )),
            ..ErrorResponse::default()
        },
    )
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Pull the first field that carries a file name out of the form.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, axum::body::Bytes), String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {}", e))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("Failed to read file: {}", e))?;
        return Ok((file_name, bytes));
    }
    Err("No file provided".to_string())
}

async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let (file_name, bytes) = match read_file_field(&mut multipart).await {
        Ok(field) => field,
        Err(message) => return simple_error(StatusCode::BAD_REQUEST, message),
    };

    let upload_dir = state.upload_dir.clone();
    let name = file_name.clone();
    let saved = tokio::task::spawn_blocking(move || save_upload(&upload_dir, &name, &bytes)).await;

    let path = match saved {
        Ok(Ok(path)) => path,
        Ok(Err(e @ PdfQuizError::Upload(_))) => {
            warn!("Rejected upload: {}", e);
            return simple_error(StatusCode::BAD_REQUEST, e.to_string());
        }
        Ok(Err(e)) => {
            error!("Failed to store upload: {}", e);
            return simple_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
        Err(e) => return simple_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    info!("PDF '{}' uploaded", file_name);

    match state.assistant.summarize(&path).await {
        Ok(summary) => Json(UploadResponse {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(file_name),
            summary,
        })
        .into_response(),
        Err(e) => agent_error(&state, "Error generating summary", e),
    }
}

async fn quiz(State(state): State<Arc<AppState>>, Json(req): Json<QuizRequest>) -> Response {
    let path = match find_upload(&state.upload_dir, &req.file_name) {
        Ok(Some(path)) => path,
        Ok(None) => {
            return simple_error(
                StatusCode::NOT_FOUND,
                format!("No uploaded PDF named '{}'", req.file_name),
            )
        }
        Err(e) => return simple_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let style = req.style.as_deref().map(QuizStyle::from).unwrap_or_default();

    let outcome = match state.assistant.quiz(&path, style).await {
        Ok(outcome) => outcome,
        Err(e) => return agent_error(&state, "Agent Error", e),
    };

    match outcome.parsed {
        Ok(questions) => Json(QuizResponse { questions }).into_response(),
        Err(ParseError::ToolReported(message)) => simple_error(StatusCode::UNPROCESSABLE_ENTITY, message),
        Err(e) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse {
                error: "Could not parse the quiz output.".to_string(),
                raw: e.raw().map(str::to_string),
                detail: Some(e.detail().to_string()),
                ..ErrorResponse::default()
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{text_reply, tool_reply, FixedExtractor, ScriptedModel};
    use crate::agent::ModelReply;
    use crate::config::Prompts;
    use crate::error::Result;
    use axum::body::Body;
    use axum::extract::{FromRequest, Request};

    fn state(dir: &std::path::Path, replies: Vec<Result<ModelReply>>) -> Arc<AppState> {
        let assistant = Assistant::with_model(
            ScriptedModel::new(replies),
            FixedExtractor::new("document text"),
            Prompts::default(),
        );
        Arc::new(AppState {
            assistant,
            upload_dir: dir.to_path_buf(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const BOUNDARY: &str = "pdfquiz-test-boundary";

    /// Multipart form with one part; `file_name` makes it a file field.
    async fn multipart(field: &str, file_name: Option<&str>, bytes: &[u8]) -> Multipart {
        let disposition = match file_name {
            Some(name) => format!(r#"form-data; name="{}"; filename="{}""#, field, name),
            None => format!(r#"form-data; name="{}""#, field),
        };
        let mut body = format!(
            "--{}\r\nContent-Disposition: {}\r\nContent-Type: application/pdf\r\n\r\n",
            BOUNDARY, disposition
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_upload_saves_and_summarizes() {
        let dir = tempfile::tempdir().unwrap();
        let replies = vec![Ok(text_reply("A short summary."))];

        let form = multipart("file", Some("notes.pdf"), b"%PDF-1.5 fake").await;
        let response = upload(State(state(dir.path(), replies)), form).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["file_name"], "notes.pdf");
        assert_eq!(body["summary"], "A short summary.");
        assert_eq!(
            std::fs::read(dir.path().join("notes.pdf")).unwrap(),
            b"%PDF-1.5 fake"
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let form = multipart("file", Some("notes.txt"), b"plain text").await;
        let response = upload(State(state(dir.path(), vec![])), form).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not a PDF"));
        assert!(!dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let form = multipart("comment", None, b"hello").await;
        let response = upload(State(state(dir.path(), vec![])), form).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_upload_agent_failure() {
        let dir = tempfile::tempdir().unwrap();
        let replies = vec![Err(PdfQuizError::OpenAI("timeout".to_string()))];
        let form = multipart("file", Some("notes.pdf"), b"%PDF").await;
        let response = upload(State(state(dir.path(), replies)), form).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Error generating summary"));
    }

    #[test]
    fn test_upload_limit_saturates() {
        assert_eq!(upload_limit_bytes(200), 200 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(usize::MAX), usize::MAX);
    }

    fn quiz_request(file_name: &str) -> Json<QuizRequest> {
        Json(QuizRequest {
            file_name: file_name.to_string(),
            style: None,
        })
    }

    #[tokio::test]
    async fn test_quiz_unknown_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = quiz(State(state(dir.path(), vec![])), quiz_request("missing.pdf")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_quiz_success() {
        let dir = tempfile::tempdir().unwrap();
        save_upload(dir.path(), "doc.pdf", b"%PDF").unwrap();

        let tool_args = format!(
            r#"{{"file_path": "{}"}}"#,
            dir.path().join("doc.pdf").display()
        );
        let replies = vec![
            Ok(tool_reply("create_quiz", &tool_args)),
            Ok(text_reply(
                r#"[{"question": "What is 2+2?", "options": ["3", "4", "5"], "answer": "4"}]"#,
            )),
        ];

        let response = quiz(State(state(dir.path(), replies)), quiz_request("doc.pdf")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["questions"][0]["answer"], "4");
    }

    #[tokio::test]
    async fn test_quiz_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        save_upload(dir.path(), "doc.pdf", b"%PDF").unwrap();

        let replies = vec![Ok(text_reply("No quiz today."))];
        let response = quiz(State(state(dir.path(), replies)), quiz_request("doc.pdf")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["raw"], "No quiz today.");
        assert!(body["detail"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_quiz_agent_failure() {
        let dir = tempfile::tempdir().unwrap();
        save_upload(dir.path(), "doc.pdf", b"%PDF").unwrap();

        let replies = vec![Err(PdfQuizError::OpenAI("401".to_string()))];
        let response = quiz(State(state(dir.path(), replies)), quiz_request("doc.pdf")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["hint"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_index_page() {
        let Html(page) = index().await;
        assert!(page.contains("/api/upload"));
        assert!(page.contains("/api/quiz"));
    }
}
