//! End-to-end checks of `HttpBackend` against an in-process axum backend.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chat::conversation::FALLBACK_ANSWER;
use chat::{ActionKind, ApiError, ChatBackend, ChatConfig, ChatSession, HttpBackend};
use serde_json::{Value, json};

async fn query(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let Some(question) = body.get("question").and_then(Value::as_str) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing 'question' parameter" })));
    };
    if question.contains("deploy") {
        return (
            StatusCode::OK,
            Json(json!({ "answer": "Here are your models", "action": { "action_key": "deploy_model" } })),
        );
    }
    if question.contains("unknown") {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "No relevant document found." })));
    }
    (StatusCode::OK, Json(json!({ "answer": format!("echo: {question}") })))
}

async fn upload(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let Ok(bytes) = field.bytes().await else {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unreadable file" })));
        };
        if file_name.is_empty() {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No selected file" })));
        }
        if bytes.is_empty() {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No valid text extracted from the document" })));
        }
        return (
            StatusCode::OK,
            Json(json!({ "message": format!("Document '{file_name}' processed and stored successfully.") })),
        );
    }
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "No file part" })))
}

async fn spawn_backend() -> ChatConfig {
    let app = Router::new()
        .route("/query", post(query))
        .route("/upload", post(upload));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ChatConfig::default()
        .with_base_url(&format!("http://{addr}"))
        .unwrap()
}

async fn closed_port_config() -> ChatConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ChatConfig::default()
        .with_base_url(&format!("http://{addr}"))
        .unwrap()
}

// =============================================================================
// query
// =============================================================================

#[tokio::test]
async fn ask_returns_answer_and_action() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let resp = backend.ask("please deploy").await.unwrap();
    assert_eq!(resp.answer, "Here are your models");
    assert_eq!(resp.action.unwrap().action_key, "deploy_model");
}

#[tokio::test]
async fn ask_sends_question_field() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let resp = backend.ask("What models exist?").await.unwrap();
    assert_eq!(resp.answer, "echo: What models exist?");
    assert!(resp.action.is_none());
}

#[tokio::test]
async fn ask_maps_non_success_status() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let err = backend.ask("something unknown").await.unwrap_err();
    match err {
        ApiError::Response { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "No relevant document found.");
        }
        other => panic!("expected Response error, got {other:?}"),
    }
}

#[tokio::test]
async fn ask_against_closed_port_is_request_error() {
    let backend = HttpBackend::new(&closed_port_config().await).unwrap();
    let err = backend.ask("hi").await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}

// =============================================================================
// session over HTTP
// =============================================================================

#[tokio::test]
async fn session_round_trip_surfaces_action() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let mut session = ChatSession::new(backend);
    session.submit("deploy what models exist?").await.unwrap();

    let state = session.state();
    assert_eq!(state.messages().len(), 4);
    assert_eq!(state.last_message().unwrap().text, "Here are your models");
    assert_eq!(state.active_action().unwrap().kind, ActionKind::DeployModel);
}

#[tokio::test]
async fn session_network_failure_falls_back() {
    let backend = HttpBackend::new(&closed_port_config().await).unwrap();
    let mut session = ChatSession::new(backend);
    session.submit("x").await.unwrap();

    let state = session.state();
    assert_eq!(state.messages().len(), 4);
    assert_eq!(state.last_message().unwrap().text, FALLBACK_ANSWER);
    assert!(state.active_action().is_none());
    assert!(!state.is_busy());
}

// =============================================================================
// upload
// =============================================================================

#[tokio::test]
async fn upload_sends_file_part() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let resp = backend
        .upload_document("models.pdf", b"%PDF-1.7 body".to_vec())
        .await
        .unwrap();
    assert_eq!(resp.message, "Document 'models.pdf' processed and stored successfully.");
}

#[tokio::test]
async fn upload_rejection_carries_backend_error_text() {
    let backend = HttpBackend::new(&spawn_backend().await).unwrap();
    let err = backend.upload_document("empty.pdf", Vec::new()).await.unwrap_err();
    match err {
        ApiError::Response { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "No valid text extracted from the document");
        }
        other => panic!("expected Response error, got {other:?}"),
    }
}
