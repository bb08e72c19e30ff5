use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use blastscope_api::{
    FilePosition, FileRange, Position, ReferenceQuery, ServiceError, SymbolService,
};
use blastscope_lsproxy::{LsproxyClient, LsproxyConfig};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

async fn list_files() -> Json<Value> {
    Json(json!(["src/lib.rs", "src/main.rs"]))
}

async fn definitions(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
    match params.get("file_path").map(String::as_str) {
        Some("src/lib.rs") => Json(json!([{
            "name": "run",
            "kind": "function",
            "identifier_position": {"path": "src/lib.rs", "position": {"line": 3, "character": 7}},
            "range": {
                "path": "src/lib.rs",
                "start": {"line": 3, "character": 0},
                "end": {"line": 9, "character": 1}
            }
        }]))
        .into_response(),
        Some("broken.rs") => (StatusCode::OK, "<html>oops</html>").into_response(),
        Some("crash.rs") => (StatusCode::INTERNAL_SERVER_ERROR, "language server crashed").into_response(),
        _ => (StatusCode::NOT_FOUND, "file not found").into_response(),
    }
}

async fn read_source(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "source_code": format!(
            "{}@{}-{}",
            body["path"].as_str().unwrap_or_default(),
            body["range"]["start"]["line"],
            body["range"]["end"]["line"]
        )
    }))
}

async fn find_references(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer secret");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing token").into_response();
    }
    let mut references = vec![json!({"path": "src/main.rs", "position": {"line": 12, "character": 4}})];
    if body["include_declaration"] == json!(true) {
        references.insert(0, body["identifier_position"].clone());
    }
    Json(json!({ "references": references, "raw_response": {} })).into_response()
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/v1/workspace/list-files", get(list_files))
        .route("/v1/symbol/definitions-in-file", get(definitions))
        .route("/v1/workspace/read-source-code", post(read_source))
        .route("/v1/symbol/find-references", post(find_references));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn client(base_url: String, token: Option<&str>) -> LsproxyClient {
    LsproxyClient::new(LsproxyConfig {
        base_url,
        auth_token: token.map(str::to_string),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn given_workspace_when_listing_files_then_paths_are_returned() {
    let client = client(spawn_server().await, None);
    let files = client.list_files().await.unwrap();
    assert_eq!(files, vec!["src/lib.rs", "src/main.rs"]);
}

#[tokio::test]
async fn given_known_file_when_fetching_definitions_then_ranges_decode() {
    let client = client(spawn_server().await, None);

    let defs = client.definitions_in_file("src/lib.rs").await.unwrap();

    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "run");
    assert_eq!(defs[0].identifier_position, FilePosition::new("src/lib.rs", 3, 7));
    assert!(defs[0].range.contains(&FilePosition::line_start("src/lib.rs", 5)));
}

#[tokio::test]
async fn given_unknown_file_when_fetching_definitions_then_error_is_a_resolution_miss() {
    let client = client(spawn_server().await, None);
    let err = client.definitions_in_file("nope.rs").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(err.is_resolution_miss());
}

#[tokio::test]
async fn given_bad_payload_when_fetching_definitions_then_error_is_malformed() {
    let client = client(spawn_server().await, None);
    let err = client.definitions_in_file("broken.rs").await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)));
    assert!(!err.is_resolution_miss());
}

#[tokio::test]
async fn given_server_error_when_fetching_definitions_then_error_is_rejected() {
    let client = client(spawn_server().await, None);
    match client.definitions_in_file("crash.rs").await.unwrap_err() {
        ServiceError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("language server crashed"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn given_range_when_reading_source_then_body_carries_path_and_span() {
    let client = client(spawn_server().await, None);
    let range = FileRange::new("src/lib.rs", Position::new(3, 0), Position::new(9, 1));
    let text = client.read_source_code(&range).await.unwrap();
    assert_eq!(text, "src/lib.rs@3-9");
}

#[tokio::test]
async fn given_token_when_finding_references_then_bearer_auth_is_sent() {
    let client = client(spawn_server().await, Some("secret"));
    let query = ReferenceQuery {
        identifier_position: FilePosition::new("src/lib.rs", 3, 7),
        include_declaration: true,
        include_code_context_lines: 0,
    };

    let response = client.find_references(&query).await.unwrap();

    assert_eq!(response.references.len(), 2);
    assert_eq!(response.references[0], FilePosition::new("src/lib.rs", 3, 7));
    assert!(response.context.is_none());
}

#[tokio::test]
async fn given_missing_token_when_finding_references_then_request_is_rejected() {
    let client = client(spawn_server().await, None);
    let query = ReferenceQuery::usages_of(FilePosition::new("src/lib.rs", 3, 7));
    let err = client.find_references(&query).await.unwrap_err();
    assert!(matches!(err, ServiceError::Rejected { status: 401, .. }));
}

#[tokio::test]
async fn given_closed_port_when_calling_then_error_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}/v1/", addr), None);
    let err = client.list_files().await.unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable(_)));
}
