//! HTTP server for the fmsparse API.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                               |
//! |--------|---------------|-------------------------------------------|
//! | GET    | `/health`     | Health check                              |
//! | POST   | `/api/parse`  | Upload an FMS report, get a match record  |
//! | GET    | `/api/logs`   | SSE stream for real-time logs             |
//!
//! `/api/parse` takes multipart fields `file` (the report), optional `extra`
//! (sidecar JSON) and optional `playoff` (`true` / `false`).

use axum::{
    extract::Multipart,
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{error_response, error_response_with_rows, ParseResponse};
use crate::config::ServerConfig;
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::pipeline::{parse_report_bytes, ParseOptions};

type ApiError = (StatusCode, Json<Value>);

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.addr();
    println!("🚀 fmsparse server running on http://{}", addr);
    println!("   POST /api/parse - Upload FMS report");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/parse", post(parse_report))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "fmsparse",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "parse": "POST /api/parse",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Fields of a parse upload
#[derive(Debug, Default)]
struct ParseUpload {
    file_name: Option<String>,
    report: Option<Vec<u8>>,
    extra: Option<Vec<u8>>,
    playoff: bool,
}

async fn read_upload(mut multipart: Multipart) -> ServerResult<ParseUpload> {
    let mut upload = ParseUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().map(|s| s.to_string());
                upload.report = Some(read_field(field).await?);
            }
            "extra" => upload.extra = Some(read_field(field).await?),
            "playoff" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                upload.playoff = parse_flag(&text)?;
            }
            _ => {}
        }
    }

    Ok(upload)
}

async fn read_field(field: axum::extract::multipart::Field<'_>) -> ServerResult<Vec<u8>> {
    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))
}

fn parse_flag(text: &str) -> ServerResult<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(ServerError::BadRequest(format!("Invalid playoff flag: {}", other))),
    }
}

/// Map an error to its HTTP status and JSON body.
fn api_error(err: ServerError) -> ApiError {
    log_error(err.to_string());
    match err {
        ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(error_response(&msg))),
        ServerError::Pipeline(PipelineError::Breakdown(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(error_response_with_rows(&e.to_string(), e.rows())),
        ),
        ServerError::Pipeline(e @ (PipelineError::Report(_) | PipelineError::ExtraInfo(_))) => {
            (StatusCode::BAD_REQUEST, Json(error_response(&e.to_string())))
        }
        ServerError::Pipeline(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string()))),
    }
}

/// Parse report endpoint
async fn parse_report(multipart: Multipart) -> Result<Json<ParseResponse>, ApiError> {
    let upload = read_upload(multipart).await.map_err(api_error)?;
    let bytes = upload
        .report
        .ok_or_else(|| api_error(ServerError::BadRequest("No file provided".into())))?;
    let source = upload.file_name.unwrap_or_else(|| "upload".to_string());

    println!("\n{}", "=".repeat(70));
    println!("📄 NEW UPLOAD: {} ({} bytes)", source, bytes.len());
    println!("{}\n", "=".repeat(70));

    let options = ParseOptions {
        playoff: upload.playoff,
        ..ParseOptions::default()
    };
    let outcome = parse_report_bytes(&bytes, &source, upload.extra.as_deref(), &options)
        .map_err(|e| api_error(e.into()))?;

    Ok(Json(ParseResponse::new(outcome, options.playoff)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BreakdownError, RowError};

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag(" ").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_row_errors_are_unprocessable() {
        let err = BreakdownError::Rows(vec![RowError {
            index: 2,
            label: "final score".into(),
            side: None,
            message: "bad".into(),
        }]);
        let (status, body) = api_error(ServerError::Pipeline(err.into()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.0["rowErrors"][0]["label"], "final score");
    }

    #[test]
    fn test_report_errors_are_bad_requests() {
        let err = PipelineError::Report(crate::error::ReportError::NoRows);
        let (status, _) = api_error(ServerError::Pipeline(err));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
