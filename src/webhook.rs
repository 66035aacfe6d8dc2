//! # Webhook Boundary Layer
//!
//! Thin HTTP surface over the meal analysis pipeline. All nutrition logic
//! lives behind [`MealAnalyzer`]; this module only parses request JSON,
//! formats response JSON, and sets CORS headers.
//!
//! Routes:
//! - `POST /analyze` — `{"meal_description": "..."}` or
//!   `{"food_items": [{"name": "...", "quantity": 1.0}]}`
//! - `POST /analyze-labels` — `{"labels": [{"label": "...", "confidence": 0.9,
//!   "category": "protein"}]}`
//! - `GET /health/live` — liveness probe
//! - `GET /metrics` — Prometheus exposition
//! - `OPTIONS *` — CORS preflight

use crate::analyzer::MealAnalyzer;
use crate::errors::{AppError, AppResult};
use crate::nutrition::{DetectedLabel, MealItem};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Request payload for `POST /analyze`; exactly one field must be present.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    meal_description: Option<String>,
    food_items: Option<Vec<MealItem>>,
}

/// Request payload for `POST /analyze-labels`.
#[derive(Debug, Deserialize)]
struct AnalyzeLabelsRequest {
    labels: Vec<DetectedLabel>,
}

/// Run the webhook server until the process exits.
pub async fn run(
    analyzer: Arc<MealAnalyzer>,
    metrics_handle: Option<PrometheusHandle>,
    port: u16,
    bind_all: bool,
) -> AppResult<()> {
    let addr = if bind_all {
        SocketAddr::from(([0, 0, 0, 0], port))
    } else {
        SocketAddr::from(([127, 0, 0, 1], port))
    };

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind webhook server: {}", e)))?;
    info!("Webhook server listening on {}", addr);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let analyzer = Arc::clone(&analyzer);
                let metrics_handle = metrics_handle.clone();

                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = hyper::service::service_fn(move |req| {
                        let analyzer = Arc::clone(&analyzer);
                        let metrics_handle = metrics_handle.clone();
                        async move { route(req, analyzer, metrics_handle).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection: {:?}", err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

async fn route(
    req: Request<hyper::body::Incoming>,
    analyzer: Arc<MealAnalyzer>,
    metrics_handle: Option<PrometheusHandle>,
) -> Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::OPTIONS, _) => preflight_response(),
        (&Method::POST, "/analyze") => handle_analyze(req, &analyzer).await,
        (&Method::POST, "/analyze-labels") => handle_analyze_labels(req, &analyzer).await,
        (&Method::GET, "/health/live") => text_response(StatusCode::OK, "OK"),
        (&Method::GET, "/metrics") => match metrics_handle {
            Some(handle) => text_response(StatusCode::OK, &handle.render()),
            None => text_response(StatusCode::NOT_FOUND, "Metrics not enabled"),
        },
        _ => json_response(StatusCode::NOT_FOUND, &json!({ "error": "Not found" })),
    };

    Ok(response)
}

async fn handle_analyze(
    req: Request<hyper::body::Incoming>,
    analyzer: &MealAnalyzer,
) -> Response<Full<Bytes>> {
    let payload: AnalyzeRequest = match read_json(req).await {
        Ok(payload) => payload,
        Err(response) => return *response,
    };

    let food_items: Vec<MealItem> = if let Some(description) = payload.meal_description {
        analyzer.parse_description(&description)
    } else if let Some(items) = payload.food_items {
        items
    } else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &json!({
                "error": "Invalid request format. Expected {\"meal_description\": \"...\"} or {\"food_items\": [...]}"
            }),
        );
    };

    if food_items.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &json!({ "error": "No food items could be extracted from the meal description" }),
        );
    }

    let analysis = analyzer.analyze_items(&food_items).await;

    let mut body = json!({
        "total_nutrition": &analysis.aggregation.total_nutrition,
        "macro_percentages": &analysis.aggregation.macro_percentages,
        "food_categories": &analysis.aggregation.food_categories,
        "insights": &analysis.insights,
        "follow_up": &analysis.follow_up,
    });
    if let Some(warning) = analysis.aggregation.warning() {
        body["unknown_foods"] = json!(&analysis.aggregation.unknown_items);
        body["warning"] = json!(warning);
    }

    json_response(StatusCode::OK, &body)
}

async fn handle_analyze_labels(
    req: Request<hyper::body::Incoming>,
    analyzer: &MealAnalyzer,
) -> Response<Full<Bytes>> {
    let payload: AnalyzeLabelsRequest = match read_json(req).await {
        Ok(payload) => payload,
        Err(response) => return *response,
    };

    if payload.labels.is_empty() {
        return json_response(
            StatusCode::OK,
            &json!({
                "status": "no_food_detected",
                "error": "No food items detected in the image",
                "suggestions": [
                    "Try a clearer image with better lighting",
                    "Ensure food items are clearly visible",
                    "Use text input instead if image detection fails",
                ],
            }),
        );
    }

    let (detected_foods, analysis) = analyzer.analyze_labels(&payload.labels).await;

    let body = json!({
        "status": "success",
        "detected_foods": &detected_foods,
        "total_detected": payload.labels.len(),
        "total_nutrition": &analysis.aggregation.total_nutrition,
        "macro_percentages": &analysis.aggregation.macro_percentages,
        "insights": &analysis.insights,
    });

    json_response(StatusCode::OK, &body)
}

/// Collect and deserialize a JSON request body, or produce the 400 response.
async fn read_json<T: serde::de::DeserializeOwned>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, Box<Response<Full<Bytes>>>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!("Failed to read request body: {}", e);
            return Err(Box::new(json_response(
                StatusCode::BAD_REQUEST,
                &json!({ "error": "Failed to read request body" }),
            )));
        }
    };

    serde_json::from_slice(&body).map_err(|_| {
        Box::new(json_response(
            StatusCode::BAD_REQUEST,
            &json!({ "error": "Invalid request format. Expected JSON payload" }),
        ))
    })
}

fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Full::new(Bytes::new()))
        .expect("static preflight response should build")
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("json response should build")
}

fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("text response should build")
}
