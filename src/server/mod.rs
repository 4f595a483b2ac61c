//! Web front end: one HTML page and one JSON endpoint per demo.
//!
//! Every request re-runs (or fetches from cache) the pipeline for the
//! parameters in its query string. The only state shared between requests
//! is [`ReportCaches`].

mod pages;

pub use pages::escape;

use crate::error::Error;
use crate::params::{MultipleParams, SimpleParams, TimeSeriesParams};
use crate::pipeline::ReportCaches;
use crate::render;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pages::{Demo, Outcome};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone, Default)]
pub struct AppState {
    caches: Arc<ReportCaches>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(liveness))
        .route("/simple", get(simple_page))
        .route("/multiple", get(multiple_page))
        .route("/timeseries", get(timeseries_page))
        .route("/api/simple", get(simple_api))
        .route("/api/multiple", get(multiple_api))
        .route("/api/timeseries", get(timeseries_api))
        .with_state(state)
}

/// Binds `config.host:config.port` and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!(
        "crispml v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr()?
    );

    axum::serve(listener, router(AppState::new()))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("could not install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

/// Liveness probe
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Unwraps the query, falling back to defaults plus a warning when it does not parse.
fn params_or_warning<P: Default>(query: Result<Query<P>, QueryRejection>) -> (P, Option<String>) {
    match query {
        Ok(Query(params)) => (params, None),
        Err(rejection) => {
            log::warn!("rejected query: {}", rejection.body_text());
            (P::default(), Some(rejection.body_text()))
        }
    }
}

fn failed(err: Error) -> Outcome {
    if err.is_invalid_parameter() {
        log::warn!("{}", err);
    } else {
        log::error!("{}", err);
    }
    Outcome::Failed {
        message: err.to_string(),
    }
}

async fn simple_page(
    State(state): State<AppState>,
    query: Result<Query<SimpleParams>, QueryRejection>,
) -> Html<String> {
    let (mut params, warning) = params_or_warning(query);

    let outcome = match warning {
        Some(message) => Outcome::Failed { message },
        None => state
            .caches
            .simple(&params)
            .and_then(|report| {
                params = report.params.clone();
                Ok(Outcome::Rendered {
                    svg: render::simple_chart(&report)?,
                    tables: vec![("Metrics", render::simple_metrics(&report))],
                })
            })
            .unwrap_or_else(failed),
    };

    Html(pages::demo_page(
        Demo::Simple,
        &pages::simple_fields(&params),
        &outcome,
    ))
}

async fn multiple_page(
    State(state): State<AppState>,
    query: Result<Query<MultipleParams>, QueryRejection>,
) -> Html<String> {
    let (mut params, warning) = params_or_warning(query);

    let outcome = match warning {
        Some(message) => Outcome::Failed { message },
        None => state
            .caches
            .multiple(&params)
            .and_then(|report| {
                params = report.params.clone();
                Ok(Outcome::Rendered {
                    svg: render::multiple_chart(&report)?,
                    tables: vec![("Metrics", render::multiple_metrics(&report))],
                })
            })
            .unwrap_or_else(failed),
    };

    Html(pages::demo_page(
        Demo::Multiple,
        &pages::multiple_fields(&params),
        &outcome,
    ))
}

async fn timeseries_page(
    State(state): State<AppState>,
    query: Result<Query<TimeSeriesParams>, QueryRejection>,
) -> Html<String> {
    let (mut params, warning) = params_or_warning(query);

    let outcome = match warning {
        Some(message) => Outcome::Failed { message },
        None => state
            .caches
            .timeseries(&params)
            .and_then(|report| {
                params = report.params.clone();
                Ok(Outcome::Rendered {
                    svg: render::timeseries_chart(&report)?,
                    tables: vec![
                        ("Metrics", render::timeseries_metrics(&report)),
                        ("Autocorrelation", render::acf_rows(&report)),
                    ],
                })
            })
            .unwrap_or_else(failed),
    };

    Html(pages::demo_page(
        Demo::TimeSeries,
        &pages::timeseries_fields(&params),
        &outcome,
    ))
}

fn unprocessable(message: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

fn api_response<T: Serialize>(result: crate::Result<Arc<T>>) -> Response {
    match result {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            log::warn!("api request failed: {}", err);
            unprocessable(err.to_string())
        }
    }
}

async fn simple_api(
    State(state): State<AppState>,
    query: Result<Query<SimpleParams>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(params)) => api_response(state.caches.simple(&params)),
        Err(rejection) => unprocessable(rejection.body_text()),
    }
}

async fn multiple_api(
    State(state): State<AppState>,
    query: Result<Query<MultipleParams>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(params)) => api_response(state.caches.multiple(&params)),
        Err(rejection) => unprocessable(rejection.body_text()),
    }
}

async fn timeseries_api(
    State(state): State<AppState>,
    query: Result<Query<TimeSeriesParams>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(params)) => api_response(state.caches.timeseries(&params)),
        Err(rejection) => unprocessable(rejection.body_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = router(AppState::new())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_body("/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "alive");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_simple_page_renders_chart() {
        let (status, body) = get_body("/simple?true_slope=3&noise_scale=0.5&sample_count=40&seed=2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<svg"));
        assert!(body.contains("Learned Slope (Coefficient)"));
        assert!(body.contains("Business Understanding"));
        assert!(body.contains("value=\"40\""));
    }

    #[tokio::test]
    async fn test_invalid_parameter_shows_warning() {
        let (status, body) = get_body("/simple?sample_count=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("class=\"warning\""));
        assert!(body.contains("sample_count"));
        assert!(!body.contains("<svg"));
    }

    #[tokio::test]
    async fn test_unparseable_query_shows_warning() {
        let (status, body) = get_body("/multiple?noise_scale=lots").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("class=\"warning\""));
        assert!(!body.contains("<svg"));
    }

    #[tokio::test]
    async fn test_multiple_page_with_checkbox() {
        let (status, body) =
            get_body("/multiple?use_feature_selection=on&features_to_keep=2&seed=4").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("RFE ranking"));
        assert!(body.contains("checked"));
    }

    #[tokio::test]
    async fn test_timeseries_page_has_acf_table() {
        let (status, body) = get_body("/timeseries?sample_count=200&seed=8").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Autocorrelation"));
        assert!(body.contains("lag 20"));
        assert!(body.contains("ADF Statistic"));
    }

    #[tokio::test]
    async fn test_api_returns_report() {
        let (status, body) = get_body("/api/simple?noise_scale=0&sample_count=50&seed=7").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!((json["learned_slope"].as_f64().unwrap() - 2.0).abs() < 1e-9);
        assert!((json["learned_intercept"].as_f64().unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(json["params"]["seed"], 7);
    }

    #[tokio::test]
    async fn test_unseeded_page_echoes_drawn_seed() {
        let state = AppState::new();
        let response = router(state.clone())
            .oneshot(Request::builder().uri("/simple").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(body.contains("<svg"));
        assert!(!body.contains("name=\"seed\" step=\"1\" value=\"\""));
        assert!(state.caches.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_is_422() {
        let (status, body) = get_body("/api/timeseries?ar_lag_count=0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("ar_lag_count"));
    }
}
