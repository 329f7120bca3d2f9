//! Request logging, HTTP metrics and the Prometheus scrape endpoint.

use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, field, info, info_span};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// The `{id}` segment of a single-movie route, as sent by the client.
fn movie_id_segment<'a>(route: Option<&str>, path: &'a str) -> Option<&'a str> {
    route
        .filter(|route| route.ends_with("/movies/{id}"))
        .and_then(|_| path.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

/// Wraps every catalog request in a `request` span and records its outcome.
///
/// Requests on `/movies/{id}` carry `movie_id` on the span so that log lines
/// from the service and repository can be traced back to the movie.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.as_deref(),
        movie_id = field::Empty,
    );
    if let Some(id) = movie_id_segment(route.as_deref(), &path) {
        span.record("movie_id", id);
    }

    async move {
        let mut response = next.run(req).await;
        let status = response.status();

        let labels = [
            ("method", method.to_string()),
            // Route templates keep the label set bounded.
            ("path", route.unwrap_or_else(|| "unmatched".to_string())),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        info!(
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            status_code = status.as_u16(),
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_segment() {
        assert_eq!(
            movie_id_segment(Some("/api/v1/movies/{id}"), "/api/v1/movies/42"),
            Some("42")
        );
        assert_eq!(
            movie_id_segment(Some("/movies/{id}"), "/movies/abc"),
            Some("abc")
        );
        assert_eq!(movie_id_segment(Some("/api/v1/movies"), "/api/v1/movies"), None);
        assert_eq!(movie_id_segment(None, "/api/v1/movies/42"), None);
    }

    #[test]
    fn test_outcome() {
        assert_eq!(outcome(StatusCode::CREATED), "success");
        assert_eq!(outcome(StatusCode::NO_CONTENT), "success");
        assert_eq!(outcome(StatusCode::CONFLICT), "client_error");
        assert_eq!(outcome(StatusCode::SERVICE_UNAVAILABLE), "error");
    }
}
