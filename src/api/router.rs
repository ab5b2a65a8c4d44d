use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{category, event, exception, feed, health};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Feed
        .route("/api/v1/feed", get(feed::get_feed))
        .route("/api/v1/calendar", get(feed::get_calendar))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{slug}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/v1/events/{slug}/occurrences", get(event::list_occurrences))
        .route("/api/v1/events/{slug}/occurrences/{date}/ics", get(event::get_occurrence_ics))

        // Exceptions
        .route("/api/v1/events/{slug}/exceptions", get(exception::list_exceptions).post(exception::upsert_exception))
        .route("/api/v1/events/{slug}/exceptions/{date}", delete(exception::delete_exception))

        // Categories
        .route("/api/v1/categories", get(category::list_categories).post(category::create_category))
        .route("/api/v1/categories/{id}", delete(category::delete_category))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
