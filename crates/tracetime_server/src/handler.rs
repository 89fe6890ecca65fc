//! Route handlers.

use crate::error::ApiError;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::{Html, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracetime_core::{ContentHash, CoreError, FrameId, PageId, ResourceId};
use tracetime_replay::{ReplayError, ReplayResponse, ReplaySession, TemporalCoordinate};

/// Shared handler state
pub type AppState = Arc<ReplaySession>;

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: &'static str,
    /// Loaded pages
    pub pages: usize,
    /// Distinct resource ids
    pub resources: usize,
}

/// `?name=` / `?time=` selector
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    /// Snapshot id
    pub name: Option<String>,
    /// Upper time bound, milliseconds
    pub time: Option<String>,
}

/// Selector plus the requested URL
#[derive(Debug, Default, Deserialize)]
pub struct SubResourceQuery {
    /// Snapshot id
    pub name: Option<String>,
    /// Upper time bound, milliseconds
    pub time: Option<String>,
    /// URL as referenced by the snapshot document
    pub url: Option<String>,
}

/// Optional substitute body
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    /// Content hash to serve instead of the recorded one
    pub sha1: Option<String>,
}

/// `GET /health`
pub async fn health(State(session): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        pages: session.pages().count(),
        resources: session.resource_index().len(),
    })
}

/// `GET /snapshot/{page_id}/{frame_id}`
///
/// Always 200: a miss renders the placeholder document.
pub async fn snapshot(
    State(session): State<AppState>,
    Path((page_id, frame_id)): Path<(String, String)>,
    Query(query): Query<SnapshotQuery>,
) -> Html<String> {
    let page_id = PageId::new(page_id);
    let frame_id = FrameId::new(frame_id);

    match TemporalCoordinate::from_query(query.name.as_deref(), query.time.as_deref()) {
        Ok(coordinate) => Html(
            session
                .resolve_navigation(&page_id, &frame_id, &coordinate)
                .into_html(),
        ),
        Err(err) => {
            tracing::debug!(page = %page_id, frame = %frame_id, error = %err, "unusable snapshot selector");
            Html(session.config().placeholder_html())
        }
    }
}

/// `GET /snapshot/{page_id}/{frame_id}/resource`
pub async fn sub_resource(
    State(session): State<AppState>,
    Path((page_id, frame_id)): Path<(String, String)>,
    Query(query): Query<SubResourceQuery>,
) -> Result<Response, ApiError> {
    let coordinate = TemporalCoordinate::from_query(query.name.as_deref(), query.time.as_deref())?;
    let url = query
        .url
        .ok_or_else(|| ReplayError::MalformedInput("missing url parameter".to_string()))?;

    let response = session
        .resolve_sub_resource(&PageId::new(page_id), &FrameId::new(frame_id), &coordinate, &url)
        .await?;
    Ok(into_http(response))
}

/// `GET /resource/{resource_id}`
pub async fn resource(
    State(session): State<AppState>,
    Path(resource_id): Path<String>,
    Query(query): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    let override_hash = query
        .sha1
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(ContentHash::parse)
        .transpose()
        .map_err(|e| ReplayError::from(CoreError::from(e)))?;

    let response = session
        .resolve_resource_by_id(&ResourceId::new(resource_id), override_hash.as_ref())
        .await?;
    Ok(into_http(response))
}

fn into_http(replayed: ReplayResponse) -> Response {
    let mut response = Response::new(Body::from(replayed.body));
    let headers = response.headers_mut();
    for recorded in &replayed.headers {
        match (
            HeaderName::from_bytes(recorded.name.as_bytes()),
            HeaderValue::from_str(&recorded.value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::debug!(name = %recorded.name, url = %replayed.url, "dropping unrepresentable header"),
        }
    }
    // Recorded origin of the body; a recorded Content-Location is kept as is.
    if let Ok(location) = HeaderValue::from_str(&replayed.url) {
        headers.entry(header::CONTENT_LOCATION).or_insert(location);
    }
    response
}
