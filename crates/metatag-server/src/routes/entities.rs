//! Entity metadata record routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::routes::{error_response, not_found};
use crate::state::AppState;
use metatag_core::{AssetRef, ContentProvider, EntityMetadataRecord, EntityType, Result};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/entities/{entity_type}/{id}/metadata",
        get(get_record).put(put_record).delete(delete_record),
    )
}

#[derive(Deserialize)]
struct RecordBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_type(raw: &str) -> Result<EntityType> {
    raw.parse()
}

/// GET /api/entities/{type}/{id}/metadata
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path((entity_type, id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let entity_type = match parse_type(&entity_type) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    match state.store.get_entity_metadata_record(entity_type, id) {
        Ok(Some(record)) => (StatusCode::OK, Json(serde_json::json!(record))),
        Ok(None) => not_found("Metadata record"),
        Err(e) => error_response(&e),
    }
}

/// PUT /api/entities/{type}/{id}/metadata: create or replace the record.
async fn put_record(
    State(state): State<Arc<AppState>>,
    Path((entity_type, id)): Path<(String, i64)>,
    Json(body): Json<RecordBody>,
) -> impl IntoResponse {
    let entity_type = match parse_type(&entity_type) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let record = EntityMetadataRecord {
        entity_type,
        entity_id: id,
        title: non_blank(body.title),
        description: non_blank(body.description),
        image: AssetRef::from_optional(body.image),
    };
    match state.store.upsert_entity_record(&record) {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!(record))),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/entities/{type}/{id}/metadata
async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path((entity_type, id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let entity_type = match parse_type(&entity_type) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    match state.store.delete_entity_record(entity_type, id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "deleted": true }))),
        Ok(false) => not_found("Metadata record"),
        Err(e) => error_response(&e),
    }
}
