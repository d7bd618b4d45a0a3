//! Metatag resolution route.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use metatag_core::host_without_port;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/metatags", get(get_metatags))
}

#[derive(Deserialize)]
struct MetatagQuery {
    path: Option<String>,
    lang: Option<String>,
    domain: Option<String>,
}

/// GET /api/metatags: resolved metatags for `path`, scoped by `lang` and `domain`.
async fn get_metatags(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<MetatagQuery>,
) -> impl IntoResponse {
    let path = match query.path.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Missing required query parameter: path" })),
            );
        }
    };

    let domain = query
        .domain
        .filter(|d| !d.trim().is_empty())
        .or_else(|| {
            headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(|host| host_without_port(host).to_string())
        })
        .unwrap_or_default();

    let ctx = state.request_context(&path, query.lang.as_deref(), &domain);
    let resolution = state.resolve(&ctx);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "path": ctx.path,
            "language": ctx.language,
            "domain": ctx.domain,
            "source": resolution.source,
            "metatags": resolution.metadata,
        })),
    )
}
