//! Store statistics route.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats: rule, record and content mirror counts.
async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = match state.store.get_stats() {
        Ok(stats) => stats,
        Err(e) => return error_response(&e),
    };
    let malformed = match state.store.malformed_rule_ids() {
        Ok(ids) => ids,
        Err(e) => return error_response(&e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "rules": stats.total_rules,
            "activeRules": stats.active_rules,
            "malformedRules": malformed.len(),
            "entityRecords": stats.entity_records,
            "contentItems": stats.content_items,
            "taxonomyTerms": stats.taxonomy_terms,
            "assets": stats.assets,
            "referenceFields": stats.reference_fields,
            "baseUrl": state.config.base_url,
            "frontPage": state.config.front_page,
            "defaultLanguage": state.config.default_language,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_router;
    use crate::routes::testing::send;
    use crate::state::test_state;
    use metatag_core::{RuleFields, RuleStore};

    #[tokio::test]
    async fn test_stats_counts() {
        let (state, _dir) = test_state();
        state
            .store
            .create_rule(&RuleFields {
                path_pattern: "/a".into(),
                ..Default::default()
            })
            .unwrap();
        state
            .store
            .create_rule(&RuleFields {
                path_pattern: "/b".into(),
                status: false,
                ..Default::default()
            })
            .unwrap();

        let (status, body) = send(build_router(state), "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rules"], 2);
        assert_eq!(body["activeRules"], 1);
        assert_eq!(body["malformedRules"], 0);
        assert_eq!(body["contentItems"], 0);
        assert_eq!(body["baseUrl"], "https://example.com");
    }

    #[tokio::test]
    async fn test_stats_malformed_rules() {
        let (state, _dir) = test_state();
        let id = state
            .store
            .create_rule(&RuleFields {
                path_pattern: "/a".into(),
                ..Default::default()
            })
            .unwrap();
        rusqlite::Connection::open(state.store.db_path())
            .unwrap()
            .execute(
                "UPDATE metatag_path_rules SET domains_json = '{broken' WHERE id = ?1",
                [id],
            )
            .unwrap();

        let (status, body) = send(build_router(state), "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["malformedRules"], 1);
    }

    #[tokio::test]
    async fn test_stats_store_failure() {
        let (state, _dir) = test_state();
        rusqlite::Connection::open(state.store.db_path())
            .unwrap()
            .execute_batch("DROP TABLE metatag_path_rules;")
            .unwrap();

        let (status, body) = send(build_router(state), "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }
}
