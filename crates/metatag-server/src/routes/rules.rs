//! Override rule admin routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::routes::{error_response, not_found};
use crate::state::AppState;
use metatag_core::{OverrideRule, RuleFields, RuleStore};
use metatag_resolve::{summarize, LIST_EXCERPT_LENGTH};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rules", get(list_rules).post(create_rule))
        .route(
            "/rules/{id}",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
}

/// A rule plus the display columns of the admin listing.
fn list_entry(rule: &OverrideRule) -> serde_json::Value {
    let excerpt = summarize(&rule.description, LIST_EXCERPT_LENGTH);
    serde_json::json!({
        "id": rule.id,
        "path_pattern": rule.path_pattern,
        "domains": rule.domains,
        "language": rule.language,
        "title": rule.title,
        "description": rule.description,
        "image": rule.image,
        "weight": rule.weight,
        "status": rule.status,
        "domainsMalformed": rule.domains_malformed,
        "descriptionExcerpt": if excerpt.is_empty() { "-".to_string() } else { excerpt },
        "domainDisplay": if rule.domains.is_empty() { "All".to_string() } else { rule.domains.join(", ") },
        "languageDisplay": if rule.language.is_empty() { "All" } else { rule.language.as_str() },
    })
}

/// GET /api/rules: every rule, id ascending.
async fn list_rules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_rules() {
        Ok(rules) => {
            let entries: Vec<_> = rules.iter().map(list_entry).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "rules": entries,
                    "count": entries.len(),
                })),
            )
        }
        Err(e) => error_response(&e),
    }
}

/// POST /api/rules: create a rule.
async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<RuleFields>,
) -> impl IntoResponse {
    match state.store.create_rule(&fields) {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))),
        Err(e) => error_response(&e),
    }
}

/// GET /api/rules/{id}
async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get_rule(id) {
        Ok(Some(rule)) => (StatusCode::OK, Json(list_entry(&rule))),
        Ok(None) => not_found("Rule"),
        Err(e) => error_response(&e),
    }
}

/// PUT /api/rules/{id}: replace a rule's fields.
async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(fields): Json<RuleFields>,
) -> impl IntoResponse {
    match state.store.update_rule(id, &fields) {
        Ok(true) => match state.store.get_rule(id) {
            Ok(Some(rule)) => (StatusCode::OK, Json(list_entry(&rule))),
            Ok(None) => not_found("Rule"),
            Err(e) => error_response(&e),
        },
        Ok(false) => not_found("Rule"),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/rules/{id}
async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_rule(id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "deleted": true, "id": id }))),
        Ok(false) => not_found("Rule"),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_router;
    use crate::routes::testing::send;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_create_and_list() {
        let (state, _dir) = test_state();

        let (status, body) = send(
            build_router(state.clone()),
            "POST",
            "/api/rules",
            Some(serde_json::json!({
                "path_pattern": "/blog/*",
                "domains": ["a.com", "b.com"],
                "title": "Blog",
                "description": format!("<p>{}</p>", "z".repeat(100)),
                "weight": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_number());

        send(
            build_router(state.clone()),
            "POST",
            "/api/rules",
            Some(serde_json::json!({ "path_pattern": "/about", "language": "en" })),
        )
        .await;

        let (status, body) = send(build_router(state), "GET", "/api/rules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);

        let blog = &body["rules"][0];
        assert_eq!(blog["domainDisplay"], "a.com, b.com");
        assert_eq!(blog["languageDisplay"], "All");
        assert_eq!(blog["descriptionExcerpt"], format!("{}...", "z".repeat(80)));

        let about = &body["rules"][1];
        assert_eq!(about["domainDisplay"], "All");
        assert_eq!(about["languageDisplay"], "en");
        assert_eq!(about["descriptionExcerpt"], "-");
    }

    #[tokio::test]
    async fn test_invalid_rule_rejected() {
        let (state, _dir) = test_state();
        let (status, body) = send(
            build_router(state),
            "POST",
            "/api/rules",
            Some(serde_json::json!({ "path_pattern": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Validation"));
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let (state, _dir) = test_state();
        let id = state
            .store
            .create_rule(&RuleFields {
                path_pattern: "/about".into(),
                title: "Old".into(),
                ..Default::default()
            })
            .unwrap();
        let uri = format!("/api/rules/{}", id);

        let (status, body) = send(build_router(state.clone()), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Old");

        let (status, body) = send(
            build_router(state.clone()),
            "PUT",
            &uri,
            Some(serde_json::json!({ "path_pattern": "/about", "title": "New", "status": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "New");
        assert_eq!(body["status"], false);

        let (status, _) = send(build_router(state.clone()), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(build_router(state), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rule_with_unreadable_domains_is_listed() {
        let (state, _dir) = test_state();
        let id = state
            .store
            .create_rule(&RuleFields {
                path_pattern: "/about".into(),
                domains: vec!["a.com".into()],
                title: "About".into(),
                ..Default::default()
            })
            .unwrap();
        rusqlite::Connection::open(state.store.db_path())
            .unwrap()
            .execute(
                "UPDATE metatag_path_rules SET domains_json = 'garbage' WHERE id = ?1",
                [id],
            )
            .unwrap();
        let uri = format!("/api/rules/{}", id);

        let (status, body) = send(build_router(state.clone()), "GET", "/api/rules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["rules"][0]["id"], id);
        assert_eq!(body["rules"][0]["domainsMalformed"], true);
        assert_eq!(body["rules"][0]["domainDisplay"], "All");

        let (status, body) = send(build_router(state.clone()), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "About");
        assert_eq!(body["domainsMalformed"], true);

        // Never applied to a request
        let (_, body) = send(build_router(state.clone()), "GET", "/api/metatags?path=/about", None).await;
        assert_eq!(body["source"]["kind"], "unresolved");

        let (status, body) = send(
            build_router(state.clone()),
            "PUT",
            &uri,
            Some(serde_json::json!({ "path_pattern": "/about", "title": "About", "domains": ["example.com"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["domainsMalformed"], false);

        let (_, body) = send(build_router(state), "GET", "/api/metatags?path=/about", None).await;
        assert_eq!(body["metatags"]["title"], "About");
    }

    #[tokio::test]
    async fn test_missing_rule() {
        let (state, _dir) = test_state();
        let (status, _) = send(
            build_router(state.clone()),
            "PUT",
            "/api/rules/999",
            Some(serde_json::json!({ "path_pattern": "/x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(build_router(state), "DELETE", "/api/rules/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
