use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::accounts::{AuthProvider, InMemoryAuthProvider, SignUpProfile};
use crate::workflows::estimation::estimation_router;

fn router_with_auth() -> (axum::Router, Arc<dyn AuthProvider>) {
    let (service, _, _) = build_service();
    let auth: Arc<dyn AuthProvider> = Arc::new(InMemoryAuthProvider::new());
    (estimation_router(Arc::new(service), auth.clone()), auth)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

/// Signs `email` up and returns the `Authorization` header value for its session.
fn sign_in(auth: &Arc<dyn AuthProvider>, email: &str) -> String {
    let user = auth
        .sign_up(email, "secret-pass", SignUpProfile::default())
        .expect("sign up succeeds");
    let token = auth.open_session(&user).expect("session opens");
    format!("Bearer {}", token.0)
}

fn with_bearer(mut request: Request<Body>, bearer: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        bearer.parse().expect("valid header value"),
    );
    request
}

#[tokio::test]
async fn estimate_route_prices_answers() {
    let (router, _) = router_with_auth();
    let body = serde_json::to_value(scenario_a()).expect("serializes");

    let response = router
        .oneshot(json_request("POST", "/api/v1/estimates", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["totalCosts"], json!(77796));
    assert_eq!(payload["timeline"], json!(16));
    assert_eq!(payload["roi"], json!(161));
}

#[tokio::test]
async fn partial_answers_fall_back_to_form_defaults() {
    let (router, _) = router_with_auth();

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/estimates",
            &json!({"users": 251, "industry": "aerospace"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["packageTier"], json!("Enterprise"));
}

#[tokio::test]
async fn export_route_returns_csv_download() {
    let (router, _) = router_with_auth();
    let body = json!({
        "format": "csv",
        "answers": serde_json::to_value(scenario_a()).expect("serializes"),
    });

    let response = router
        .oneshot(json_request("POST", "/api/v1/estimates/export", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().ok(),
        Some("text/csv")
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"powerbi-cost-estimate-"));
    assert!(disposition.ends_with(".csv\""));

    let text = String::from_utf8(read_body(response).await).expect("utf8");
    assert!(text.contains("costBreakdown,totalCosts,77796"));
}

#[tokio::test]
async fn export_route_defaults_to_json() {
    let (router, _) = router_with_auth();

    let response = router
        .oneshot(json_request("POST", "/api/v1/estimates/export", &json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["companyInfo"]["name"], json!("Your Company"));
    assert_eq!(payload["developedBy"], json!("Mirko - M365 Summit"));
}

#[tokio::test]
async fn rules_route_exposes_active_table() {
    let (router, _) = router_with_auth();

    let response = router
        .oneshot(
            Request::get("/api/v1/rules")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["version"], json!("2024.1"));
    assert_eq!(payload["industryMultipliers"]["finance"], json!(1.5));
}

#[tokio::test]
async fn saving_requires_a_session() {
    let (router, _) = router_with_auth();
    let body = serde_json::to_value(scenario_a()).expect("serializes");

    let response = router
        .oneshot(json_request("POST", "/api/v1/calculations", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_history_is_empty() {
    let (router, _) = router_with_auth();

    let response = router
        .oneshot(
            Request::get("/api/v1/calculations")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));
}

#[tokio::test]
async fn signed_in_user_manages_calculations() {
    let (router, auth) = router_with_auth();
    let bearer = sign_in(&auth, "dana@contoso.com");
    let body = serde_json::to_value(scenario_a()).expect("serializes");

    let created = router
        .clone()
        .oneshot(with_bearer(
            json_request("POST", "/api/v1/calculations", &body),
            &bearer,
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = read_json_body(created).await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["userEmail"], json!("dana@contoso.com"));
    assert_eq!(created["costBreakdown"]["totalCosts"], json!(77796));

    let mut edited = scenario_a();
    edited.users = 120;
    let updated = router
        .clone()
        .oneshot(with_bearer(
            json_request(
                "PUT",
                &format!("/api/v1/calculations/{id}"),
                &serde_json::to_value(edited).expect("serializes"),
            ),
            &bearer,
        ))
        .await
        .expect("route executes");
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = read_json_body(updated).await;
    assert_eq!(updated["costBreakdown"]["packageTier"], json!("Professional"));

    let listed = router
        .clone()
        .oneshot(with_bearer(
            Request::get("/api/v1/calculations")
                .body(Body::empty())
                .expect("request builds"),
            &bearer,
        ))
        .await
        .expect("route executes");
    let listed = read_json_body(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let deleted = router
        .clone()
        .oneshot(with_bearer(
            Request::delete(format!("/api/v1/calculations/{id}"))
                .body(Body::empty())
                .expect("request builds"),
            &bearer,
        ))
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = router
        .oneshot(with_bearer(
            Request::delete(format!("/api/v1/calculations/{id}"))
                .body(Body::empty())
                .expect("request builds"),
            &bearer,
        ))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clients_without_a_token_never_act_as_another_user() {
    let (router, auth) = router_with_auth();
    let bearer = sign_in(&auth, "alice@contoso.com");
    let body = serde_json::to_value(scenario_a()).expect("serializes");
    let created = router
        .clone()
        .oneshot(with_bearer(
            json_request("POST", "/api/v1/calculations", &body),
            &bearer,
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = read_json_body(created).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let listed = router
        .clone()
        .oneshot(
            Request::get("/api/v1/calculations")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(read_json_body(listed).await, json!([]));

    let deleted = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/v1/calculations/{id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::UNAUTHORIZED);

    let updated = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/calculations/{id}"),
            &body,
        ))
        .await
        .expect("route executes");
    assert_eq!(updated.status(), StatusCode::UNAUTHORIZED);

    let still_there = router
        .oneshot(with_bearer(
            Request::get("/api/v1/calculations")
                .body(Body::empty())
                .expect("request builds"),
            &bearer,
        ))
        .await
        .expect("route executes");
    let still_there = read_json_body(still_there).await;
    assert_eq!(still_there.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn another_session_cannot_read_or_delete_foreign_records() {
    let (router, auth) = router_with_auth();
    let alice = sign_in(&auth, "alice@contoso.com");
    let mallory = sign_in(&auth, "mallory@contoso.com");
    let body = serde_json::to_value(scenario_a()).expect("serializes");
    let created = router
        .clone()
        .oneshot(with_bearer(
            json_request("POST", "/api/v1/calculations", &body),
            &alice,
        ))
        .await
        .expect("route executes");
    let id = read_json_body(created).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let listed = router
        .clone()
        .oneshot(with_bearer(
            Request::get("/api/v1/calculations")
                .body(Body::empty())
                .expect("request builds"),
            &mallory,
        ))
        .await
        .expect("route executes");
    assert_eq!(read_json_body(listed).await, json!([]));

    let deleted = router
        .oneshot(with_bearer(
            Request::delete(format!("/api/v1/calculations/{id}"))
                .body(Body::empty())
                .expect("request builds"),
            &mallory,
        ))
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_tokens_are_rejected() {
    let (router, _) = router_with_auth();

    let response = router
        .oneshot(with_bearer(
            Request::get("/api/v1/calculations")
                .body(Body::empty())
                .expect("request builds"),
            "Bearer not-a-session",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
