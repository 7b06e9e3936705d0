// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rate limiting tests against the full router.
//!
//! The strict limiter guards auth and claim endpoints; once a client's
//! budget is exhausted the API answers 429 with a Retry-After hint.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn login_request(ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            r#"{"email":"a@example.com","password":"whatever!"}"#,
        ))
        .unwrap()
}

#[tokio::test]
async fn test_auth_endpoint_rate_limited_with_retry_after() {
    let (app, state) = common::create_test_app();
    let budget = state.config.auth_rate_limit_per_minute;

    for _ in 0..budget {
        let response = app.clone().oneshot(login_request("9.9.9.9")).await.unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    let response = app.clone().oneshot(login_request("9.9.9.9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .expect("missing Retry-After header")
        .to_str()
        .unwrap()
        .parse::<u64>()
        .unwrap();
    assert!(retry_after >= 1 && retry_after <= 60);
}

#[tokio::test]
async fn test_rate_limit_is_per_client() {
    let (app, state) = common::create_test_app();
    let budget = state.config.auth_rate_limit_per_minute;

    for _ in 0..budget {
        app.clone().oneshot(login_request("1.1.1.1")).await.unwrap();
    }

    // First client exhausted, second untouched
    let blocked = app.clone().oneshot(login_request("1.1.1.1")).await.unwrap();
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    let allowed = app.clone().oneshot(login_request("2.2.2.2")).await.unwrap();
    assert_ne!(allowed.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_not_rate_limited() {
    let (app, state) = common::create_test_app();
    let well_past_budget = state.config.auth_rate_limit_per_minute + 5;

    for _ in 0..well_past_budget {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .header("x-forwarded-for", "9.9.9.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
