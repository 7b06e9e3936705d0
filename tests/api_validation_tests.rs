// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation security tests.
//!
//! All of these must fail validation before any database access, so they
//! run against the offline mock.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(method: &str, uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"not-an-email","password":"long enough password","displayName":"Al"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"a@example.com","password":"short","displayName":"Al"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_claim_rejects_empty_name() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/claims",
            r#"{"itemId":"some-item","claimerName":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_claim_retraction_requires_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/claims/some-claim-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_item_rejects_plain_http_url() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("test-user", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/lists/some-list/items",
            &token,
            r#"{"title":"Socks","url":"http://shop.example.com/socks"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_item_rejects_overlong_title() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("test-user", &state.config.jwt_signing_key);
    let long_title = "a".repeat(201);

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/lists/some-list/items",
            &token,
            &format!(r#"{{"title":"{}"}}"#, long_title),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metadata_rejects_non_https_url() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("test-user", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/items/metadata",
            &token,
            r#"{"url":"http://shop.example.com/socks"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_deletion_requires_confirmation_literal() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("test-user", &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_json_request(
            "DELETE",
            "/users/delete",
            &token,
            r#"{"password":"whatever","confirmation":"delete"}"#,
        ))
        .await
        .unwrap();

    // Lowercase "delete" is not the required literal
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
