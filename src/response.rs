// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Success envelope shared by all API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON success response body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub status_code: u16,
}

/// Generic success message payload.
#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 200 response with the standard success envelope.
pub fn ok<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::OK, data)
}

/// 201 response with the standard success envelope.
pub fn created<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::CREATED, data)
}

fn envelope<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = ApiSuccess {
        success: true,
        data,
        status_code: status.as_u16(),
    };
    (status, Json(body)).into_response()
}
