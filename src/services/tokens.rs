// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Random identifier and secret-token generation.
//!
//! All identifiers in the system come from the same construction: raw bytes
//! from the system CSPRNG, base64url-encoded without padding. Only the byte
//! count differs per use.

use crate::error::AppError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

/// Length of a claim secret token in characters (24 bytes -> 32 chars).
pub const SECRET_TOKEN_LEN: usize = 32;

// Document ids: 16 bytes -> 22 chars.
const DOCUMENT_ID_BYTES: usize = 16;
// Share ids: 7 bytes -> 10 chars.
const SHARE_ID_BYTES: usize = 7;
// Secret tokens: 24 bytes -> 32 chars.
const SECRET_TOKEN_BYTES: usize = 24;

fn random_string(n_bytes: usize) -> Result<String, AppError> {
    let mut buf = vec![0u8; n_bytes];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Generate a document identifier (users, lists, items, claims).
pub fn generate_document_id() -> Result<String, AppError> {
    random_string(DOCUMENT_ID_BYTES)
}

/// Generate a public share identifier for a list.
pub fn generate_share_id() -> Result<String, AppError> {
    random_string(SHARE_ID_BYTES)
}

/// Generate a claim secret token.
pub fn generate_secret_token() -> Result<String, AppError> {
    random_string(SECRET_TOKEN_BYTES)
}
