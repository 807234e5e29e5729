// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Session token decoding.
//!
//! The client never verifies token signatures. That is the issuing
//! service's job, and every authenticated call is re-checked server-side
//! anyway. Decoding here only feeds UI and authorization decisions: split
//! the token on `.`, base64url-decode the payload segment, parse the bytes
//! as UTF-8 JSON claims.

use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};

use super::claims::Claims;

/// Why a raw token string could not be decoded into [`Claims`].
///
/// Callers treat any of these as "no session"; the variants exist for
/// logging, not for control flow.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("token has no payload segment")]
    MissingPayload,

    #[error("payload segment is not valid base64url")]
    InvalidBase64,

    #[error("payload is not valid claims JSON: {0}")]
    InvalidClaims(#[from] serde_json::Error),
}

/// Decode the payload segment of a session token into [`Claims`].
///
/// Accepts any string, including garbage, and never panics. A token needs at
/// least two period-delimited segments; the signature segment is ignored
/// entirely, so an unsigned `header.payload` token decodes fine.
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let payload = token.split('.').nth(1).ok_or(DecodeError::MissingPayload)?;
    let bytes = decode_segment(payload).ok_or(DecodeError::InvalidBase64)?;
    // from_slice rejects non-UTF-8 input, so multi-byte names survive intact
    Ok(serde_json::from_slice(&bytes)?)
}

/// Issuers differ on whether base64url segments are padded.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| URL_SAFE.decode(segment))
        .ok()
}
