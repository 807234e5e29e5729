// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Client-side failure taxonomy for remote calls.

use reqwest::StatusCode;

/// Failures surfaced by [`crate::api::ApiClient`].
///
/// `Unauthorized` is the only variant with a side effect behind it: by the
/// time a caller sees it, the stored token is gone and the navigation
/// signal has fired. Everything else propagates unmodified, one attempt
/// per logical call, with no retry and no local recovery.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("configuration invalid: {0}")]
    Config(String),

    #[error("session rejected by the server: {0}")]
    Unauthorized(String),

    #[error("{path} returned {status}: {detail}")]
    Remote {
        path: String,
        status: StatusCode,
        detail: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response was invalid: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True when the failure tore the session down.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
