// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! User roles for authorization.

use serde::{Deserialize, Serialize};

/// User roles for view and endpoint gating.
///
/// The role set is closed: `patient`, `doctor` and `admin` are the only
/// values the service issues. Anything else in a token (including a missing
/// role claim) maps to [`Role::Unrecognized`], which satisfies no
/// restricted route or endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Patient portal user (prediction requests)
    Patient,
    /// Doctor dashboard user (department analytics)
    Doctor,
    /// Administrator (system-wide analytics)
    Admin,
    /// Any role value outside the closed set
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Map a raw claim value onto the closed role set (case-insensitive).
    ///
    /// Total: unknown strings become [`Role::Unrecognized`] rather than an
    /// error, so a tampered or out-of-date token degrades to "no access"
    /// instead of a failure the UI would have to handle.
    pub fn from_claim(s: &str) -> Role {
        match s.to_lowercase().as_str() {
            "patient" => Role::Patient,
            "doctor" => Role::Doctor,
            "admin" => Role::Admin,
            _ => Role::Unrecognized,
        }
    }

    /// Title used by the views when the token carries no display name.
    pub fn fallback_name(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Admin => "Admin",
            Role::Unrecognized => "User",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
            Role::Admin => write!(f, "admin"),
            Role::Unrecognized => write!(f, "unrecognized"),
        }
    }
}
