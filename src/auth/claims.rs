// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Session token claims.

use serde::Deserialize;

use super::roles::Role;

/// Claims decoded from the payload segment of a session token.
///
/// Tokens issued by the Authentication Service carry the account email as
/// the subject plus the role and expiry; a display name is present on newer
/// tokens only. Claims are an ephemeral view recomputed from the stored
/// token on demand and never persisted on their own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// Subject identifier (the account email)
    pub email: String,

    /// Display name, when the token carries one
    #[serde(default)]
    pub name: Option<String>,

    /// Access role; absent or unknown values satisfy no restricted set
    #[serde(default)]
    pub role: Option<Role>,

    /// Expiry, seconds since epoch. Absent means never valid.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// Effective role for authorization decisions.
    pub fn role(&self) -> Role {
        self.role.unwrap_or(Role::Unrecognized)
    }

    /// Name to show in headers, falling back to a role title like the
    /// original portal does.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.role().fallback_name())
    }
}
