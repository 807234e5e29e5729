// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Session state derived from the stored token.
//!
//! There is no session object to keep in sync: every answer is recomputed
//! from the store and the codec at the moment it is asked for, because time
//! advances between calls and the slot can change underneath us (login,
//! logout, a 401 teardown). None of these operations raises; a malformed
//! or expired token is simply equivalent to no session.
//!
//! Locally detected expiry only changes the computed answer; the token stays
//! in storage until an explicit logout or a remote 401 clears it. A stale
//! display name may therefore still render after expiry without any API
//! call, matching the original portal.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::claims::Claims;
use super::codec;
use super::roles::Role;
use super::store::TokenStore;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Authentication and authorization answers over an injected [`TokenStore`].
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Claims of the currently stored token, if there is one and it decodes.
    ///
    /// Store read failures and decode failures both answer `None`; callers
    /// never see an error from this path.
    pub fn current_claims(&self) -> Option<Claims> {
        let token = match self.store.get() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "token store read failed; treating session as absent");
                return None;
            }
        };
        match codec::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "stored token did not decode; treating session as absent");
                None
            }
        }
    }

    /// True iff a token is stored, decodes, and carries a future `exp`.
    ///
    /// A missing `exp` claim means never valid, not forever valid.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated_at(Utc::now().timestamp())
    }

    fn authenticated_at(&self, now: i64) -> bool {
        match self.current_claims().and_then(|claims| claims.exp) {
            Some(exp) => exp > now,
            None => false,
        }
    }

    /// Decide access for a view or endpoint restricted to `required` roles.
    ///
    /// `None` means no role restriction: any authenticated session is
    /// allowed. An unauthenticated session is always denied.
    pub fn authorize(&self, required: Option<&[Role]>) -> Access {
        if !self.is_authenticated() {
            return Access::Denied;
        }
        let Some(required) = required else {
            return Access::Granted;
        };
        let role = self
            .current_claims()
            .map(|claims| claims.role())
            .unwrap_or(Role::Unrecognized);
        if required.contains(&role) {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryTokenStore;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn token_with(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("{header}.{payload}.fake_signature")
    }

    fn guard_with_claims(claims: &str) -> (SessionGuard, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        store.save(&token_with(claims)).unwrap();
        (SessionGuard::new(store.clone()), store)
    }

    fn role_token(role: &str, exp: i64) -> String {
        format!(r#"{{"email":"u@example.test","role":"{role}","exp":{exp}}}"#)
    }

    #[test]
    fn future_exp_is_authenticated() {
        let exp = Utc::now().timestamp() + 3600;
        let (guard, _) = guard_with_claims(&role_token("patient", exp));
        assert!(guard.is_authenticated());
    }

    #[test]
    fn past_exp_is_not_authenticated() {
        let exp = Utc::now().timestamp() - 10;
        let (guard, _) = guard_with_claims(&role_token("doctor", exp));
        assert!(!guard.is_authenticated());
        assert_eq!(guard.authorize(Some(&[Role::Doctor])), Access::Denied);
        assert_eq!(guard.authorize(None), Access::Denied);
    }

    #[test]
    fn missing_exp_is_never_valid() {
        let (guard, _) = guard_with_claims(r#"{"email":"u@example.test","role":"admin"}"#);
        assert!(!guard.is_authenticated());
    }

    #[test]
    fn absent_token_is_anonymous() {
        let guard = SessionGuard::new(Arc::new(MemoryTokenStore::new()));
        assert_eq!(guard.current_claims(), None);
        assert!(!guard.is_authenticated());
        assert_eq!(guard.authorize(None), Access::Denied);
    }

    #[test]
    fn malformed_token_is_anonymous() {
        let store = Arc::new(MemoryTokenStore::new());
        store.save("not-a-token").unwrap();
        let guard = SessionGuard::new(store);
        assert_eq!(guard.current_claims(), None);
        assert!(!guard.is_authenticated());
    }

    #[test]
    fn local_expiry_does_not_clear_storage() {
        let exp = Utc::now().timestamp() - 10;
        let (guard, store) = guard_with_claims(&role_token("patient", exp));
        assert!(!guard.is_authenticated());
        // Only a remote 401 or an explicit logout clears the slot.
        assert!(store.get().unwrap().is_some());
    }

    #[test]
    fn authorize_checks_role_membership_over_the_closed_set() {
        let exp = Utc::now().timestamp() + 3600;
        let sets: [(Option<&[Role]>, [bool; 4]); 4] = [
            // expectations ordered patient, doctor, admin, unrecognized
            (None, [true, true, true, true]),
            (Some(&[Role::Patient]), [true, false, false, false]),
            (Some(&[Role::Doctor, Role::Admin]), [false, true, true, false]),
            (Some(&[Role::Admin]), [false, false, true, false]),
        ];
        for (i, role) in ["patient", "doctor", "admin", "nurse"].iter().enumerate() {
            let (guard, _) = guard_with_claims(&role_token(role, exp));
            for (required, expected) in &sets {
                let want = if expected[i] { Access::Granted } else { Access::Denied };
                assert_eq!(
                    guard.authorize(*required),
                    want,
                    "role {role} against {required:?}"
                );
            }
        }
    }

    #[test]
    fn missing_role_satisfies_no_restricted_set() {
        let exp = Utc::now().timestamp() + 3600;
        let (guard, _) =
            guard_with_claims(&format!(r#"{{"email":"u@example.test","exp":{exp}}}"#));
        assert!(guard.is_authenticated());
        assert_eq!(guard.authorize(Some(&[Role::Patient])), Access::Denied);
        assert_eq!(guard.authorize(None), Access::Granted);
    }

    #[test]
    fn current_claims_matches_token_fields() {
        let exp = Utc::now().timestamp() + 3600;
        let (guard, _) = guard_with_claims(&format!(
            r#"{{"email":"asha@example.test","name":"Asha Rao","role":"doctor","exp":{exp}}}"#
        ));
        let claims = guard.current_claims().unwrap();
        assert_eq!(claims.email, "asha@example.test");
        assert_eq!(claims.name.as_deref(), Some("Asha Rao"));
        assert_eq!(claims.role(), Role::Doctor);
        assert_eq!(claims.exp, Some(exp));
    }
}
