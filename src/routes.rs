// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Route-level authorization.
//!
//! Each navigable view declares its required role set; [`resolve`] consults
//! the [`SessionGuard`] before anything about the view runs (including its
//! own data fetch) and answers the entry screen on denial. The check is
//! re-evaluated on every navigation attempt and holds no state between
//! them.

use crate::auth::{Access, Role, SessionGuard};

/// Navigable views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login/register screen; never gated
    Entry,
    PatientDashboard,
    DoctorDashboard,
    AdminDashboard,
}

impl Route {
    /// Whether this view sits behind the session guard at all.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Entry)
    }

    /// Roles allowed to render this view; `None` means any authenticated
    /// session. The doctor dashboard admits admins as well.
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Entry => None,
            Route::PatientDashboard => Some(&[Role::Patient]),
            Route::DoctorDashboard => Some(&[Role::Doctor, Role::Admin]),
            Route::AdminDashboard => Some(&[Role::Admin]),
        }
    }

    /// Post-login landing view for a role.
    pub fn home_for(role: Role) -> Route {
        match role {
            Role::Patient => Route::PatientDashboard,
            Role::Doctor => Route::DoctorDashboard,
            Role::Admin => Route::AdminDashboard,
            Role::Unrecognized => Route::Entry,
        }
    }
}

/// Decide where a navigation attempt actually lands.
///
/// Denied navigation falls back to [`Route::Entry`]; the view itself may
/// then read claims for display via [`SessionGuard::current_claims`].
pub fn resolve(route: Route, guard: &SessionGuard) -> Route {
    if !route.is_protected() {
        return route;
    }
    match guard.authorize(route.required_roles()) {
        Access::Granted => route,
        Access::Denied => Route::Entry,
    }
}

/// Forced-navigation signal, injected into the transport layer so the 401
/// teardown can redirect without knowing anything about the UI.
pub trait Navigator: Send + Sync {
    fn redirect_to_entry(&self);
}
