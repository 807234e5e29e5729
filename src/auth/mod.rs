// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! # Session and Authorization Module
//!
//! Everything between "the service handed us a token" and "may this user
//! see this view" lives here.
//!
//! ## Session Flow
//!
//! 1. Login/register returns a signed session token
//! 2. The token is saved whole into the durable single-slot [`TokenStore`]
//! 3. [`codec`] decodes the payload segment into [`Claims`] on demand
//! 4. [`SessionGuard`] turns store + claims into authentication and
//!    authorization answers, re-evaluated on every call
//!
//! ## Trust Boundary
//!
//! Signatures are never verified client-side; the issuing service validates
//! every authenticated request itself, and a 401 response tears the local
//! session down. Claims only drive view gating and identity display.

pub mod claims;
pub mod codec;
pub mod roles;
pub mod session;
pub mod store;

pub use claims::Claims;
pub use codec::DecodeError;
pub use roles::Role;
pub use session::{Access, SessionGuard};
pub use store::{MemoryTokenStore, SessionDb, StoreError, TokenStore};
