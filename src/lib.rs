// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! OPD Predict - Role-Gated Prediction Service Client
//!
//! This crate implements the session and authorization kernel of the OPD
//! load prediction client: durable single-slot token storage, unverified
//! claim decoding, role-gated navigation, and an HTTP wrapper that attaches
//! credentials and tears the session down on server-side rejection.
//!
//! ## Modules
//!
//! - `api` - HTTP client for the remote services (reqwest)
//! - `auth` - Token codec, store, and session guard
//! - `routes` - Per-navigation view authorization
//! - `models` - Wire shapes of the remote services
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
