// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Remote service access.

pub mod client;

pub use client::ApiClient;
