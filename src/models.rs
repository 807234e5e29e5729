// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! # API Data Models
//!
//! Request and response structures for the remote Authentication and
//! Analytics/Prediction services, matching their wire shapes field for
//! field. All types derive `Serialize`/`Deserialize` for JSON handling.
//!
//! ## Model Categories
//!
//! - **Auth**: login/register requests and the token-bearing response
//! - **Prediction**: patient OPD load prediction round trip
//! - **Analytics**: doctor (department-scoped) and admin (system-wide)
//!   aggregate metrics, including the chart rows the dashboards render

use serde::{Deserialize, Serialize};

use crate::auth::Role;

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// New-account profile for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Successful login/register response; the token starts a session.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// Account summary echoed by the auth endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UserSummary {
    pub email: String,
    pub name: String,
    pub role: Role,
}

// =============================================================================
// Prediction Models
// =============================================================================

/// Patient input for `POST /api/predict-opd`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: u32,
    pub department: String,
    pub symptoms: String,
    /// Optional location, used by the service to rank nearby hospitals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_lng: Option<f64>,
}

/// OPD load prediction for one patient visit.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Prediction {
    /// `Low`, `Medium` or `High`
    pub risk_level: String,
    /// Expected patient count, 1-100
    pub predicted_load: u32,
    /// Confidence in the congestion estimate, 0.0-1.0
    pub congestion_confidence: f64,
    /// Suggested visiting window, e.g. `"8:00 AM - 10:00 AM"`
    pub best_visiting_time: String,
    /// Personalized scheduling advice
    pub recommendation: String,
    #[serde(default)]
    pub nearby_hospitals: Option<Vec<Hospital>>,
}

/// A nearby hospital suggestion attached to a prediction.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Hospital {
    pub name: String,
    pub distance: String,
    pub estimated_wait: String,
    pub rating: f64,
    pub ai_recommended: bool,
}

// =============================================================================
// Analytics Models
// =============================================================================

/// Department-scoped metrics for `GET /api/doctor/analytics`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DoctorAnalytics {
    pub opd_risk_level: String,
    pub patients_today: u64,
    pub high_risk_cases: u64,
    pub most_common_symptom: String,
    pub department_distribution: Vec<NamedCount>,
    pub risk_distribution: Vec<NamedCount>,
    pub hourly_load: Vec<HourlyLoad>,
}

/// System-wide metrics for `GET /api/admin/analytics`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdminAnalytics {
    pub total_patients_today: u64,
    pub high_risk_periods: u64,
    pub peak_opd_time: String,
    pub ai_summary: String,
    pub weekly_trends: Vec<DailyLoad>,
    pub system_status: String,
    pub prediction_accuracy: f64,
}

/// One labelled slice of a distribution chart.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

/// One hour of expected patient load.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HourlyLoad {
    pub hour: String,
    pub patients: u64,
}

/// One day of the weekly trend chart.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DailyLoad {
    pub day: String,
    pub patients: u64,
}

// =============================================================================
// Service Health
// =============================================================================

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
    pub service: String,
}
