// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! # Runtime Configuration Constants
//!
//! Environment variable names and default values. Configuration is read
//! from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `OPD_API_BASE_URL` | Base URL of the prediction service | `http://localhost:8000` |
//! | `OPD_DATA_DIR` | Directory holding the durable session database | `.opd-client` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable naming the service base URL.
pub const API_BASE_URL_ENV: &str = "OPD_API_BASE_URL";

/// Default service base URL (local development server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable naming the client data directory.
pub const DATA_DIR_ENV: &str = "OPD_DATA_DIR";

/// Default client data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".opd-client";

/// File name of the session database inside the data directory.
pub const SESSION_DB_FILE: &str = "session.redb";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Read an environment variable, falling back to `default` when it is
/// unset or blank.
pub fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
