// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use opd_client::api::ApiClient;
use opd_client::auth::{SessionDb, SessionGuard, TokenStore};
use opd_client::config;
use opd_client::routes::Navigator;

#[tokio::main]
async fn main() {
    init_tracing();

    let data_dir = PathBuf::from(config::env_or_default(
        config::DATA_DIR_ENV,
        config::DEFAULT_DATA_DIR,
    ));
    let store: Arc<dyn TokenStore> = Arc::new(
        SessionDb::open(data_dir.join(config::SESSION_DB_FILE))
            .expect("failed to open session database"),
    );

    let redirect = Arc::new(shell::EntryRedirect::new());
    let navigator: Arc<dyn Navigator> = redirect.clone();
    let client =
        ApiClient::from_env(store.clone(), navigator).expect("failed to build API client");
    let guard = SessionGuard::new(store.clone());

    shell::run(client, guard, store, redirect).await;
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = config::env_or_default(config::LOG_FORMAT_ENV, "pretty");
    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
