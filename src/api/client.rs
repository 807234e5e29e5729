// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! HTTP client for the Authentication and Analytics/Prediction services.
//!
//! Every call goes through the same dispatch path: snapshot the stored
//! token, attach it as a bearer credential when present, send once, check
//! the status. A 401 from any endpoint means the session is invalid;
//! this is the single place that knows that, so it clears the store, fires
//! the injected navigation signal, and still surfaces the failure to the
//! caller. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::auth::TokenStore;
use crate::config;
use crate::error::ApiError;
use crate::models::{
    AdminAnalytics, AuthResponse, DoctorAnalytics, Health, LoginRequest, Prediction,
    PredictionRequest, RegisterRequest,
};
use crate::routes::Navigator;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Transport wrapper around the remote prediction service.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http,
            store,
            navigator,
        })
    }

    /// Build a client from `OPD_API_BASE_URL` (see [`crate::config`]).
    pub fn from_env(
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let raw = config::env_or_default(config::API_BASE_URL_ENV, config::DEFAULT_API_BASE_URL);
        let base_url = Url::parse(&raw).map_err(|e| {
            ApiError::Config(format!("{} is not a valid URL: {e}", config::API_BASE_URL_ENV))
        })?;
        Self::new(base_url, store, navigator)
    }

    // ========== Typed Operations ==========

    /// `POST /api/auth/login`. Unauthenticated; the caller saves the token.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/auth/login", credentials).await
    }

    /// `POST /api/auth/register`. Unauthenticated; the caller saves the token.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/auth/register", profile).await
    }

    /// `POST /api/predict-opd`.
    pub async fn predict_opd(&self, input: &PredictionRequest) -> Result<Prediction, ApiError> {
        self.post_json("/api/predict-opd", input).await
    }

    /// `GET /api/doctor/analytics`.
    pub async fn doctor_analytics(&self) -> Result<DoctorAnalytics, ApiError> {
        self.get_json("/api/doctor/analytics").await
    }

    /// `GET /api/admin/analytics`.
    pub async fn admin_analytics(&self) -> Result<AdminAnalytics, ApiError> {
        self.get_json("/api/admin/analytics").await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get_json("/api/health").await
    }

    // ========== Dispatch ==========

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.dispatch(self.http.get(self.endpoint(path)), path).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("GET {path} returned invalid JSON: {e}")))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.post(self.endpoint(path)).json(body);
        let response = self.dispatch(builder, path).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("POST {path} returned invalid JSON: {e}")))
    }

    /// Attach the credential snapshot, send once, and classify the status.
    async fn dispatch(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let builder = match self.bearer_token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let detail = read_detail(response).await;
            self.invalidate_session();
            return Err(ApiError::Unauthorized(detail));
        }
        if !status.is_success() {
            return Err(ApiError::Remote {
                path: path.to_string(),
                status,
                detail: read_detail(response).await,
            });
        }
        Ok(response)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token snapshot at dispatch time. A store read failure dispatches the
    /// request without credentials, same as an absent token.
    fn bearer_token(&self) -> Option<String> {
        match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "token store read failed; dispatching without credentials");
                None
            }
        }
    }

    /// Session teardown on a 401: clear the slot, signal the redirect.
    /// The original failure still propagates to the caller afterwards.
    fn invalidate_session(&self) {
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "failed to clear rejected session token");
        }
        info!("session rejected by the server; returning to entry");
        self.navigator.redirect_to_entry();
    }
}

/// Pull the human-readable detail out of a service error body.
async fn read_detail(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => value
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(body),
        Err(_) => body,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use axum::extract::State;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::auth::MemoryTokenStore;

    #[derive(Default)]
    struct CountingNavigator {
        redirects: AtomicUsize,
    }

    impl Navigator for CountingNavigator {
        fn redirect_to_entry(&self) {
            self.redirects.fetch_add(1, Ordering::SeqCst);
        }
    }

    type SeenAuth = Arc<Mutex<Option<String>>>;

    async fn health(State(seen): State<SeenAuth>, headers: HeaderMap) -> Json<Value> {
        *seen.lock().unwrap() = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({"status": "healthy", "service": "OPD Prediction API"}))
    }

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn client_with(
        base_url: Url,
        store: Arc<MemoryTokenStore>,
        navigator: Arc<CountingNavigator>,
    ) -> ApiClient {
        ApiClient::new(base_url, store, navigator).unwrap()
    }

    #[tokio::test]
    async fn attaches_bearer_credential_when_token_present() {
        let seen: SeenAuth = Arc::default();
        let router = Router::new()
            .route("/api/health", get(health))
            .with_state(seen.clone());
        let base_url = serve(router).await;

        let store = Arc::new(MemoryTokenStore::new());
        store.save("tok-123").unwrap();
        let client = client_with(base_url, store, Arc::default());

        client.health().await.unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Bearer tok-123"));
    }

    #[tokio::test]
    async fn dispatches_without_credentials_when_token_absent() {
        let seen: SeenAuth = Arc::default();
        let router = Router::new()
            .route("/api/health", get(health))
            .with_state(seen.clone());
        let base_url = serve(router).await;

        let client = client_with(base_url, Arc::new(MemoryTokenStore::new()), Arc::default());

        let health = client.health().await.unwrap();
        assert_eq!(health.service, "OPD Prediction API");
        assert_eq!(*seen.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_signals_navigation_once() {
        async fn rejected() -> (axum::http::StatusCode, Json<Value>) {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Token has expired"})),
            )
        }
        let router = Router::new().route("/api/doctor/analytics", get(rejected));
        let base_url = serve(router).await;

        let store = Arc::new(MemoryTokenStore::new());
        store.save("stale-token").unwrap();
        let navigator = Arc::new(CountingNavigator::default());
        let client = client_with(base_url, store.clone(), navigator.clone());

        let err = client.doctor_analytics().await.unwrap_err();
        match err {
            ApiError::Unauthorized(detail) => assert_eq!(detail, "Token has expired"),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
        assert_eq!(store.get().unwrap(), None);
        assert_eq!(navigator.redirects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_401_failures_leave_the_session_intact() {
        async fn exploded() -> (axum::http::StatusCode, Json<Value>) {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "prediction backend unavailable"})),
            )
        }
        let router = Router::new().route("/api/predict-opd", post(exploded));
        let base_url = serve(router).await;

        let store = Arc::new(MemoryTokenStore::new());
        store.save("good-token").unwrap();
        let navigator = Arc::new(CountingNavigator::default());
        let client = client_with(base_url, store.clone(), navigator.clone());

        let input = PredictionRequest {
            age: 30,
            department: "General".into(),
            symptoms: "fever".into(),
            user_lat: None,
            user_lng: None,
        };
        let err = client.predict_opd(&input).await.unwrap_err();
        match err {
            ApiError::Remote { status, detail, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(detail, "prediction backend unavailable");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
        assert_eq!(store.get().unwrap().as_deref(), Some("good-token"));
        assert_eq!(navigator.redirects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn login_round_trip_parses_the_auth_response() {
        async fn login(Json(body): Json<Value>) -> Json<Value> {
            assert_eq!(body["email"], "amit@example.test");
            Json(json!({
                "message": "Login successful",
                "token": "aaa.bbb.ccc",
                "user": {"email": "amit@example.test", "name": "Amit", "role": "patient"}
            }))
        }
        let router = Router::new().route("/api/auth/login", post(login));
        let base_url = serve(router).await;

        let store = Arc::new(MemoryTokenStore::new());
        let client = client_with(base_url, store.clone(), Arc::default());

        let response = client
            .login(&LoginRequest {
                email: "amit@example.test".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.token, "aaa.bbb.ccc");
        // The transport does not save the token; that is the caller's move.
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn login_then_save_exposes_the_token_claims() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use crate::auth::{Role, SessionGuard};

        let exp = chrono::Utc::now().timestamp() + 3600;
        let claims = format!(
            r#"{{"email":"amit@example.test","name":"Amit","role":"patient","exp":{exp}}}"#
        );
        let token = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims.as_bytes())
        );

        let token_for_handler = token.clone();
        let login = move |Json(_): Json<Value>| async move {
            Json(json!({
                "message": "Login successful",
                "token": token_for_handler,
                "user": {"email": "amit@example.test", "name": "Amit", "role": "patient"}
            }))
        };
        let router = Router::new().route("/api/auth/login", post(login));
        let base_url = serve(router).await;

        let store = Arc::new(MemoryTokenStore::new());
        let client = client_with(base_url, store.clone(), Arc::default());

        let response = client
            .login(&LoginRequest {
                email: "amit@example.test".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        store.save(&response.token).unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some(token.as_str()));

        let guard = SessionGuard::new(store);
        let current = guard.current_claims().unwrap();
        assert_eq!(current.email, "amit@example.test");
        assert_eq!(current.role(), Role::Patient);
        assert!(guard.is_authenticated());
    }
}
