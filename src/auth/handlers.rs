use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, LoginResponse, RegisterResponse},
        errors::AuthError,
        services::Credentials,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Credentials, AuthError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "rejected request body");
        AuthError::InvalidRequest
    })?;
    Credentials::try_from(body).inspect_err(|_| warn!("missing email or password"))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let creds = credentials(payload)?;
    let user = state.auth.register(creds).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered".into(),
            id: user.id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let creds = credentials(payload)?;
    let session = state.auth.login(creds).await?;
    Ok(Json(session))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app::build_app,
        auth::repo::{
            testing::{DownStore, MemoryStore},
            CredentialStore,
        },
        state::AppState,
    };

    async fn post_json(app: &axum::Router, path: &str, body: String) -> (StatusCode, Value) {
        let res = app
            .clone()
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn app_with(store: Arc<dyn CredentialStore>) -> axum::Router {
        build_app(AppState::fake(store))
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let app = app_with(Arc::new(MemoryStore::default()));
        let body = json!({"email": "a@x.com", "password": "secret123"}).to_string();

        let (status, registered) = post_json(&app, "/register", body.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(registered["message"].is_string());

        let (status, session) = post_json(&app, "/login", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["id"], registered["id"]);
        assert_eq!(session["email"], "a@x.com");
        assert!(!session["token"].as_str().unwrap_or_default().is_empty());
        assert!(session.get("password").is_none());
        assert!(session.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn invalid_credentials_look_the_same() {
        let app = app_with(Arc::new(MemoryStore::default()));
        let body = json!({"email": "a@x.com", "password": "secret123"}).to_string();
        post_json(&app, "/register", body).await;

        let wrong = json!({"email": "a@x.com", "password": "bad"}).to_string();
        let unknown = json!({"email": "nobody@x.com", "password": "secret123"}).to_string();
        let (s1, b1) = post_json(&app, "/login", wrong).await;
        let (s2, b2) = post_json(&app, "/login", unknown).await;
        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s2, StatusCode::UNAUTHORIZED);
        assert_eq!(b1, b2);
        assert!(!b1.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn missing_fields_are_bad_requests_without_store_access() {
        let store = Arc::new(MemoryStore::default());
        let app = app_with(store.clone());
        for path in ["/register", "/login"] {
            for body in [
                json!({"email": "a@x.com"}).to_string(),
                json!({"password": "secret123"}).to_string(),
                json!({"email": "", "password": "secret123"}).to_string(),
                json!({"email": 5, "password": "secret123"}).to_string(),
                "not json".to_string(),
            ] {
                let (status, value) = post_json(&app, path, body).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
                assert!(value["error"].is_string());
            }
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_register_is_a_server_error() {
        let store = Arc::new(MemoryStore::default());
        let app = app_with(store.clone());
        let body = json!({"email": "a@x.com", "password": "secret123"}).to_string();
        let (first, _) = post_json(&app, "/register", body.clone()).await;
        let (second, value) = post_json(&app, "/register", body).await;
        assert_eq!(first, StatusCode::CREATED);
        assert_eq!(second, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], "registration failed");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn store_outage_on_login_is_a_server_error() {
        let app = app_with(Arc::new(DownStore));
        let body = json!({"email": "a@x.com", "password": "secret123"}).to_string();
        let (status, value) = post_json(&app, "/login", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], "user lookup failed");
    }
}
