use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::auth::{
    dto::{CredentialsRequest, LoginResponse, PublicUser},
    errors::AuthError,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::CredentialStore,
    repo_types::StoreError,
};

/// Validated email/password pair. The email is trimmed and lower-cased;
/// the password is kept byte-for-byte.
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = AuthError;

    fn try_from(req: CredentialsRequest) -> Result<Self, Self::Error> {
        let email = req
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        let password = req.password.filter(|p| !p.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(AuthError::InvalidRequest),
        }
    }
}

/// Orchestrates registration and login over an injected credential store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    #[instrument(skip_all, fields(email = %creds.email()))]
    pub async fn register(&self, creds: Credentials) -> Result<PublicUser, AuthError> {
        let Credentials { email, password } = creds;

        // Argon2 is CPU-bound; keep it off the async workers.
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "hash task failed");
                AuthError::Internal(e.into())
            })?
            .map_err(|e| {
                error!(error = %e, "hash_password failed");
                AuthError::Internal(e)
            })?;

        let user = match self.store.create(&email, &hash).await {
            Ok(u) => u,
            Err(StoreError::DuplicateEmail) => {
                warn!("email already registered");
                return Err(AuthError::RegistrationFailed(StoreError::DuplicateEmail));
            }
            Err(e) => {
                error!(error = %e, "create user failed");
                return Err(AuthError::RegistrationFailed(e));
            }
        };

        info!(user_id = %user.id, "user registered");
        Ok(PublicUser {
            id: user.id,
            email: user.email,
        })
    }

    #[instrument(skip_all, fields(email = %creds.email()))]
    pub async fn login(&self, creds: Credentials) -> Result<LoginResponse, AuthError> {
        let Credentials { email, password } = creds;

        let user = match self.store.find_by_email(&email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!("login unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "find_by_email failed");
                return Err(AuthError::LookupFailed(e));
            }
        };

        let stored_hash = user.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| {
                error!(error = %e, "verify task failed");
                AuthError::Internal(e.into())
            })?;

        if !ok {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(user.id, &user.email).map_err(|e| {
            error!(error = %e, "jwt sign failed");
            AuthError::Internal(e)
        })?;

        info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse {
            id: user.id,
            email: user.email,
            token,
        })
    }
}
