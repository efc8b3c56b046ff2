use crate::auth::{
    jwt::JwtKeys,
    repo::{CredentialStore, PgCredentialStore},
    services::AuthService,
};
use crate::config::AppConfig;
use crate::db;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
}

impl AppState {
    /// Loads config, connects the pool and builds the signing key. Any
    /// failure here is fatal and happens before the listener binds.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let keys = JwtKeys::new(&config.jwt.secret)?;
        let pool = db::connect(&config.database).await?;

        let store = Arc::new(PgCredentialStore::new(pool)) as Arc<dyn CredentialStore>;
        Ok(Self::from_parts(config, AuthService::new(store, keys)))
    }

    pub fn from_parts(config: Arc<AppConfig>, auth: AuthService) -> Self {
        Self { config, auth }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn CredentialStore>) -> Self {
        use crate::config::{DatabaseConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                user: "postgres".into(),
                password: "postgres".into(),
                name: "postgres".into(),
                max_connections: 1,
                acquire_timeout_secs: 1,
            },
            jwt: JwtConfig {
                secret: "test".into(),
            },
            host: "127.0.0.1".into(),
            port: 0,
        });
        let keys = JwtKeys::new(&config.jwt.secret).expect("test secret is non-empty");
        Self::from_parts(config, AuthService::new(store, keys))
    }
}
