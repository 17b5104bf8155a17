use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::{
    jwt::JwtKeys,
    password::{Argon2Hasher, Hasher},
    repo::{CredentialStore, PgCredentialStore},
    services::AuthService,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn from_parts(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn Hasher>,
        jwt: JwtKeys,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(store, hasher)),
            jwt,
        }
    }

    /// Production wiring: Postgres store, Argon2 hasher.
    pub fn with_pool(db: PgPool, config: &AppConfig) -> Self {
        Self::from_parts(
            Arc::new(PgCredentialStore::new(db)),
            Arc::new(Argon2Hasher::new()),
            JwtKeys::from_config(&config.jwt),
        )
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::{auth::memory::InMemoryCredentialStore, config::JwtConfig};

        Self::from_parts(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(Argon2Hasher::new()),
            JwtKeys::from_config(&JwtConfig {
                secret: Some("test".into()),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
            }),
        )
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
