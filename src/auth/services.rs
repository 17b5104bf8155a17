use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    password::Hasher,
    repo::{CredentialStore, StoreError},
    repo_types::User,
    validation::{validate_login, validate_signup},
};

/// Well-formed Argon2id hash that matches no password. Compared against on a
/// lookup miss so unknown emails cost the same as wrong passwords.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Account lifecycle: signup, login, lookup.
///
/// Every call is one check-then-act sequence against the store. Email
/// uniqueness ultimately rests on the store, so a duplicate reported by
/// `create` is treated exactly like a failed `exists` pre-check.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn Hasher>,
}

fn store_error(e: StoreError) -> AuthError {
    match e {
        StoreError::DuplicateEmail => AuthError::EmailTaken,
        StoreError::NotFound => AuthError::NotFound,
        StoreError::Database(e) => {
            error!(error = %e, "credential store failure");
            AuthError::StoreUnavailable
        }
    }
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn Hasher>) -> Self {
        Self { store, hasher }
    }

    /// Register a new account. Does not log the user in.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let input = validate_signup(name, email, password).map_err(|errors| {
            warn!(?errors, "signup rejected by validation");
            AuthError::Validation(errors)
        })?;

        if self.store.exists(&input.email).await.map_err(store_error)? {
            warn!(email = %input.email, "email already registered");
            return Err(AuthError::EmailTaken);
        }

        let hash = self.hash(input.password).await?;

        let user = match self.store.create(&input.name, &input.email, &hash).await {
            Ok(u) => u,
            Err(StoreError::DuplicateEmail) => {
                warn!(email = %input.email, "email registered concurrently");
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(store_error(e)),
        };

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Verify credentials and record the login.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let input = validate_login(email, password).map_err(|errors| {
            warn!(?errors, "login rejected by validation");
            AuthError::Validation(errors)
        })?;

        let record = self
            .store
            .find_by_email(&input.email)
            .await
            .map_err(store_error)?;

        let Some(record) = record else {
            let _ = self.compare(input.password, DUMMY_HASH.to_string()).await;
            warn!(email = %input.email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        match self
            .compare(input.password, record.password_hash.clone())
            .await?
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = %record.id, "login invalid password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(user_id = %record.id, error = %e, "stored password hash is unreadable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        self.store.touch_login(record.id).await.map_err(store_error)?;

        let user = self
            .store
            .get_by_id(record.id)
            .await
            .map_err(store_error)?
            .ok_or(AuthError::NotFound)?;

        info!(user_id = %user.id, "user logged in");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        self.store.get_by_id(id).await.map_err(store_error)
    }

    async fn hash(&self, password: String) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Outer error: the blocking task died. Inner: the hash could not be parsed.
    async fn compare(
        &self,
        password: String,
        hash: String,
    ) -> Result<anyhow::Result<bool>, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.compare(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
