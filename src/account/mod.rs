//! Accounts: registration, login and bearer-token verification.
//!
//! The persistence side is the [`AccountStore`] trait; [`AccountService`]
//! layers credential digests and token issuance on top of any store.
//!
//! ```text
//! POST /auth/register ──► AccountService::register ──► AccountStore::insert
//! POST /auth/login    ──► AccountService::login    ──► AccountStore::find
//! GET  /auth/me       ──► AccountService::authenticate (token only)
//! ```

mod memory;
mod token;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::error::AccountError;

pub use memory::InMemoryAccountStore;
pub use token::TokenSigner;

/// Default bearer token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 64;

/// A registered account as kept by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,

    /// Keyed digest of the credentials; never the plain password
    pub credential: Vec<u8>,
}

/// Persistence backend for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account; fails with `UsernameTaken` if it already exists.
    async fn insert(&self, account: Account) -> Result<(), AccountError>;

    /// Look up an account by username.
    async fn find(&self, username: &str) -> Result<Option<Account>, AccountError>;
}

/// Token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

/// Registration, login and token checks over an [`AccountStore`].
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    signer: TokenSigner,
    token_ttl: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, secret: impl AsRef<[u8]>) -> Self {
        Self {
            store,
            signer: TokenSigner::new(secret),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Service backed by a fresh in-memory store.
    pub fn in_memory(secret: impl AsRef<[u8]>) -> Self {
        Self::new(Arc::new(InMemoryAccountStore::new()), secret)
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Register a new account.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AccountError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(AccountError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        let account = Account {
            username: username.to_string(),
            credential: self.credential(username, password),
        };
        self.store.insert(account).await?;

        info!(username = username, "Registered account");
        Ok(())
    }

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AccountError> {
        let account = self
            .store
            .find(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let presented = self.credential(username, password);
        if !bool::from(presented.ct_eq(&account.credential)) {
            debug!(username = username, "Login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        let (token, expires_at) = self.signer.issue(username, self.token_ttl);
        debug!(username = username, expires_at, "Issued token");

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a bearer token and return the username it belongs to.
    pub fn authenticate(&self, token: &str) -> Result<String, AccountError> {
        self.signer.verify(token)
    }

    fn credential(&self, username: &str, password: &str) -> Vec<u8> {
        self.signer.digest(&format!("credential:{}:{}", username, password))
    }
}

fn validate_username(username: &str) -> Result<(), AccountError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(AccountError::InvalidInput(format!(
            "username must be 1-{} characters",
            MAX_USERNAME_LEN
        )));
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AccountError::InvalidInput(
            "username must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}
