//! In-process account store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Account, AccountStore};
use crate::error::AccountError;

/// Keeps accounts in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(AccountError::UsernameTaken(account.username));
        }
        accounts.insert(account.username.clone(), account);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }
}
