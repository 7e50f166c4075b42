use crate::error::app_error::AppError;
use crate::models::account::Account;
use crate::storage::account::AccountRepository;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Account store backed by a mutex-guarded map.
///
/// Holds whole snapshots keyed by account id. Suitable for tests and the
/// demo binary; a real deployment plugs a database-backed repository into
/// the same trait.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an account, returning its id.
    pub async fn insert(&self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.lock().await.insert(id, account);
        id
    }
}

#[async_trait::async_trait]
impl AccountRepository for InMemoryRepository {
    async fn save(&self, account: &Account) -> Result<(), AppError> {
        self.accounts.lock().await.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.lock().await.get(id).cloned())
    }
}
