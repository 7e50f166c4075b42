use crate::error::app_error::AppError;
use crate::models::account::Account;
use uuid::Uuid;

/// Persistence seam for account snapshots.
///
/// `save` is expected to be a plain read-modify-write against one record;
/// store-level failures propagate to the caller untouched.
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    async fn save(&self, account: &Account) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Account>, AppError>;
}
