use crate::error::app_error::AppError;
use crate::guard::LockoutNotifier;
use crate::models::account::Account;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Notifier double that records which accounts were reported locked.
#[derive(Default)]
pub struct RecordingNotifier {
    locked: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    pub async fn locked_accounts(&self) -> Vec<Uuid> {
        self.locked.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl LockoutNotifier for RecordingNotifier {
    async fn account_locked(&self, account: &Account, _lockout_minutes: i64) -> Result<(), AppError> {
        self.locked.lock().await.push(account.id);
        Ok(())
    }
}

/// Notifier double that always fails, for the swallow-and-log path.
pub struct FailingNotifier;

#[async_trait::async_trait]
impl LockoutNotifier for FailingNotifier {
    async fn account_locked(&self, _account: &Account, _lockout_minutes: i64) -> Result<(), AppError> {
        Err(AppError::email("SMTP connection refused"))
    }
}
