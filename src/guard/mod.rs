pub mod transition;

use crate::config::GuardConfig;
use crate::error::app_error::AppError;
use crate::models::account::Account;
use crate::storage::account::AccountRepository;
use crate::util::generate_otp;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use transition::{Effect, Transition};

/// Notification seam for the lock transition. Implemented by the SMTP email
/// service; tests substitute a recording double.
#[async_trait::async_trait]
pub trait LockoutNotifier: Send + Sync {
    async fn account_locked(&self, account: &Account, lockout_minutes: i64) -> Result<(), AppError>;
}

/// Per-account authentication guard.
///
/// Wraps the pure transitions with the two collaborators they cannot carry:
/// the account store and the lockout notifier. Store errors propagate;
/// notification failures are logged and swallowed, never retried.
pub struct AccountGuard {
    repository: Arc<dyn AccountRepository>,
    notifier: Arc<dyn LockoutNotifier>,
    config: GuardConfig,
}

impl AccountGuard {
    pub fn new(repository: Arc<dyn AccountRepository>, notifier: Arc<dyn LockoutNotifier>, config: GuardConfig) -> Self {
        Self {
            repository,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Fresh OTP of the configured length.
    pub fn generate_otp(&self) -> String {
        generate_otp(self.config.otp_length)
    }

    /// Store `otp` on the account with an expiry stamped from now,
    /// overwriting any pending code.
    pub async fn set_otp(&self, account: Account, otp: &str) -> Result<Account, AppError> {
        let transition = transition::set_otp(account, otp, Utc::now(), &self.config);
        self.apply(transition).await
    }

    /// Check a candidate OTP; a valid match consumes the stored code.
    pub async fn verify_otp(&self, account: Account, candidate: &str) -> Result<(Account, bool), AppError> {
        let (transition, ok) = transition::verify_otp(account, candidate, Utc::now());
        let account = self.apply(transition).await?;
        Ok((account, ok))
    }

    /// Record one failed login attempt, locking at the configured threshold.
    pub async fn handle_failed_login_attempt(&self, account: Account) -> Result<Account, AppError> {
        let transition = transition::record_failed_attempt(account, Utc::now(), &self.config);
        self.apply(transition).await
    }

    /// Clear failure state after a successful authentication.
    pub async fn reset_failed_login_attempts(&self, account: Account) -> Result<Account, AppError> {
        self.apply(transition::reset_failed_attempts(account)).await
    }

    /// Explicitly unlock the account; no-op when already active.
    pub async fn unlock_account(&self, account: Account) -> Result<Account, AppError> {
        self.apply(transition::unlock(account)).await
    }

    /// Whether the account is currently locked out.
    ///
    /// Applies the lazy unlock once the lockout window has elapsed, which
    /// persists the unlocked snapshot before returning false. Callers that
    /// must not write use `Account::lockout_expired` directly.
    pub async fn is_locked_out(&self, account: Account) -> Result<(Account, bool), AppError> {
        let (transition, locked_out) = transition::check_lockout(account, Utc::now(), &self.config);
        let account = self.apply(transition).await?;
        Ok((account, locked_out))
    }

    async fn apply(&self, transition: Transition) -> Result<Account, AppError> {
        let Transition { next, effects } = transition;

        for effect in effects {
            match effect {
                Effect::Persist => self.repository.save(&next).await?,
                Effect::NotifyAccountLocked => {
                    let lockout_minutes = self.config.lockout_duration().num_minutes();
                    match self.notifier.account_locked(&next, lockout_minutes).await {
                        Ok(()) => {
                            info!(account_id = %next.id, "account locked notification sent");
                        }
                        Err(err) => {
                            // Notification failure must not block the lock.
                            warn!(account_id = %next.id, error = %err, "failed to send account locked notification");
                        }
                    }
                }
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::AccountStatus;
    use crate::storage::memory::InMemoryRepository;
    use crate::test_utils::{FailingNotifier, RecordingNotifier};

    fn guard_with(repository: Arc<InMemoryRepository>, notifier: Arc<RecordingNotifier>, config: GuardConfig) -> AccountGuard {
        AccountGuard::new(repository, notifier, config)
    }

    fn account() -> Account {
        Account::new("jane@nextgenbank.test", "Jane", "Doe")
    }

    #[tokio::test]
    async fn lock_after_threshold_persists_and_notifies() {
        let repository = Arc::new(InMemoryRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let guard = guard_with(repository.clone(), notifier.clone(), GuardConfig::default());

        let mut snapshot = account();
        let id = repository.insert(snapshot.clone()).await;

        for _ in 0..3 {
            snapshot = guard.handle_failed_login_attempt(snapshot).await.expect("record failure");
        }

        assert_eq!(snapshot.account_status, AccountStatus::Locked);
        assert_eq!(notifier.locked_accounts().await, vec![id]);

        let stored = repository.find_by_id(&id).await.expect("lookup").expect("present");
        assert_eq!(stored.failed_login_attempts, 3);
        assert!(stored.is_locked());
    }

    #[tokio::test]
    async fn notifier_failure_does_not_block_the_lock() {
        let repository = Arc::new(InMemoryRepository::new());
        let guard = AccountGuard::new(repository.clone(), Arc::new(FailingNotifier), GuardConfig::default());

        let mut snapshot = account();
        let id = repository.insert(snapshot.clone()).await;

        for _ in 0..3 {
            snapshot = guard.handle_failed_login_attempt(snapshot).await.expect("record failure");
        }

        let stored = repository.find_by_id(&id).await.expect("lookup").expect("present");
        assert!(stored.is_locked());
    }

    #[tokio::test]
    async fn lazy_unlock_persists_the_active_snapshot() {
        let repository = Arc::new(InMemoryRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let config = GuardConfig {
            lockout_duration_seconds: 0,
            ..GuardConfig::default()
        };
        let guard = guard_with(repository.clone(), notifier, config);

        let mut snapshot = account();
        let id = repository.insert(snapshot.clone()).await;
        for _ in 0..3 {
            snapshot = guard.handle_failed_login_attempt(snapshot).await.expect("record failure");
        }
        assert!(snapshot.is_locked());

        // A zero-length window expires as soon as the clock moves.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let (snapshot, locked_out) = guard.is_locked_out(snapshot).await.expect("query");
        assert!(!locked_out);
        assert_eq!(snapshot.account_status, AccountStatus::Active);
        assert_eq!(snapshot.failed_login_attempts, 0);

        let stored = repository.find_by_id(&id).await.expect("lookup").expect("present");
        assert_eq!(stored.account_status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn is_locked_out_true_inside_the_window() {
        let repository = Arc::new(InMemoryRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let guard = guard_with(repository.clone(), notifier, GuardConfig::default());

        let mut snapshot = account();
        repository.insert(snapshot.clone()).await;
        for _ in 0..3 {
            snapshot = guard.handle_failed_login_attempt(snapshot).await.expect("record failure");
        }

        let (snapshot, locked_out) = guard.is_locked_out(snapshot).await.expect("query");
        assert!(locked_out);
        assert!(snapshot.is_locked());
    }

    #[tokio::test]
    async fn otp_round_trip_is_single_use() {
        let repository = Arc::new(InMemoryRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let guard = guard_with(repository.clone(), notifier, GuardConfig::default());

        let snapshot = account();
        let id = repository.insert(snapshot.clone()).await;

        let otp = guard.generate_otp();
        assert_eq!(otp.len(), 6);

        let snapshot = guard.set_otp(snapshot, &otp).await.expect("set otp");
        assert!(snapshot.has_pending_otp());

        let (snapshot, ok) = guard.verify_otp(snapshot, &otp).await.expect("verify");
        assert!(ok);
        assert!(!snapshot.has_pending_otp());

        let (_, ok) = guard.verify_otp(snapshot, &otp).await.expect("verify again");
        assert!(!ok);

        let stored = repository.find_by_id(&id).await.expect("lookup").expect("present");
        assert!(!stored.has_pending_otp());
    }
}
