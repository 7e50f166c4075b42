use crate::config::GuardConfig;
use crate::models::account::{Account, AccountStatus};
use chrono::{DateTime, Utc};

/// Side effect requested by a transition, applied by the guard facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Write the next snapshot back to the account store.
    Persist,
    /// Tell the account holder their account was locked.
    NotifyAccountLocked,
}

/// Next account snapshot plus the side effects it requires.
///
/// Transitions are pure: same snapshot, same inputs, same `now` always yield
/// the same result. All clock reads and I/O stay with the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: Account,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(account: Account) -> Self {
        Self {
            next: account,
            effects: Vec::new(),
        }
    }

    fn persisted(next: Account) -> Self {
        Self {
            next,
            effects: vec![Effect::Persist],
        }
    }

    pub fn needs_persist(&self) -> bool {
        self.effects.contains(&Effect::Persist)
    }
}

/// Store a fresh OTP on the account, stamping its expiry from `now`.
/// Overwrites any previously pending OTP.
pub fn set_otp(account: Account, otp: &str, now: DateTime<Utc>, config: &GuardConfig) -> Transition {
    let mut next = account;
    next.otp = otp.to_string();
    next.otp_expiry_time = Some(now + config.otp_expiration());
    Transition::persisted(next)
}

/// Check a candidate OTP against the stored one.
///
/// A match strictly before expiry clears the stored OTP (single use) and
/// accepts. Mismatch or expiry leaves the snapshot untouched so the caller
/// may retry until the expiry instant passes.
pub fn verify_otp(account: Account, candidate: &str, now: DateTime<Utc>) -> (Transition, bool) {
    if account.otp == candidate && account.otp_valid_at(now) {
        let mut next = account;
        next.otp = String::new();
        next.otp_expiry_time = None;
        (Transition::persisted(next), true)
    } else {
        (Transition::unchanged(account), false)
    }
}

/// Record a failed login attempt, locking the account once the configured
/// threshold is reached or exceeded.
pub fn record_failed_attempt(account: Account, now: DateTime<Utc>, config: &GuardConfig) -> Transition {
    let mut next = account;
    next.failed_login_attempts += 1;
    next.last_failed_login = Some(now);

    if next.failed_login_attempts >= config.login_attempts {
        next.account_status = AccountStatus::Locked;
        Transition {
            next,
            effects: vec![Effect::Persist, Effect::NotifyAccountLocked],
        }
    } else {
        Transition::persisted(next)
    }
}

/// Clear all failure-related state after a successful authentication.
pub fn reset_failed_attempts(account: Account) -> Transition {
    Transition::persisted(cleared(account))
}

/// Explicitly unlock a locked account. No-op when already active.
pub fn unlock(account: Account) -> Transition {
    if account.is_locked() {
        Transition::persisted(cleared(account))
    } else {
        Transition::unchanged(account)
    }
}

/// Lockout status query with the lazy unlock applied.
///
/// Returns whether the account is still locked out at `now`. When the
/// lockout window has fully elapsed the returned transition carries the
/// unlock, so the read performs a write once per expiry.
pub fn check_lockout(account: Account, now: DateTime<Utc>, config: &GuardConfig) -> (Transition, bool) {
    if !account.is_locked() {
        return (Transition::unchanged(account), false);
    }

    if account.lockout_expired(now, config.lockout_duration()) {
        (unlock(account), false)
    } else {
        (Transition::unchanged(account), true)
    }
}

fn cleared(mut account: Account) -> Account {
    account.failed_login_attempts = 0;
    account.last_failed_login = None;
    account.account_status = AccountStatus::Active;
    account
}
