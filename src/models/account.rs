use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse login-gating state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Locked,
}

/// Snapshot of the authentication-relevant fields of a bank account.
///
/// The guard never mutates an `Account` in place; transitions consume a
/// snapshot and return the next one together with the side effects to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_status: AccountStatus,
    pub failed_login_attempts: u32,
    pub last_failed_login: Option<DateTime<Utc>>,
    /// Pending one-time passcode; empty when unset.
    pub otp: String,
    /// Meaningful only while `otp` is set.
    pub otp_expiry_time: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            account_status: AccountStatus::Active,
            failed_login_attempts: 0,
            last_failed_login: None,
            otp: String::new(),
            otp_expiry_time: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_locked(&self) -> bool {
        self.account_status == AccountStatus::Locked
    }

    pub fn has_pending_otp(&self) -> bool {
        !self.otp.is_empty()
    }

    /// Whether a stored OTP is still usable at `now`.
    ///
    /// Valid strictly before the expiry instant; an unset OTP is never valid.
    pub fn otp_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.otp_expiry_time {
            Some(expiry) => self.has_pending_otp() && now < expiry,
            None => false,
        }
    }

    /// Pure lockout-window predicate: true once the configured duration has
    /// fully elapsed since the last recorded failure. Does not touch state;
    /// callers that want the lazy unlock applied go through the guard.
    pub fn lockout_expired(&self, now: DateTime<Utc>, lockout_duration: Duration) -> bool {
        match self.last_failed_login {
            Some(last) => now - last > lockout_duration,
            // A locked account always carries a failure timestamp; a snapshot
            // without one has nothing left to wait out.
            None => true,
        }
    }
}
