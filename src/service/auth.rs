use crate::error::app_error::AppError;
use crate::guard::AccountGuard;
use crate::models::account::Account;
use crate::service::email::EmailService;
use std::sync::Arc;
use tracing::warn;

/// What happened during a step of the OTP login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// An OTP was issued and emailed; the caller should prompt for it.
    ChallengeIssued,
    /// The OTP matched; failure counters were reset.
    Success,
    /// The OTP was wrong or expired; a failed attempt was recorded.
    InvalidOtp,
    /// The account is locked out; no verification was attempted.
    LockedOut,
}

/// OTP login flow built on top of the guard.
///
/// Owns the ordering the guard itself does not enforce: lockout is checked
/// before any verification, failures are recorded on mismatch, and counters
/// reset on success.
pub struct AuthService {
    guard: Arc<AccountGuard>,
    email: Arc<EmailService>,
}

impl AuthService {
    pub fn new(guard: Arc<AccountGuard>, email: Arc<EmailService>) -> Self {
        Self { guard, email }
    }

    /// Start an OTP login: refuse when locked out, otherwise issue a fresh
    /// code and email it. Email failure is logged and swallowed; the stored
    /// OTP stays valid so support can resend.
    pub async fn begin_otp_login(&self, account: Account) -> Result<(Account, LoginOutcome), AppError> {
        let (account, locked_out) = self.guard.is_locked_out(account).await?;
        if locked_out {
            return Ok((account, LoginOutcome::LockedOut));
        }

        let otp = self.guard.generate_otp();
        let account = self.guard.set_otp(account, &otp).await?;

        let expiry_minutes = self.guard.config().otp_expiration().num_minutes();
        if let Err(err) = self.email.send_otp_email(&account.email, &otp, expiry_minutes).await {
            warn!(account_id = %account.id, error = %err, "failed to send OTP email");
        }

        Ok((account, LoginOutcome::ChallengeIssued))
    }

    /// Finish an OTP login with the code the user typed in.
    pub async fn complete_otp_login(&self, account: Account, candidate: &str) -> Result<(Account, LoginOutcome), AppError> {
        let (account, locked_out) = self.guard.is_locked_out(account).await?;
        if locked_out {
            return Ok((account, LoginOutcome::LockedOut));
        }

        let (account, ok) = self.guard.verify_otp(account, candidate).await?;
        if ok {
            let account = self.guard.reset_failed_login_attempts(account).await?;
            Ok((account, LoginOutcome::Success))
        } else {
            let account = self.guard.handle_failed_login_attempt(account).await?;
            Ok((account, LoginOutcome::InvalidOtp))
        }
    }
}
