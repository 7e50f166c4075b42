use bank_guard::guard::AccountGuard;
use bank_guard::models::account::Account;
use bank_guard::service::auth::{AuthService, LoginOutcome};
use bank_guard::service::email::EmailService;
use bank_guard::storage::memory::InMemoryRepository;
use bank_guard::{Config, init_tracing};
use std::sync::Arc;
use tracing::info;

/// Smoke runner: drives one OTP login and one lockout cycle against the
/// in-memory store, so the guard can be exercised without a backing service.
#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    let repository = Arc::new(InMemoryRepository::new());
    let email = Arc::new(EmailService::new(config.email.clone()));
    let guard = Arc::new(AccountGuard::new(repository.clone(), email.clone(), config.guard.clone()));
    let auth = AuthService::new(guard.clone(), email);

    let account = Account::new("jane@nextgenbank.test", "Jane", "Doe");
    repository.insert(account.clone()).await;

    // OTP login happy path.
    let (account, outcome) = auth.begin_otp_login(account).await.expect("begin otp login");
    info!(?outcome, otp = %account.otp, "challenge issued");
    let otp = account.otp.clone();
    let (account, outcome) = auth.complete_otp_login(account, &otp).await.expect("complete otp login");
    info!(?outcome, status = ?account.account_status, "otp login finished");
    assert_eq!(outcome, LoginOutcome::Success);

    // Lockout cycle: wrong codes until the account locks.
    let (mut account, _) = auth.begin_otp_login(account).await.expect("begin second login");
    loop {
        let (next, outcome) = auth.complete_otp_login(account, "000000").await.expect("complete with wrong otp");
        account = next;
        info!(?outcome, attempts = account.failed_login_attempts, status = ?account.account_status, "failed attempt recorded");
        if outcome == LoginOutcome::LockedOut {
            break;
        }
    }

    let (account, locked_out) = guard.is_locked_out(account).await.expect("lockout query");
    info!(locked_out, status = ?account.account_status, "final state");
}
