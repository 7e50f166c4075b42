mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod service;
pub mod storage;
pub mod util;

#[cfg(test)]
pub mod test_utils;

pub use config::{Config, EmailConfig, GuardConfig, LoggingConfig};

use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG can be used for fine-grained control per module:
    //   RUST_LOG=debug                         - Set all to debug
    //   RUST_LOG=bank_guard=debug              - Set this crate to debug
    //   RUST_LOG=info,bank_guard::guard=trace  - Global info, guard at trace
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
