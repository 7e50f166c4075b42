use chrono::Duration;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub guard: GuardConfig,
    pub email: EmailConfig,
    pub logging: LoggingConfig,
}

/// Thresholds and windows for the account guard.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GuardConfig {
    /// Failed attempts at or past which the account locks.
    pub login_attempts: u32,
    pub lockout_duration_seconds: u64,
    pub otp_expiration_seconds: u64,
    pub otp_length: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    pub from_name: String,
    pub site_name: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl GuardConfig {
    pub fn lockout_duration(&self) -> Duration {
        Duration::seconds(self.lockout_duration_seconds as i64)
    }

    pub fn otp_expiration(&self) -> Duration {
        Duration::seconds(self.otp_expiration_seconds as i64)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_attempts: 3,
            lockout_duration_seconds: 60,
            otp_expiration_seconds: 60,
            otp_length: 6,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@nextgenbank.test".to_string(),
            from_name: "NextGen Bank".to_string(),
            site_name: "NextGen Bank".to_string(),
            enabled: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guard: GuardConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Guard.toml (base configuration file)
    /// 2. Environment variables (prefixed with GUARD_)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            // Start with defaults
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            // Layer on Guard.toml if it exists
            .merge(Toml::file("Guard.toml").nested())
            // Layer on environment variables (e.g., GUARD_GUARD_LOGIN_ATTEMPTS)
            .merge(Env::prefixed("GUARD_").split("_"));

        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = GuardConfig::default();
        assert_eq!(config.login_attempts, 3);
        assert_eq!(config.lockout_duration(), Duration::seconds(60));
        assert_eq!(config.otp_expiration(), Duration::seconds(60));
        assert_eq!(config.otp_length, 6);
    }

    #[test]
    fn email_disabled_by_default() {
        assert!(!EmailConfig::default().enabled);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let serialized = toml::to_string(&Config::default()).expect("serialize defaults");
        let parsed: Config = toml::from_str(&serialized).expect("parse defaults");
        assert_eq!(parsed.guard.login_attempts, 3);
        assert_eq!(parsed.logging.level, "info");
    }
}
