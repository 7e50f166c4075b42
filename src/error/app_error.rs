use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {message}")]
    Storage { message: String },
    #[error("Account not found")]
    AccountNotFound,
    #[error("Email error: {message}")]
    Email { message: String },
    #[error("Internal server error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage { message: message.into() }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email { message: message.into() }
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_carries_message() {
        let err = AppError::storage("write failed");
        assert_eq!(err.to_string(), "Storage error: write failed");
    }

    #[test]
    fn configuration_error_hides_detail_in_display() {
        let source = figment::Error::from("missing field".to_string());
        let err = AppError::from(source);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
