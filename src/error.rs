use logon_flow::AuthError;
use std::fmt;

/// Central error types for the identifier app
#[derive(Debug)]
pub enum AppError {
    /// Configuration file could not be parsed
    Config(toml::de::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Identity provider could not be reached or answered unexpectedly
    Auth(AuthError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Auth(e) => write!(f, "Identity provider error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl AppError {
    /// Short message for the log line written when startup falls back
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) => "The configuration file is invalid, using defaults.".to_string(),
            AppError::Filesystem(_) => {
                "The configuration file could not be read, using defaults.".to_string()
            }
            AppError::Auth(_) => "The identity provider is not reachable.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_conversion() {
        let err: AppError = AuthError::UnexpectedStatus(503).into();
        assert!(matches!(err, AppError::Auth(_)));
        assert_eq!(
            err.to_string(),
            "Identity provider error: Unexpected response status: 503"
        );
    }

    #[test]
    fn test_config_error_message() {
        let toml_err = crate::config::AppConfig::from_toml("remember_me = 3").unwrap_err();
        let err = AppError::from(toml_err);
        assert!(err.user_message().contains("configuration"));
    }
}
