//! Result and error types for Vitrina.

use thiserror::Error;

/// Result type for Vitrina operations
pub type VitrinaResult<T> = Result<T, VitrinaError>;

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// No element matched the locator before the wait budget ran out
    #[error("Element not found: {locator} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Rendered locator
        locator: String,
        /// Wait budget in milliseconds
        timeout_ms: u64,
    },

    /// A non-element wait condition never became true
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of the condition
        waited_for: String,
        /// Wait budget in milliseconds
        ms: u64,
    },

    /// Verification helper observed an unexpected value
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Browser session could not be started
    #[error("Failed to start browser session: {message}")]
    SessionSetup {
        /// Error message
        message: String,
    },

    /// The requested browser has no compiled-in backend
    #[error("No backend for {browser}; rebuild with the `{feature}` feature")]
    BrowserNotAvailable {
        /// Requested browser
        browser: String,
        /// Cargo feature that provides it
        feature: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A browser command failed
    #[error("Driver command failed: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Element exists but cannot receive the interaction
    #[error("Element not interactable: {locator}")]
    NotInteractable {
        /// Rendered locator
        locator: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Coarse classification used by the harness when reporting outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Element lookup or wait timed out
    Lookup,
    /// Observed value mismatched an expectation
    Assertion,
    /// Session could not be created
    Setup,
    /// Anything else (driver, I/O, serialization)
    Other,
}

impl VitrinaError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a driver command failure
    #[must_use]
    pub fn driver(message: impl ToString) -> Self {
        Self::Driver {
            message: message.to_string(),
        }
    }

    /// Create a session setup failure
    #[must_use]
    pub fn setup(message: impl ToString) -> Self {
        Self::SessionSetup {
            message: message.to_string(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify this error
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ElementNotFound { .. } | Self::Timeout { .. } => ErrorCategory::Lookup,
            Self::AssertionFailed { .. } => ErrorCategory::Assertion,
            Self::SessionSetup { .. } | Self::BrowserNotAvailable { .. } => ErrorCategory::Setup,
            _ => ErrorCategory::Other,
        }
    }

    /// True when the error means "nothing matched in time"
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

/// Fail with [`VitrinaError::AssertionFailed`] unless the condition holds.
///
/// ```ignore
/// ensure!(count > 0, "expected at least one card, found {count}");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::VitrinaError::assertion(format!($($arg)+)));
        }
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod display_tests {
        use super::*;

        #[test]
        fn test_not_found_embeds_locator() {
            let err = VitrinaError::ElementNotFound {
                locator: "testid=hero-title".to_string(),
                timeout_ms: 15_000,
            };
            let text = err.to_string();
            assert!(text.contains("Element not found"));
            assert!(text.contains("testid=hero-title"));
            assert!(text.contains("15000ms"));
        }

        #[test]
        fn test_browser_not_available_names_feature() {
            let err = VitrinaError::BrowserNotAvailable {
                browser: "firefox".to_string(),
                feature: "webdriver".to_string(),
            };
            assert!(err.to_string().contains("`webdriver`"));
        }

        #[test]
        fn test_io_error_from() {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
            let err: VitrinaError = io_err.into();
            assert!(err.to_string().contains("I/O"));
        }
    }

    mod category_tests {
        use super::*;

        #[test]
        fn test_lookup_category() {
            let err = VitrinaError::Timeout {
                waited_for: "url containing /resume".to_string(),
                ms: 10,
            };
            assert_eq!(err.category(), ErrorCategory::Lookup);
            assert!(!err.is_not_found());
        }

        #[test]
        fn test_setup_category() {
            assert_eq!(
                VitrinaError::setup("no chromium").category(),
                ErrorCategory::Setup
            );
        }

        #[test]
        fn test_assertion_category() {
            assert_eq!(
                VitrinaError::assertion("mismatch").category(),
                ErrorCategory::Assertion
            );
        }

        #[test]
        fn test_other_category() {
            assert_eq!(
                VitrinaError::driver("socket closed").category(),
                ErrorCategory::Other
            );
        }
    }

    mod ensure_tests {
        use super::*;

        fn check(n: usize) -> VitrinaResult<()> {
            ensure!(n > 0, "expected positive, got {n}");
            Ok(())
        }

        #[test]
        fn test_ensure_passes() {
            assert!(check(3).is_ok());
        }

        #[test]
        fn test_ensure_fails_with_message() {
            let err = check(0).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Assertion);
            assert!(err.to_string().contains("expected positive, got 0"));
        }
    }
}
