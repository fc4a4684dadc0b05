//! Service configuration types.

use thiserror::Error;

/// Default number of digits in a generated verification code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Rejected verification settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationConfigError {
    /// Generated codes must have at least one digit.
    #[error("code length must be at least 1")]
    InvalidCodeLength,
}

/// Configuration for the verification service.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    code_length: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl VerificationConfig {
    /// Create a new builder for VerificationConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phone_notifiers::VerificationConfig;
    ///
    /// let config = VerificationConfig::builder().code_length(4).build().unwrap();
    /// assert_eq!(config.code_length(), 4);
    ///
    /// assert!(VerificationConfig::builder().code_length(0).build().is_err());
    /// ```
    pub fn builder() -> VerificationConfigBuilder {
        VerificationConfigBuilder::default()
    }

    /// Number of digits in generated verification codes.
    pub fn code_length(&self) -> usize {
        self.code_length
    }
}

/// Builder for VerificationConfig.
#[derive(Debug, Clone)]
pub struct VerificationConfigBuilder {
    code_length: usize,
}

impl Default for VerificationConfigBuilder {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl VerificationConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of digits in generated codes.
    ///
    /// Default: 6
    pub fn code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    /// Build the VerificationConfig.
    pub fn build(self) -> Result<VerificationConfig, VerificationConfigError> {
        if self.code_length == 0 {
            return Err(VerificationConfigError::InvalidCodeLength);
        }
        Ok(VerificationConfig {
            code_length: self.code_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        assert_eq!(VerificationConfig::default().code_length(), 6);
        assert_eq!(VerificationConfigBuilder::new().build().unwrap().code_length(), 6);
    }

    #[test]
    fn test_builder_sets_code_length() {
        let config = VerificationConfig::builder().code_length(8).build().unwrap();
        assert_eq!(config.code_length(), 8);
    }

    #[test]
    fn test_builder_rejects_zero_length() {
        assert_eq!(
            VerificationConfig::builder().code_length(0).build().unwrap_err(),
            VerificationConfigError::InvalidCodeLength
        );
    }
}
