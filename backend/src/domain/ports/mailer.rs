//! Port for one-time-code delivery.

use async_trait::async_trait;

use crate::domain::Email;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailer adapters.
    pub enum MailerError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } =>
            "one-time code delivery failed: {message}",
    }
}

/// Why a one-time code is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    /// Email verification after registration.
    Verification,
    /// Password reset requested by the account holder.
    PasswordReset,
}

impl std::fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verification => f.write_str("verification"),
            Self::PasswordReset => f.write_str("password reset"),
        }
    }
}

/// Port for dispatching one-time codes to account email addresses.
///
/// Adapters own the delivery channel; the domain only guarantees that a
/// failed dispatch surfaces before the code is considered sent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send `code` to `recipient` for the stated purpose.
    async fn send_one_time_code(
        &self,
        recipient: &Email,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), MailerError>;
}
