//! Outbound mail dispatch.
//!
//! The transport behind [`Mailer`] is a collaborator: the service layer only
//! decides *what* to send and *to whom*. Sending happens synchronously inline
//! with the triggering request; a failing transport surfaces as a
//! `ServiceError::Mail` on that request.

use async_trait::async_trait;
use tracing::info;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

/// Development transport: writes the message to the log instead of the wire.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), MailError> {
        info!(to, subject, "mail dispatched (log transport)");
        Ok(())
    }
}

/// Message templates. Subjects and bodies embed entity names so the message
/// stays meaningful even after the underlying row is renamed or deleted.
pub mod templates {
    pub fn reservation_approved(item_name: &str) -> (String, String) {
        (
            format!("Your Reservation for {item_name}"),
            format!("<p>Your reservation for the {item_name} has been approved.</p>"),
        )
    }

    pub fn reservation_revoked(item_name: &str) -> (String, String) {
        (
            format!("Your Reservation for {item_name}"),
            format!("<p>Your reservation for the {item_name} has been revoked.</p>"),
        )
    }

    pub fn admin_granted() -> (String, String) {
        (
            "Admin status for the chapter inventory".to_string(),
            "<p>You have been made an admin on the chapter inventory site.</p>".to_string(),
        )
    }

    pub fn admin_revoked() -> (String, String) {
        (
            "Admin status for the chapter inventory".to_string(),
            "<p>You have been removed as an admin on the chapter inventory site.</p>".to_string(),
        )
    }

    pub fn confirm_email(confirm_url: &str) -> (String, String) {
        (
            "Please Confirm Your Email".to_string(),
            format!("<p>Welcome! Confirm your email to activate your account: <a href=\"{confirm_url}\">{confirm_url}</a></p>"),
        )
    }

    pub fn password_reset(reset_url: &str) -> (String, String) {
        (
            "Reset Password Link".to_string(),
            format!("<p>A password reset was requested for your account: <a href=\"{reset_url}\">{reset_url}</a></p><p>The link expires in 30 minutes.</p>"),
        )
    }
}
