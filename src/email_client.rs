mod smtp_dispatcher;

use crate::configuration::Settings;
use crate::domain::{Resume, SubmitterEmail};
use crate::utils::error_chain_fmt;
use async_trait::async_trait;
pub use smtp_dispatcher::SmtpDispatcher;

/// Hands composed messages to an outbound mail transport.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Checks connectivity and credentials without sending anything.
    async fn verify(&self) -> Result<(), DispatchError>;

    async fn send(&self, message: &EmailMessage) -> Result<(), DispatchError>;
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("The mail transport failed verification")]
    VerificationFailed(#[source] anyhow::Error),
    #[error("Failed to send the email")]
    SendFailed(#[source] anyhow::Error),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: SubmitterEmail,
    pub to: SubmitterEmail,
    pub reply_to: Option<SubmitterEmail>,
    pub subject: String,
    pub text_body: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl From<Resume> for Attachment {
    fn from(resume: Resume) -> Self {
        Self {
            filename: resume.filename().to_string(),
            content_type: resume.content_type().to_string(),
            content: resume.into_content(),
        }
    }
}

/// Fixed addressing for every outbound message: who sends, who gets notified,
/// and the business name used in acknowledgments.
#[derive(Debug, Clone)]
pub struct MailRouting {
    pub sender: SubmitterEmail,
    pub support_address: SubmitterEmail,
    pub business_name: String,
}

impl MailRouting {
    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        Ok(Self {
            sender: settings.email.sender()?,
            support_address: settings.email.recipient()?,
            business_name: settings.application.business_name.clone(),
        })
    }
}
