// src/services/notify.rs

//! Diagnosis delivery over SMTP.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::NotificationConfig;

/// Opaque `send(subject, body, recipient)` capability.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<()>;
}

/// Sends plain-text mail through an authenticated STARTTLS relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpNotifier {
    pub fn new(config: &NotificationConfig, user: &str, password: &str) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(AppError::notification)?
            .port(config.smtp_port)
            .credentials(SmtpCredentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self {
            transport,
            sender: user.to_string(),
        })
    }
}

/// Build the message envelope; the sender doubles as the SMTP login.
pub fn build_message(sender: &str, recipient: &str, subject: &str, body: &str) -> Result<Message> {
    let from = sender
        .parse::<Mailbox>()
        .map_err(|e| AppError::notification(format!("invalid sender '{sender}': {e}")))?;
    let to = recipient
        .parse::<Mailbox>()
        .map_err(|e| AppError::notification(format!("invalid recipient '{recipient}': {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(AppError::notification)
}

#[async_trait]
impl NotificationSink for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<()> {
        let message = build_message(&self.sender, recipient, subject, body)?;
        log::info!("Sending notification to {recipient}...");
        self.transport
            .send(message)
            .await
            .map_err(AppError::notification)?;
        log::info!("Email sent successfully");
        Ok(())
    }
}
