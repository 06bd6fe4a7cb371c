//! Outbound mail channel for operational notifications.
//!
//! Uses `lettre` for SMTP transport. Every notification is best-effort: the
//! caller logs failures and never propagates them into the financial write
//! path.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::EmailConfig;

/// Mail channel errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Catalog of operational mail templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTemplate {
    /// A proforma was registered for a project.
    NewProforma,
    /// An existing proforma was modified.
    ProformaUpdated,
    /// A fully collected special-order project is ready to coordinate.
    SpecialOrderCollected,
    /// A fully collected stock project is ready to coordinate.
    StockCollected,
    /// A delivery is scheduled for tomorrow (logistics crew).
    DeliveryDayLogistics,
    /// A delivery is scheduled for tomorrow (customer copy).
    DeliveryDayCustomer,
}

impl MailTemplate {
    /// Subject line for this template.
    #[must_use]
    pub const fn subject(self) -> &'static str {
        match self {
            Self::NewProforma => "Proforma agregada",
            Self::ProformaUpdated => "Proforma actualizada",
            Self::SpecialOrderCollected | Self::StockCollected => "Coordinación de Entrega",
            Self::DeliveryDayLogistics | Self::DeliveryDayCustomer => {
                "Próxima entrega programada"
            }
        }
    }
}

/// A notification to deliver through the mail channel.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Template to render.
    pub template: MailTemplate,
    /// Template payload (project folio, customer name, product lines, ...).
    pub data: Value,
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a notification to every recipient.
    async fn send(&self, notification: Notification) -> Result<(), MailError>;

    /// Delivers a notification, logging failures instead of returning them.
    async fn send_best_effort(&self, notification: Notification) {
        let template = notification.template;
        if let Err(error) = self.send(notification).await {
            warn!(?template, %error, "notification delivery failed");
        }
    }
}

/// SMTP-backed notifier.
#[derive(Clone)]
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    /// Creates a new mailer.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| MailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build()
            .pipe(Ok)
    }

    /// Renders the plain-text body for a notification.
    fn render_body(template: MailTemplate, data: &Value) -> String {
        let mut body = String::new();
        body.push_str(template.subject());
        body.push_str("\n\n");
        if let Value::Object(fields) = data {
            for (key, value) in fields {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                body.push_str(&format!("{key}: {rendered}\n"));
            }
        }
        body
    }

    async fn send_one(&self, to_email: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| MailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| MailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| MailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for Mailer {
    async fn send(&self, notification: Notification) -> Result<(), MailError> {
        let subject = notification.template.subject();
        let body = Self::render_body(notification.template, &notification.data);
        for recipient in &notification.to {
            self.send_one(recipient, subject, &body).await?;
        }
        Ok(())
    }
}

/// Pipe trait for fluent API.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subjects() {
        assert_eq!(MailTemplate::NewProforma.subject(), "Proforma agregada");
        assert_eq!(
            MailTemplate::StockCollected.subject(),
            "Coordinación de Entrega"
        );
        assert_eq!(
            MailTemplate::DeliveryDayCustomer.subject(),
            "Próxima entrega programada"
        );
    }

    #[test]
    fn test_render_body_includes_fields() {
        let body = Mailer::render_body(
            MailTemplate::NewProforma,
            &json!({"projectId": "12B", "providerName": "Poltrona"}),
        );
        assert!(body.contains("Proforma agregada"));
        assert!(body.contains("projectId: 12B"));
        assert!(body.contains("providerName: Poltrona"));
    }
}
