//! Email service for sending booking confirmations

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

/// Fields of the confirmation message sent when a booking is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEmail {
    pub to_name: String,
    pub to_email: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub car_number: String,
    pub branch: String,
}

/// Delivery seam for confirmation messages. Callers treat sends as
/// fire-and-forget: failures are logged, never propagated into the status
/// transition that triggered them.
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    async fn send_confirmation(&self, email: &ConfirmationEmail) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Pitstop Service Center");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Email(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Email(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace("\n", "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Email(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            // Use STARTTLS for secure connection
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl NotificationRelay for EmailService {
    /// Send the appointment confirmation message
    async fn send_confirmation(&self, email: &ConfirmationEmail) -> AppResult<()> {
        let subject = "Your Service Appointment is Confirmed";
        let body = format!(
            r#"
Hello {name},

Your service appointment has been confirmed.

Date:     {date}
Time:     {time}
Vehicle:  {car}
Branch:   {branch}

Please arrive a few minutes early. If you need to reschedule, contact the branch directly.
"#,
            name = email.to_name,
            date = email.appointment_date,
            time = email.appointment_time,
            car = email.car_number,
            branch = email.branch,
        );

        self.send_email(&email.to_email, subject, &body).await
    }
}
