//! Email notifications for confirmed bookings

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

/// A single HTML email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Outbound notification channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, notification: &Notification) -> AppResult<Message> {
        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("Studio");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Email(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(&notification.to)
            .map_err(|e| AppError::Email(format!("Invalid to address: {}", e)))?;

        let mut builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(notification.subject.as_str());

        for cc in &notification.cc {
            let cc_mailbox = Mailbox::from_str(cc)
                .map_err(|e| AppError::Email(format!("Invalid cc address: {}", e)))?;
            builder = builder.cc(cc_mailbox);
        }

        builder
            .header(ContentType::TEXT_HTML)
            .body(notification.html.clone())
            .map_err(|e| AppError::Email(format!("Failed to build email: {}", e)))
    }

    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        Ok(mailer_builder.build())
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send(&self, notification: &Notification) -> AppResult<()> {
        let email = self.build_message(notification)?;
        let mailer = self.build_transport()?;

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Email(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Sent \"{}\" to {}", notification.subject, notification.to);
        Ok(())
    }
}

/// Details shown in a booking confirmation
pub struct ConfirmationDetails<'a> {
    pub studio_name: &'a str,
    pub customer_name: &'a str,
    pub date: &'a str,
    pub time_slot: &'a str,
    pub duration_hours: u8,
    pub shooting_type: Option<&'a str>,
}

/// Subject and HTML body of a booking confirmation
pub fn booking_confirmation(details: &ConfirmationDetails<'_>) -> (String, String) {
    let subject = format!(
        "{} - booking confirmed for {} at {}",
        details.studio_name, details.date, details.time_slot
    );
    let html = format!(
        r#"<html><body>
<h2>Booking confirmed</h2>
<p>Hello {name},</p>
<p>your session at {studio} is confirmed.</p>
<ul>
<li><strong>Date:</strong> {date}</li>
<li><strong>Time:</strong> {time}</li>
<li><strong>Duration:</strong> {hours} h</li>
<li><strong>Type:</strong> {kind}</li>
</ul>
</body></html>"#,
        name = escape_html(details.customer_name),
        studio = escape_html(details.studio_name),
        date = details.date,
        time = details.time_slot,
        hours = details.duration_hours,
        kind = escape_html(details.shooting_type.unwrap_or("-")),
    );
    (subject, html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
