//! SMTP mailer built on lettre.
//!
//! lettre's `SmtpTransport` is blocking, so verify and send run on the
//! blocking thread pool. A transport is built per call to avoid holding idle
//! SMTP sessions between bookings.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

use crate::common::TransportError;
use crate::kernel::traits::{BaseMailer, OutgoingEmail};

/// Port used for implicit TLS; everything else negotiates STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Credentials,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: String,
        port: u16,
        username: String,
        password: String,
        from_email: &str,
        from_name: &str,
    ) -> Result<Self, TransportError> {
        let from = format!("\"{}\" <{}>", from_name, from_email)
            .parse::<Mailbox>()
            .map_err(|e| TransportError::InvalidAddress(format!("from: {e}")))?;

        Ok(Self {
            host,
            port,
            credentials: Credentials::new(username, password),
            from,
        })
    }

    fn build_transport(&self) -> Result<SmtpTransport, TransportError> {
        let builder = if self.port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&self.host)
        } else {
            SmtpTransport::starttls_relay(&self.host)
        }
        .map_err(|e| TransportError::Verify(format!("SMTP relay error: {e}")))?;

        Ok(builder
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, TransportError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| TransportError::InvalidAddress(format!("to: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body)
            .map_err(|e| TransportError::Build(e.to_string()))
    }
}

#[async_trait]
impl BaseMailer for SmtpMailer {
    async fn verify(&self) -> Result<(), TransportError> {
        let transport = self.build_transport()?;
        let reachable = tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| TransportError::Task(e.to_string()))?
            .map_err(|e| TransportError::Verify(e.to_string()))?;

        if !reachable {
            return Err(TransportError::Verify(format!(
                "{}:{} did not accept the connection",
                self.host, self.port
            )));
        }
        debug!(host = %self.host, "SMTP transport verified");
        Ok(())
    }

    async fn send(&self, email: OutgoingEmail) -> Result<(), TransportError> {
        let message = self.build_message(email)?;
        let transport = self.build_transport()?;

        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| TransportError::Task(e.to_string()))?
            .map_err(|e| TransportError::Send(e.to_string()))?;

        info!(code = %response.code(), "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(
            "smtp.example.com".to_string(),
            587,
            "user".to_string(),
            "pass".to_string(),
            "events@example.com",
            "Dev Events",
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_sender() {
        let result = SmtpMailer::new(
            "smtp.example.com".to_string(),
            587,
            "user".to_string(),
            "pass".to_string(),
            "not an address",
            "Dev Events",
        );
        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[test]
    fn builds_html_message_from_outgoing_email() {
        let message = mailer()
            .build_message(OutgoingEmail {
                to: "ada@example.com".to_string(),
                subject: "Your Booking – React Summit".to_string(),
                html_body: "<h2>Booking Confirmed</h2>".to_string(),
            })
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: ada@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("events@example.com"));
    }

    #[test]
    fn rejects_invalid_recipient_before_touching_transport() {
        let err = mailer()
            .build_message(OutgoingEmail {
                to: "nobody".to_string(),
                subject: "s".to_string(),
                html_body: "b".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress(_)));
    }
}
