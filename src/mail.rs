use crate::config::SmtpConfig;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("failed to build email message: {0}")]
    MessageBuild(String),

    #[error("failed to create SMTP transport: {0}")]
    Transport(String),

    #[error("failed to send email: {0}")]
    Send(String),
}

/// Caller-supplied part of an outbound message.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Builds a reusable SMTP transport from the configured connection
/// parameters. `secure` selects wrapped TLS over STARTTLS.
pub fn build_transport(config: &SmtpConfig) -> Result<SmtpTransport, MailError> {
    let creds = Credentials::new(config.username.clone(), config.password.clone());

    let builder = if config.secure {
        SmtpTransport::relay(&config.host)
    } else {
        SmtpTransport::starttls_relay(&config.host)
    }
    .map_err(|e| MailError::Transport(e.to_string()))?;

    Ok(builder.port(config.port).credentials(creds).build())
}

/// Assembles a plain-text message: sender and bcc are the configured
/// account, recipient/subject/body come from the envelope.
pub fn build_message(envelope: &Envelope, config: &SmtpConfig) -> Result<Message, MailError> {
    let from = config
        .username
        .parse()
        .map_err(|e| MailError::MessageBuild(format!("invalid from address: {}", e)))?;

    let bcc = config
        .username
        .parse()
        .map_err(|e| MailError::MessageBuild(format!("invalid bcc address: {}", e)))?;

    let to = envelope
        .to
        .parse()
        .map_err(|e| MailError::MessageBuild(format!("invalid to address: {}", e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .bcc(bcc)
        .subject(envelope.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(envelope.body.clone())
        .map_err(|e| MailError::MessageBuild(e.to_string()))
}

/// Sends a message over the given transport. Delivery success or failure
/// is whatever the SMTP library reports; there is no retry here.
pub async fn send_mail(transport: SmtpTransport, message: Message) -> Result<(), MailError> {
    tokio::task::spawn_blocking(move || transport.send(&message))
        .await
        .map_err(|e| MailError::Send(format!("task join error: {}", e)))?
        .map_err(|e| MailError::Send(e.to_string()))?;

    tracing::info!("email sent");

    Ok(())
}
