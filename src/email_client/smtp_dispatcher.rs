use crate::configuration::EmailSettings;
use crate::email_client::{DispatchError, Dispatcher, EmailMessage};
use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// SMTP dispatcher backed by a pooled lettre transport.
///
/// The transport is built once and shared between requests. Connections are
/// opened lazily, but building the pool spawns its background task, so
/// `SmtpDispatcher::new` must be called from within a tokio runtime.
pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpDispatcher {
    pub fn new(settings: &EmailSettings) -> Result<Self, anyhow::Error> {
        let mut builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .context("Failed to configure an implicit TLS transport")?
        } else {
            let tls = TlsParameters::new(settings.host.clone())
                .context("Failed to configure STARTTLS parameters")?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .tls(Tls::Opportunistic(tls))
        };
        builder = builder.port(settings.port);

        if !settings.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.expose_secret().clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Dispatcher for SmtpDispatcher {
    #[tracing::instrument(name = "Verifying the SMTP transport", skip(self))]
    async fn verify(&self) -> Result<(), DispatchError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DispatchError::VerificationFailed(anyhow::anyhow!(
                "The SMTP server did not accept the connection"
            ))),
            Err(e) => Err(DispatchError::VerificationFailed(
                anyhow::Error::new(e).context("Failed to connect to the SMTP server"),
            )),
        }
    }

    #[tracing::instrument(
        name = "Sending an email over SMTP",
        skip(self, message),
        fields(recipient = %message.to, subject = %message.subject)
    )]
    async fn send(&self, message: &EmailMessage) -> Result<(), DispatchError> {
        let email = compose(message).map_err(DispatchError::SendFailed)?;
        self.transport
            .send(email)
            .await
            .context("The SMTP server rejected the message")
            .map_err(DispatchError::SendFailed)?;
        Ok(())
    }
}

fn compose(message: &EmailMessage) -> Result<Message, anyhow::Error> {
    let mut builder = Message::builder()
        .from(mailbox(message.from.as_ref())?)
        .to(mailbox(message.to.as_ref())?)
        .subject(message.subject.as_str());
    if let Some(reply_to) = &message.reply_to {
        builder = builder.reply_to(mailbox(reply_to.as_ref())?);
    }

    let text = SinglePart::plain(message.text_body.clone());
    let email = if message.attachments.is_empty() {
        builder.singlepart(text)
    } else {
        let mut parts = MultiPart::mixed().singlepart(text);
        for attachment in &message.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .or_else(|_| ContentType::parse(FALLBACK_CONTENT_TYPE))
                .map_err(|_| anyhow::anyhow!("Failed to parse the attachment content type"))?;
            parts = parts.singlepart(
                lettre::message::Attachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), content_type),
            );
        }
        builder.multipart(parts)
    };
    email.context("Failed to build the email message")
}

fn mailbox(address: &str) -> Result<Mailbox, anyhow::Error> {
    address
        .parse::<Mailbox>()
        .with_context(|| format!("{} is not a valid mailbox", address))
}
