use std::time::Duration;

use lettre::{
    Address, Message, SmtpTransport, Transport,
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};

use crate::entities::notification_tokens::NotificationTokenType;

/// What a recipient is told about a freshly issued or refreshed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNotice {
    pub recipients: Vec<Address>,
    pub token_type: NotificationTokenType,
    pub application_id: i32,
    pub token: String,
    pub link: String,
    pub contact_name: Option<String>,
    pub business_name: Option<String>,
}

impl TokenNotice {
    pub fn subject(&self) -> String {
        let purpose = match self.token_type {
            NotificationTokenType::OfferToken => "Your offer is ready",
            NotificationTokenType::BankEnrollmentToken => "Connect your bank account",
            NotificationTokenType::ESignToken => "Your documents are ready to sign",
        };
        match &self.business_name {
            Some(business) => format!("{purpose} - {business}"),
            None => purpose.to_string(),
        }
    }

    pub fn text_body(&self) -> String {
        format!(
            "Hello {},\nUse the following link to continue with application {}: {}\n",
            self.contact_name.as_deref().unwrap_or("there"),
            self.application_id,
            self.link
        )
    }

    pub fn html_body(&self) -> String {
        format!(
            "Hello {},<br />Use <a href=\"{}\">this link</a> to continue with application {}.",
            self.contact_name.as_deref().unwrap_or("there"),
            self.link,
            self.application_id
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("delivery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Delivers token notices to their recipients.
#[async_trait::async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn dispatch(&self, notice: &TokenNotice) -> Result<(), DispatchError>;
}

pub struct EmailClient {
    sender: Mailbox,
    smtp_transport: SmtpTransport,
}

impl EmailClient {
    pub fn new(
        sender: &str,
        username: String,
        password: &SecretString,
        base_url: &str,
        port: u16,
        require_tls: bool,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let creds = Credentials::new(username, password.expose_secret().to_string());

        let builder = if require_tls {
            SmtpTransport::relay(base_url)?
        } else {
            // Plain SMTP, for local relays such as MailHog.
            SmtpTransport::builder_dangerous(base_url)
        };
        let smtp_transport = builder
            .port(port)
            .credentials(creds)
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            sender: sender.parse()?,
            smtp_transport,
        })
    }

    fn build_message(&self, notice: &TokenNotice) -> Result<Message, DispatchError> {
        let mut builder = Message::builder().from(self.sender.clone());
        for recipient in &notice.recipients {
            builder = builder.to(Mailbox::new(None, recipient.clone()));
        }

        let message = builder.subject(notice.subject()).multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(notice.text_body()))
                .singlepart(SinglePart::html(notice.html_body())),
        )?;
        Ok(message)
    }
}

#[async_trait::async_trait]
impl NotificationGateway for EmailClient {
    #[tracing::instrument(
        name = "Sending token notification email",
        skip(self, notice),
        fields(application_id = notice.application_id, token_type = %notice.token_type)
    )]
    async fn dispatch(&self, notice: &TokenNotice) -> Result<(), DispatchError> {
        let email = self.build_message(notice)?;

        // SmtpTransport blocks; keep it off the async workers.
        let transport = self.smtp_transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email)).await??;
        Ok(())
    }
}
