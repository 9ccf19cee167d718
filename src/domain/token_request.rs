use crate::domain::{RecipientEmails, positive_id};
use crate::entities::notification_tokens::NotificationTokenType;

/// Body accepted by the token issuing endpoints. Fields the portal sends that
/// this service does not use (stipulations, user_token, ...) are ignored.
#[derive(serde::Deserialize, Debug, Default, Clone)]
pub struct TokenRequestPayload {
    pub application_id: Option<i32>,
    pub notification_token_type: Option<String>,
    pub client_id: Option<i32>,
    pub business_id: Option<i32>,
    #[serde(alias = "contact_email")]
    pub email: Option<String>,
    pub contact_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub iso_name: Option<String>,
    pub iso_email: Option<String>,
    pub application_source: Option<String>,
}

/// Attributes handed through to the notification, never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenContext {
    pub business_id: Option<i32>,
    pub contact_name: Option<String>,
    pub business_name: Option<String>,
    pub iso_name: Option<String>,
    pub iso_email: Option<String>,
    pub application_source: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub application_id: i32,
    pub token_type: NotificationTokenType,
    pub client_id: i32,
    pub recipients: RecipientEmails,
    pub context: TokenContext,
}

impl TryFrom<TokenRequestPayload> for TokenRequest {
    type Error = String;

    fn try_from(payload: TokenRequestPayload) -> Result<Self, Self::Error> {
        let application_id = positive_id("application_id", payload.application_id)?;
        let token_type = payload
            .notification_token_type
            .ok_or_else(|| "notification_token_type is required".to_string())
            .and_then(NotificationTokenType::try_from)?;
        let client_id = positive_id("client_id", payload.client_id)?;
        let recipients = RecipientEmails::parse(payload.email.unwrap_or_default())?;

        let contact_name = payload.contact_name.or_else(|| {
            let full_name = [payload.first_name, payload.last_name]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            (!full_name.is_empty()).then_some(full_name)
        });

        Ok(Self {
            application_id,
            token_type,
            client_id,
            recipients,
            context: TokenContext {
                business_id: payload.business_id,
                contact_name,
                business_name: payload.business_name,
                iso_name: payload.iso_name,
                iso_email: payload.iso_email,
                application_source: payload.application_source,
            },
        })
    }
}
