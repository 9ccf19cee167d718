use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purpose of a token. Each application may hold one live token per type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationTokenType {
    #[sea_orm(string_value = "OFFER_TOKEN")]
    OfferToken,
    #[sea_orm(string_value = "BANK_ENROLLMENT_TOKEN")]
    BankEnrollmentToken,
    #[sea_orm(string_value = "E_SIGN_TOKEN")]
    ESignToken,
}

impl NotificationTokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationTokenType::OfferToken => "OFFER_TOKEN",
            NotificationTokenType::BankEnrollmentToken => "BANK_ENROLLMENT_TOKEN",
            NotificationTokenType::ESignToken => "E_SIGN_TOKEN",
        }
    }

    /// E-sign tokens are not tied to a cash-flow provider.
    pub fn uses_cashflow_source(&self) -> bool {
        !matches!(self, NotificationTokenType::ESignToken)
    }
}

impl std::fmt::Display for NotificationTokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for NotificationTokenType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "OFFER_TOKEN" => Ok(NotificationTokenType::OfferToken),
            "BANK_ENROLLMENT_TOKEN" => Ok(NotificationTokenType::BankEnrollmentToken),
            "E_SIGN_TOKEN" => Ok(NotificationTokenType::ESignToken),
            other => Err(format!("{other:?} is not a valid notification_token_type")),
        }
    }
}

// "ACTIVE" sorts before "INACTIVE"; the token lookup relies on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: uuid::Uuid,
    pub application_id: i32,
    pub notification_token_type: NotificationTokenType,
    pub notification_token_status: TokenStatus,
    pub token: String,
    pub source: String,
    pub create_date: DateTimeUtc,
    pub expiration_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
