use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use uuid::Uuid;

use crate::domain::{TokenRequest, TokenRequestPayload, positive_id};
use crate::entities::notification_tokens::{self, NotificationTokenType};
use crate::error::ServiceError;
use crate::notification_token::IssueMode;
use crate::routes::STATUS_OK;
use crate::startup::AppState;

const TOKEN_CREATED: &str = "Notification token successfully created";

#[derive(serde::Serialize, Debug)]
pub struct TokenResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub token: String,
    pub source: String,
}

impl TokenResponse {
    fn ok(message: &'static str, record: notification_tokens::Model) -> Self {
        Self {
            status: STATUS_OK,
            message,
            token: record.token,
            source: record.source,
        }
    }
}

/// Query string or JSON body; older portal clients send a body with GET.
#[derive(serde::Deserialize, Debug, Default)]
pub struct TokenLookup {
    pub application_id: Option<i32>,
    pub notification_token_type: Option<String>,
}

impl TokenLookup {
    /// Fields missing here are taken from `fallback`.
    fn or(self, fallback: TokenLookup) -> TokenLookup {
        TokenLookup {
            application_id: self.application_id.or(fallback.application_id),
            notification_token_type: self
                .notification_token_type
                .or(fallback.notification_token_type),
        }
    }
}

fn read_payload(
    payload: Result<Json<TokenRequestPayload>, JsonRejection>,
) -> Result<TokenRequestPayload, ServiceError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|e| ServiceError::Validation(e.body_text()))
}

async fn issue(
    state: &AppState,
    payload: TokenRequestPayload,
    mode_for: impl FnOnce(NotificationTokenType) -> IssueMode,
) -> Result<Json<TokenResponse>, ServiceError> {
    let request = TokenRequest::try_from(payload).map_err(ServiceError::Validation)?;
    let mode = mode_for(request.token_type);

    let issued = state.tokens.issue_or_refresh(&request, mode).await?;
    Ok(Json(TokenResponse::ok(TOKEN_CREATED, issued.record)))
}

#[tracing::instrument(
    name = "签发或续期通知令牌",
    skip(state, payload),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn issue_notification_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequestPayload>, JsonRejection>,
) -> Result<Json<TokenResponse>, ServiceError> {
    issue(&state, read_payload(payload)?, |_| IssueMode::Refresh).await
}

#[tracing::instrument(
    name = "签发报价令牌",
    skip(state, payload),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn issue_offer_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequestPayload>, JsonRejection>,
) -> Result<Json<TokenResponse>, ServiceError> {
    issue(&state, read_payload(payload)?, IssueMode::for_offer_endpoint).await
}

#[tracing::instrument(
    name = "替换银行绑定令牌",
    skip(state, payload),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn issue_bank_enrollment_update_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequestPayload>, JsonRejection>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let mut payload = read_payload(payload)?;
    let token_type = payload
        .notification_token_type
        .get_or_insert_with(|| NotificationTokenType::BankEnrollmentToken.to_string());
    if token_type.as_str() != NotificationTokenType::BankEnrollmentToken.as_str() {
        return Err(ServiceError::Validation(format!(
            "only {} can be replaced through this endpoint",
            NotificationTokenType::BankEnrollmentToken
        )));
    }

    issue(&state, payload, |_| IssueMode::Supersede).await
}

#[tracing::instrument(
    name = "查询通知令牌",
    skip(state, query, body),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn get_notification_token(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TokenLookup>, QueryRejection>,
    body: Option<Json<TokenLookup>>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let Query(query) = query.map_err(|e| ServiceError::Validation(e.body_text()))?;
    let lookup = query.or(body.map(|Json(body)| body).unwrap_or_default());
    let application_id =
        positive_id("application_id", lookup.application_id).map_err(ServiceError::Validation)?;
    let token_type = lookup
        .notification_token_type
        .ok_or_else(|| "notification_token_type is required".to_string())
        .and_then(NotificationTokenType::try_from)
        .map_err(ServiceError::Validation)?;

    let record = state.tokens.get_token(application_id, token_type).await?;
    Ok(Json(TokenResponse::ok("Notification token found", record)))
}
