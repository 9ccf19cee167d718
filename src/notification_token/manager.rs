use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Statement, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use super::TokenPolicy;
use crate::application_registry::{ApplicationRegistry, ApplicationSummary};
use crate::data_service::{CashflowSource, CashflowSourceClassifier};
use crate::domain::TokenRequest;
use crate::email_client::{NotificationGateway, TokenNotice};
use crate::entities::notification_tokens::{self, NotificationTokenType, TokenStatus};
use crate::error::ServiceError;

/// How an issue request treats a token that already exists for the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueMode {
    /// Reuse the current record, reactivating and extending it.
    Refresh,
    /// Retire every active record and insert a new one.
    Supersede,
}

impl IssueMode {
    pub fn for_offer_endpoint(token_type: NotificationTokenType) -> Self {
        match token_type {
            NotificationTokenType::OfferToken => IssueMode::Refresh,
            _ => IssueMode::Supersede,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    Created,
    Renewed,
    Superseded,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub record: notification_tokens::Model,
    pub outcome: IssueOutcome,
}

pub struct TokenLifecycleManager {
    db: DatabaseConnection,
    classifier: Arc<dyn CashflowSourceClassifier>,
    registry: Arc<dyn ApplicationRegistry>,
    gateway: Arc<dyn NotificationGateway>,
    policy: TokenPolicy,
}

impl TokenLifecycleManager {
    pub fn new(
        db: DatabaseConnection,
        classifier: Arc<dyn CashflowSourceClassifier>,
        registry: Arc<dyn ApplicationRegistry>,
        gateway: Arc<dyn NotificationGateway>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            db,
            classifier,
            registry,
            gateway,
            policy,
        }
    }

    #[tracing::instrument(
        name = "Issuing notification token",
        skip(self, request),
        fields(
            application_id = request.application_id,
            token_type = %request.token_type,
            mode = ?mode
        )
    )]
    pub async fn issue_or_refresh(
        &self,
        request: &TokenRequest,
        mode: IssueMode,
    ) -> Result<IssuedToken, ServiceError> {
        let application = self
            .registry
            .get_application(request.application_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "application {} does not exist",
                    request.application_id
                ))
            })?;

        if application.client_id != request.client_id {
            return Err(ServiceError::Validation(format!(
                "application {} does not belong to client {}",
                request.application_id, request.client_id
            )));
        }

        // Records are never deleted, so a pair seen here is still there once
        // locked. Classifying up front keeps the upstream call outside the lock.
        let mints = mode == IssueMode::Supersede
            || find_current_token(&self.db, request.application_id, request.token_type, false)
                .await?
                .is_none();
        let source = if mints {
            Some(self.resolve_source(request.token_type, application.client_id).await?)
        } else {
            None
        };

        // Dropping `txn` on an early return rolls everything back.
        let txn = self.db.begin().await?;
        lock_application(&txn, request.application_id).await?;

        let current =
            find_current_token(&txn, request.application_id, request.token_type, true).await?;
        let now = Utc::now();
        let lifetime = self.policy.issuance_offset(request.token_type);

        let issued = match (mode, current) {
            (IssueMode::Refresh, Some(existing)) => IssuedToken {
                record: self.renew(&txn, existing, now).await?,
                outcome: IssueOutcome::Renewed,
            },
            (IssueMode::Supersede, Some(_)) => {
                let retired = deactivate_active_tokens(
                    &txn,
                    request.application_id,
                    request.token_type,
                    None,
                )
                .await?;
                tracing::info!(retired, "Retired active notification tokens");
                let source = self.source_or_resolve(source, request, &application).await?;
                IssuedToken {
                    record: mint(&txn, request, source, lifetime, now).await?,
                    outcome: IssueOutcome::Superseded,
                }
            }
            (_, None) => {
                let source = self.source_or_resolve(source, request, &application).await?;
                IssuedToken {
                    record: mint(&txn, request, source, lifetime, now).await?,
                    outcome: IssueOutcome::Created,
                }
            }
        };

        txn.commit().await?;
        tracing::info!(
            token_id = %issued.record.id,
            outcome = ?issued.outcome,
            expiration_date = %issued.record.expiration_date,
            "Notification token stored"
        );

        self.notify(request, &application, &issued.record).await;
        Ok(issued)
    }

    #[tracing::instrument(name = "Fetching notification token", skip(self))]
    pub async fn get_token(
        &self,
        application_id: i32,
        token_type: NotificationTokenType,
    ) -> Result<notification_tokens::Model, ServiceError> {
        find_current_token(&self.db, application_id, token_type, false)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "no {token_type} found for application {application_id}"
                ))
            })
    }

    async fn renew<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: notification_tokens::Model,
        now: DateTime<Utc>,
    ) -> Result<notification_tokens::Model, DbErr> {
        let mut token: notification_tokens::ActiveModel = existing.into();
        token.notification_token_status = Set(TokenStatus::Active);
        token.expiration_date = Set(now + self.policy.renewal);
        let renewed = token.update(db).await?;

        deactivate_active_tokens(
            db,
            renewed.application_id,
            renewed.notification_token_type,
            Some(renewed.id),
        )
        .await?;
        Ok(renewed)
    }

    async fn resolve_source(
        &self,
        token_type: NotificationTokenType,
        client_id: i32,
    ) -> Result<CashflowSource, ServiceError> {
        if !token_type.uses_cashflow_source() {
            return Ok(CashflowSource::Unclassified);
        }
        Ok(self.classifier.classify(client_id).await?)
    }

    async fn source_or_resolve(
        &self,
        resolved: Option<CashflowSource>,
        request: &TokenRequest,
        application: &ApplicationSummary,
    ) -> Result<CashflowSource, ServiceError> {
        match resolved {
            Some(source) => Ok(source),
            None => {
                self.resolve_source(request.token_type, application.client_id)
                    .await
            }
        }
    }

    async fn notify(
        &self,
        request: &TokenRequest,
        application: &ApplicationSummary,
        record: &notification_tokens::Model,
    ) {
        let notice = TokenNotice {
            recipients: request.recipients.iter().cloned().collect(),
            token_type: record.notification_token_type,
            application_id: record.application_id,
            token: record.token.clone(),
            link: self.policy.link_for(&record.token),
            contact_name: request.context.contact_name.clone(),
            business_name: request
                .context
                .business_name
                .clone()
                .or_else(|| application.business_name.clone()),
        };

        match tokio::time::timeout(self.policy.dispatch_timeout, self.gateway.dispatch(&notice))
            .await
        {
            Ok(Ok(())) => tracing::info!("Token notification dispatched"),
            Ok(Err(e)) => tracing::error!(error = ?e, "Failed to dispatch token notification"),
            Err(_) => tracing::error!(
                timeout = ?self.policy.dispatch_timeout,
                "Token notification dispatch timed out"
            ),
        }
    }
}

/// The record that currently represents the pair: active before inactive,
/// then the latest expiration, then the latest creation.
pub async fn find_current_token<C: ConnectionTrait>(
    db: &C,
    application_id: i32,
    token_type: NotificationTokenType,
    for_update: bool,
) -> Result<Option<notification_tokens::Model>, DbErr> {
    use notification_tokens::Column;

    let mut query = notification_tokens::Entity::find()
        .filter(Column::ApplicationId.eq(application_id))
        .filter(Column::NotificationTokenType.eq(token_type.into_value()))
        .order_by_asc(Column::NotificationTokenStatus)
        .order_by_desc(Column::ExpirationDate)
        .order_by_desc(Column::CreateDate);
    if for_update {
        query = query.lock_exclusive();
    }
    query.one(db).await
}

async fn mint<C: ConnectionTrait>(
    db: &C,
    request: &TokenRequest,
    source: CashflowSource,
    lifetime: chrono::Duration,
    now: DateTime<Utc>,
) -> Result<notification_tokens::Model, DbErr> {
    notification_tokens::ActiveModel {
        id: Set(Uuid::new_v4()),
        application_id: Set(request.application_id),
        notification_token_type: Set(request.token_type),
        notification_token_status: Set(TokenStatus::Active),
        token: Set(generate_notification_token()),
        source: Set(source.as_str().to_string()),
        create_date: Set(now),
        expiration_date: Set(now + lifetime),
    }
    .insert(db)
    .await
}

async fn deactivate_active_tokens<C: ConnectionTrait>(
    db: &C,
    application_id: i32,
    token_type: NotificationTokenType,
    keep: Option<Uuid>,
) -> Result<u64, DbErr> {
    use notification_tokens::Column;

    let mut update = notification_tokens::Entity::update_many()
        .col_expr(
            Column::NotificationTokenStatus,
            Expr::value(TokenStatus::Inactive.into_value()),
        )
        .filter(Column::ApplicationId.eq(application_id))
        .filter(Column::NotificationTokenType.eq(token_type.into_value()))
        .filter(Column::NotificationTokenStatus.eq(TokenStatus::Active.into_value()));
    if let Some(id) = keep {
        update = update.filter(Column::Id.ne(id));
    }
    Ok(update.exec(db).await?.rows_affected)
}

/// Row locks cannot cover a record that does not exist yet, so on Postgres
/// concurrent first issues for one application queue on an advisory lock.
async fn lock_application<C: ConnectionTrait>(db: &C, application_id: i32) -> Result<(), DbErr> {
    if db.get_database_backend() == DbBackend::Postgres {
        db.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT pg_advisory_xact_lock($1)",
            [i64::from(application_id).into()],
        ))
        .await?;
    }
    Ok(())
}

pub fn generate_notification_token() -> String {
    let mut rng = thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(25)
        .collect()
}
