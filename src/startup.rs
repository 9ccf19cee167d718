use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::{Database, DatabaseConnection};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::application_registry::{ApplicationRegistry, OriginationClient};
use crate::configuration::Settings;
use crate::data_service::{CashflowSourceClassifier, DataServiceClient};
use crate::email_client::{EmailClient, NotificationGateway};
use crate::notification_token::{TokenLifecycleManager, TokenPolicy};
use crate::routes::{
    health_check::health_check,
    notification_token::{
        get_notification_token, issue_bank_enrollment_update_token, issue_notification_token,
        issue_offer_token,
    },
    reservations::{create_reservation, get_reservation, list_reservations},
};

/// Shared by every request handler.
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: TokenLifecycleManager,
}

/// Services the token lifecycle depends on.
pub struct Collaborators {
    pub classifier: Arc<dyn CashflowSourceClassifier>,
    pub registry: Arc<dyn ApplicationRegistry>,
    pub gateway: Arc<dyn NotificationGateway>,
}

impl Collaborators {
    pub fn from_settings(configuration: &Settings) -> Result<Self, anyhow::Error> {
        let data_service = &configuration.data_service;
        let origination_service = &configuration.origination_service;
        let email = &configuration.email_client;

        Ok(Self {
            classifier: Arc::new(DataServiceClient::new(
                data_service.base_url.clone(),
                data_service.timeout(),
            )?),
            registry: Arc::new(OriginationClient::new(
                origination_service.base_url.clone(),
                origination_service.timeout(),
            )?),
            gateway: Arc::new(EmailClient::new(
                &email.sender_email,
                email.smtp_username.clone(),
                &email.smtp_password,
                &email.base_url,
                email.port,
                email.require_tls,
                email.timeout(),
            )?),
        })
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let db = Database::connect(configuration.database.with_db()).await?;
        let collaborators = Collaborators::from_settings(&configuration)?;
        Self::build_with(&configuration, db, collaborators).await
    }

    /// Builds the application around an existing pool and collaborators.
    pub async fn build_with(
        configuration: &Settings,
        db: DatabaseConnection,
        collaborators: Collaborators,
    ) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address).await?;
        let port = listener.local_addr()?.port();

        let tokens = TokenLifecycleManager::new(
            db.clone(),
            collaborators.classifier,
            collaborators.registry,
            collaborators.gateway,
            TokenPolicy::from_settings(&configuration.token),
        );
        let router = router(AppState { db, tokens });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .route("/reservation", post(create_reservation).get(list_reservations))
        .route("/reservation/:id", get(get_reservation))
        .route(
            "/user/notification/token",
            post(issue_notification_token).get(get_notification_token),
        )
        .route("/user/offer/token", post(issue_offer_token))
        .route(
            "/user/notification/bankenrollment/update/token",
            post(issue_bank_enrollment_update_token),
        )
        .with_state(Arc::new(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
