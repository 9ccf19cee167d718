use reservationservice::entities::notification_tokens::{NotificationTokenType, TokenStatus};
use serde_json::json;

use crate::helpers::{TokenFixture, assert_error, spawn_app};
use crate::notification_token::token_payload;

const UPDATE_PATH: &str = "/user/notification/bankenrollment/update/token";

fn update_payload(application_id: i32) -> serde_json::Value {
    let mut payload = token_payload(application_id, "BANK_ENROLLMENT_TOKEN");
    if let Some(fields) = payload.as_object_mut() {
        fields.remove("notification_token_type");
    }
    payload
}

#[tokio::test]
async fn update_returns_the_plaid_source() {
    let app = spawn_app().await;

    let response = app.post_json(UPDATE_PATH, &update_payload(12)).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_eq!(body["status"], "OK");
    assert_eq!(body["source"], "PLAID");
    assert_eq!(body["message"], "Notification token successfully created");

    let stored = app.tokens_of(12).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].notification_token_type,
        NotificationTokenType::BankEnrollmentToken
    );
}

#[tokio::test]
async fn update_returns_the_yodlee_source() {
    let app = spawn_app().await;
    app.classify_clients_as("YODLEE").await;

    let response = app.post_json(UPDATE_PATH, &update_payload(12)).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_eq!(body["source"], "YODLEE");
    assert_eq!(body["message"], "Notification token successfully created");
}

#[tokio::test]
async fn update_always_replaces_the_current_token() {
    let app = spawn_app().await;
    let existing = TokenFixture::new(12, NotificationTokenType::BankEnrollmentToken)
        .insert(&app.db)
        .await;

    let response = app
        .post_json(UPDATE_PATH, &token_payload(12, "BANK_ENROLLMENT_TOKEN"))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_ne!(body["token"], existing.token);

    let stored = app.tokens_of(12).await;
    let active: Vec<_> = stored
        .iter()
        .filter(|t| t.notification_token_status == TokenStatus::Active)
        .collect();
    assert_eq!(stored.len(), 2);
    assert_eq!(active.len(), 1);
    assert_eq!(body["token"], active[0].token);
}

#[tokio::test]
async fn update_rejects_other_token_types() {
    let app = spawn_app().await;

    let mut payload = update_payload(12);
    payload["notification_token_type"] = json!("OFFER_TOKEN");
    let response = app.post_json(UPDATE_PATH, &payload).await;

    assert_error(response, 400, "VALIDATION_ERROR").await;
    assert!(app.tokens_of(12).await.is_empty());
}
