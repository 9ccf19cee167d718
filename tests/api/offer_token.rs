use chrono::{Duration, Utc};
use reservationservice::entities::notification_tokens::{NotificationTokenType, TokenStatus};

use crate::helpers::{TokenFixture, spawn_app};
use crate::notification_token::token_payload;

const OFFER_TOKEN_PATH: &str = "/user/offer/token";

#[tokio::test]
async fn second_offer_request_returns_the_same_token_with_a_renewed_expiration() {
    let app = spawn_app().await;

    let first: serde_json::Value = app
        .post_json(OFFER_TOKEN_PATH, &token_payload(12, "OFFER_TOKEN"))
        .await
        .json()
        .await
        .expect("Response was not JSON");
    assert_eq!(first["source"], "PLAID");
    let first_expiration = app.tokens_of(12).await[0].expiration_date;

    let before_second = Utc::now();
    let response = app
        .post_json(OFFER_TOKEN_PATH, &token_payload(12, "OFFER_TOKEN"))
        .await;
    assert_eq!(200, response.status().as_u16());
    let second: serde_json::Value = response.json().await.expect("Response was not JSON");

    assert_eq!(first["token"], second["token"]);
    let stored = app.tokens_of(12).await;
    assert_eq!(stored.len(), 1);
    assert!(stored[0].expiration_date >= first_expiration);
    assert!(stored[0].expiration_date >= before_second + Duration::hours(9));
    assert!(stored[0].expiration_date <= Utc::now() + Duration::hours(9));
}

#[tokio::test]
async fn inactive_offer_token_is_reactivated() {
    let app = spawn_app().await;
    let mut fixture = TokenFixture::new(12, NotificationTokenType::OfferToken);
    fixture.status = TokenStatus::Inactive;
    fixture.expiration_date = Utc::now() - Duration::days(2);
    let existing = fixture.insert(&app.db).await;

    let response = app
        .post_json(OFFER_TOKEN_PATH, &token_payload(12, "OFFER_TOKEN"))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_eq!(body["token"], existing.token);

    let stored = app.tokens_of(12).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].notification_token_status, TokenStatus::Active);
    assert!(stored[0].expiration_date > Utc::now() + Duration::hours(8));
}

#[tokio::test]
async fn the_most_current_of_two_active_tokens_wins() {
    let app = spawn_app().await;
    let now = Utc::now();

    let mut a = TokenFixture::new(12, NotificationTokenType::OfferToken);
    a.create_date = now - Duration::hours(3);
    a.expiration_date = now + Duration::hours(2);
    let a = a.insert(&app.db).await;

    let mut b = TokenFixture::new(12, NotificationTokenType::OfferToken);
    b.create_date = now - Duration::hours(1);
    b.expiration_date = now + Duration::hours(1);
    let b = b.insert(&app.db).await;

    let response = app
        .post_json(OFFER_TOKEN_PATH, &token_payload(12, "OFFER_TOKEN"))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_eq!(body["token"], a.token);

    let stored = app.tokens_of(12).await;
    let status_of = |id| {
        stored
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.notification_token_status)
    };
    assert_eq!(status_of(a.id), Some(TokenStatus::Active));
    assert_eq!(status_of(b.id), Some(TokenStatus::Inactive));
}

#[tokio::test]
async fn non_offer_token_on_the_offer_endpoint_is_superseded() {
    let app = spawn_app().await;
    let existing = TokenFixture::new(10, NotificationTokenType::BankEnrollmentToken)
        .insert(&app.db)
        .await;

    let response = app
        .post_json(OFFER_TOKEN_PATH, &token_payload(10, "BANK_ENROLLMENT_TOKEN"))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_ne!(body["token"], existing.token);

    let stored = app.tokens_of(10).await;
    assert_eq!(stored.len(), 2);
    let old = stored.iter().find(|t| t.id == existing.id).expect("old token vanished");
    let new = stored.iter().find(|t| t.id != existing.id).expect("no new token");
    assert_eq!(old.notification_token_status, TokenStatus::Inactive);
    assert_eq!(new.notification_token_status, TokenStatus::Active);
    assert_eq!(body["token"], new.token);

    let delta = new.expiration_date - old.expiration_date;
    assert!(delta >= Duration::hours(10) - Duration::minutes(1));
    assert!(delta <= Duration::hours(10) + Duration::minutes(1));
}

#[tokio::test]
async fn first_non_offer_token_gets_the_enrollment_offset() {
    let app = spawn_app().await;
    let before = Utc::now();

    let response = app
        .post_json(OFFER_TOKEN_PATH, &token_payload(10, "BANK_ENROLLMENT_TOKEN"))
        .await;

    assert_eq!(200, response.status().as_u16());
    let stored = app.tokens_of(10).await;
    assert_eq!(stored.len(), 1);
    assert!(stored[0].expiration_date >= before + Duration::hours(10));
    assert!(stored[0].expiration_date <= Utc::now() + Duration::hours(10));
}
