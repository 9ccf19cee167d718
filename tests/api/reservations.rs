use reservationservice::entities::reservations;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use crate::helpers::{TestApp, assert_error, spawn_app};

async fn create(app: &TestApp, user_id: i32, event_id: i32) -> serde_json::Value {
    let response = app
        .post_json("/reservation", &json!({ "user_id": user_id, "event_id": event_id }))
        .await;
    assert_eq!(200, response.status().as_u16());
    response.json().await.expect("Response was not JSON")
}

#[tokio::test]
async fn create_reservation_returns_200_and_persists_it() {
    let app = spawn_app().await;

    let body = create(&app, 20, 35).await;

    assert_eq!(body["status"], "OK");
    assert_eq!(body["reservation"]["user_id"], 20);
    assert_eq!(body["reservation"]["event_id"], 35);

    let saved = reservations::Entity::find()
        .all(&app.db)
        .await
        .expect("Failed to fetch saved reservations");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].user_id, 20);
    assert_eq!(saved[0].event_id, 35);
    assert_eq!(body["reservation"]["id"], saved[0].id.to_string());
    assert_eq!(
        body["reservation"]["create_date"],
        saved[0].create_date.format("%m/%d/%Y").to_string()
    );
}

#[tokio::test]
async fn create_reservation_returns_400_for_invalid_payloads() {
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({ "user_id": 20 }), "missing event_id"),
        (json!({ "event_id": 35 }), "missing user_id"),
        (json!({}), "missing both ids"),
        (json!({ "user_id": 0, "event_id": 35 }), "zero user_id"),
        (json!({ "user_id": 20, "event_id": -3 }), "negative event_id"),
        (json!({ "user_id": "twenty", "event_id": 35 }), "non-integer user_id"),
    ];

    for (body, description) in test_cases {
        let response = app.post_json("/reservation", &body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        assert_error(response, 400, "VALIDATION_ERROR").await;
    }

    let stored = reservations::Entity::find()
        .count(&app.db)
        .await
        .expect("Failed to count reservations");
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn list_reservations_applies_the_filters() {
    let app = spawn_app().await;
    create(&app, 20, 35).await;
    create(&app, 20, 36).await;
    create(&app, 21, 35).await;

    let cases = [
        ("/reservation", 3),
        ("/reservation?user_id=20", 2),
        ("/reservation?event_id=35", 2),
        ("/reservation?user_id=21&event_id=35", 1),
        ("/reservation?user_id=99", 0),
    ];
    for (path, expected) in cases {
        let response = app.get(path).await;
        assert_eq!(200, response.status().as_u16());
        let body: serde_json::Value = response.json().await.expect("Response was not JSON");
        assert_eq!(
            body["reservations"].as_array().map(Vec::len),
            Some(expected),
            "unexpected result for {path}"
        );
    }
}

#[tokio::test]
async fn list_reservations_rejects_non_integer_filters() {
    let app = spawn_app().await;

    let response = app.get("/reservation?user_id=abc").await;

    assert_error(response, 400, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn get_reservation_returns_the_stored_record() {
    let app = spawn_app().await;
    let created = create(&app, 20, 35).await;
    let id = created["reservation"]["id"]
        .as_str()
        .expect("Reservation id missing")
        .to_string();

    let response = app.get(&format!("/reservation/{id}")).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_eq!(body["reservation"], created["reservation"]);
}

#[tokio::test]
async fn get_reservation_returns_404_for_unknown_id() {
    let app = spawn_app().await;

    let response = app
        .get(&format!("/reservation/{}", uuid::Uuid::new_v4()))
        .await;

    assert_error(response, 404, "NOT_FOUND").await;
}

#[tokio::test]
async fn get_reservation_returns_400_for_malformed_id() {
    let app = spawn_app().await;

    let response = app.get("/reservation/not-a-uuid").await;

    assert_error(response, 400, "VALIDATION_ERROR").await;
}
