pub mod health_check;
pub mod notification_token;
pub mod reservations;

/// `status` value of every successful response body.
pub const STATUS_OK: &str = "OK";
