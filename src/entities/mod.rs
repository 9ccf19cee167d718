pub mod notification_tokens;
pub mod reservations;
