use std::time::Duration;

use crate::configuration::TokenSettings;
use crate::entities::notification_tokens::NotificationTokenType;

#[derive(Debug, Clone)]
pub struct TokenPolicy {
    /// Lifetime granted on reuse, and to new offer tokens.
    pub renewal: chrono::Duration,
    /// Lifetime of a newly inserted token of any other type.
    pub enrollment: chrono::Duration,
    pub dispatch_timeout: Duration,
    pub portal_base_url: String,
}

impl TokenPolicy {
    pub fn from_settings(settings: &TokenSettings) -> Self {
        Self {
            renewal: chrono::Duration::hours(settings.renewal_hours),
            enrollment: chrono::Duration::hours(settings.enrollment_hours),
            dispatch_timeout: Duration::from_millis(settings.dispatch_timeout_milliseconds),
            portal_base_url: settings.portal_base_url.clone(),
        }
    }

    pub fn issuance_offset(&self, token_type: NotificationTokenType) -> chrono::Duration {
        match token_type {
            NotificationTokenType::OfferToken => self.renewal,
            _ => self.enrollment,
        }
    }

    pub fn link_for(&self, token: &str) -> String {
        format!("{}?token={}", self.portal_base_url.trim_end_matches('/'), token)
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            renewal: chrono::Duration::hours(9),
            enrollment: chrono::Duration::hours(10),
            dispatch_timeout: Duration::from_secs(5),
            portal_base_url: "http://localhost:3000/notification".to_string(),
        }
    }
}
