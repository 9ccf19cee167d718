//! Issuing, refreshing and reading notification tokens.
//!
//! A token is keyed by `(application_id, notification_token_type)`. At steady
//! state exactly one record per key is `ACTIVE`; older ones stay in the table
//! as `INACTIVE` and are never deleted.

mod manager;
mod policy;

pub use manager::{
    IssueMode, IssueOutcome, IssuedToken, TokenLifecycleManager, find_current_token,
    generate_notification_token,
};
pub use policy::TokenPolicy;
