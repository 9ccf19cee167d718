pub mod application_registry;
pub mod configuration;
pub mod data_service;
pub mod domain;
pub mod email_client;
pub mod entities;
pub mod error;
pub mod notification_token;
pub mod routes;
pub mod startup;
pub mod telemetry;

#[cfg(test)]
mod test_support;
