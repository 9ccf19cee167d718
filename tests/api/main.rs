mod bank_enrollment_update;
mod offer_token;
mod reservations;
