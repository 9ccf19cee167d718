mod new_reservation;
mod recipient_emails;
mod token_request;

pub use new_reservation::{NewReservation, ReservationPayload};
pub(crate) use new_reservation::positive_id;
pub use recipient_emails::RecipientEmails;
pub use token_request::{TokenContext, TokenRequest, TokenRequestPayload};
