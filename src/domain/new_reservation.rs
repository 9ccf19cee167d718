#[derive(serde::Deserialize, Debug, Default)]
pub struct ReservationPayload {
    pub user_id: Option<i32>,
    pub event_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReservation {
    pub user_id: i32,
    pub event_id: i32,
}

impl TryFrom<ReservationPayload> for NewReservation {
    type Error = String;

    fn try_from(payload: ReservationPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: positive_id("user_id", payload.user_id)?,
            event_id: positive_id("event_id", payload.event_id)?,
        })
    }
}

pub(crate) fn positive_id(field: &str, value: Option<i32>) -> Result<i32, String> {
    match value {
        None => Err(format!("{field} is required")),
        Some(v) if v <= 0 => Err(format!("{field} must be a positive integer")),
        Some(v) => Ok(v),
    }
}
