use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::BOOKINGS;
use crate::validation::{Validate, ValidationErrors};

/// Row of the `bookings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i32,
    /// References `flights.id`; not enforced by the schema.
    pub flight_id: i32,
    pub passenger_name: String,
    pub email: String,
    pub seat_number: String,
    pub checked_in: bool,
}

/// Insertable booking. `checkedIn` may be omitted and defaults to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub flight_id: i32,
    pub passenger_name: String,
    pub email: String,
    pub seat_number: String,
    #[serde(default)]
    pub checked_in: bool,
}

impl Booking {
    pub fn to_insertable(&self) -> NewBooking {
        NewBooking {
            flight_id: self.flight_id,
            passenger_name: self.passenger_name.clone(),
            email: self.email.clone(),
            seat_number: self.seat_number.clone(),
            checked_in: self.checked_in,
        }
    }
}

impl NewBooking {
    pub fn into_record(self, id: i32) -> Booking {
        Booking {
            id,
            flight_id: self.flight_id,
            passenger_name: self.passenger_name,
            email: self.email,
            seat_number: self.seat_number,
            checked_in: self.checked_in,
        }
    }
}

impl Validate for NewBooking {
    const ENTITY: &'static str = "booking";

    fn check(input: &Value) -> Result<Self, ValidationErrors> {
        BOOKINGS.decode_insert(input)
    }
}
