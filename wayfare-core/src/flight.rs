use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::FLIGHTS;
use crate::validation::{Validate, ValidationErrors};

/// Row of the `flights` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: i32,
    pub flight_number: String,
    /// References `airports.id`; not enforced by the schema.
    pub origin_id: i32,
    /// References `airports.id`; not enforced by the schema.
    pub destination_id: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: i32,
    pub seats_available: i32,
    pub aircraft: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub origin_id: i32,
    pub destination_id: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: i32,
    pub seats_available: i32,
    pub aircraft: String,
}

impl Flight {
    pub fn to_insertable(&self) -> NewFlight {
        NewFlight {
            flight_number: self.flight_number.clone(),
            origin_id: self.origin_id,
            destination_id: self.destination_id,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            price: self.price,
            seats_available: self.seats_available,
            aircraft: self.aircraft.clone(),
        }
    }
}

impl NewFlight {
    pub fn into_record(self, id: i32) -> Flight {
        Flight {
            id,
            flight_number: self.flight_number,
            origin_id: self.origin_id,
            destination_id: self.destination_id,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            price: self.price,
            seats_available: self.seats_available,
            aircraft: self.aircraft,
        }
    }
}

impl Validate for NewFlight {
    const ENTITY: &'static str = "flight";

    fn check(input: &Value) -> Result<Self, ValidationErrors> {
        FLIGHTS.decode_insert(input)
    }
}
