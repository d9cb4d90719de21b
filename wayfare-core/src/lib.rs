pub mod airport;
pub mod booking;
pub mod flight;
pub mod schema;
pub mod search;
pub mod validation;

pub use airport::{Airport, NewAirport};
pub use booking::{Booking, NewBooking};
pub use flight::{Flight, NewFlight};
pub use schema::{Column, ColumnType, Table, AIRPORTS, BOOKINGS, FLIGHTS, TABLES};
pub use search::{CabinClass, FlightSearch, TripType};
pub use validation::{FieldViolation, Validate, ValidationErrors, ViolationKind};
