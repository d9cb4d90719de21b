use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{FieldReader, Validate, ValidationErrors, ViolationKind};

pub const MIN_PASSENGERS: i64 = 1;
pub const MAX_PASSENGERS: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "roundtrip")]
    RoundTrip,
    #[serde(rename = "oneway")]
    OneWay,
}

impl TripType {
    pub const ALL: [TripType; 2] = [TripType::RoundTrip, TripType::OneWay];
    pub const NAMES: &'static [&'static str] = &["roundtrip", "oneway"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::RoundTrip => "roundtrip",
            TripType::OneWay => "oneway",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripType {
    type Err = ViolationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ViolationKind::NotOneOf { allowed: Self::NAMES })
    }
}

/// Fare category requested by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub const ALL: [CabinClass; 4] = [
        CabinClass::Economy,
        CabinClass::PremiumEconomy,
        CabinClass::Business,
        CabinClass::First,
    ];
    pub const NAMES: &'static [&'static str] = &["economy", "premium_economy", "business", "first"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CabinClass {
    type Err = ViolationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(ViolationKind::NotOneOf { allowed: Self::NAMES })
    }
}

/// Flight search request. Dates are kept as the client sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub passengers: u8,
    pub trip_type: TripType,
    pub cabin_class: CabinClass,
}

impl FlightSearch {
    pub fn is_round_trip(&self) -> bool {
        self.trip_type == TripType::RoundTrip
    }
}

impl Validate for FlightSearch {
    const ENTITY: &'static str = "flight_search";

    fn check(input: &Value) -> Result<Self, ValidationErrors> {
        let mut fields = FieldReader::object(input)?;

        let origin = fields.non_empty_string("origin");
        let destination = fields.non_empty_string("destination");
        let departure_date = fields.non_empty_string("departureDate");
        let return_date = fields.optional_string("returnDate");
        let passengers = fields
            .integer_between("passengers", MIN_PASSENGERS, MAX_PASSENGERS)
            .and_then(|n| u8::try_from(n).ok());
        let trip_type = fields.one_of::<TripType>("tripType");
        let cabin_class = fields.one_of::<CabinClass>("cabinClass");

        match (
            origin,
            destination,
            departure_date,
            return_date,
            passengers,
            trip_type,
            cabin_class,
        ) {
            (
                Some(origin),
                Some(destination),
                Some(departure_date),
                Ok(return_date),
                Some(passengers),
                Some(trip_type),
                Some(cabin_class),
            ) => Ok(FlightSearch {
                origin,
                destination,
                departure_date,
                return_date,
                passengers,
                trip_type,
                cabin_class,
            }),
            _ => Err(fields.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one_way() -> Value {
        json!({
            "origin": "JFK",
            "destination": "LAX",
            "departureDate": "2024-06-01",
            "passengers": 1,
            "tripType": "oneway",
            "cabinClass": "economy"
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut input = one_way();
        input[field] = value;
        input
    }

    #[test]
    fn test_one_way_search() {
        let search = FlightSearch::validate(&one_way()).expect("valid search");
        assert_eq!(search.origin, "JFK");
        assert_eq!(search.destination, "LAX");
        assert_eq!(search.departure_date, "2024-06-01");
        assert_eq!(search.return_date, None);
        assert_eq!(search.passengers, 1);
        assert_eq!(search.trip_type, TripType::OneWay);
        assert_eq!(search.cabin_class, CabinClass::Economy);
        assert!(!search.is_round_trip());
    }

    #[test]
    fn test_passenger_bounds() {
        let errors = FlightSearch::validate(&with("passengers", json!(0))).unwrap_err();
        assert_eq!(
            errors.field("passengers").map(|v| &v.kind),
            Some(&ViolationKind::TooSmall { min: 1 })
        );

        let errors = FlightSearch::validate(&with("passengers", json!(10))).unwrap_err();
        assert_eq!(errors.field("passengers").unwrap().to_string(), "passengers must be at most 9");

        let search = FlightSearch::validate(&with("passengers", json!(9))).unwrap();
        assert_eq!(search.passengers, 9);
    }

    #[test]
    fn test_passengers_must_be_integer() {
        let errors = FlightSearch::validate(&with("passengers", json!(2.5))).unwrap_err();
        assert_eq!(
            errors.field("passengers").map(|v| &v.kind),
            Some(&ViolationKind::NotInteger)
        );

        let errors = FlightSearch::validate(&with("passengers", json!("2"))).unwrap_err();
        assert_eq!(errors.field("passengers").unwrap().kind.code(), "wrong_type");

        let errors = FlightSearch::validate(&with("passengers", json!(-3))).unwrap_err();
        assert_eq!(errors.field("passengers").unwrap().kind.code(), "too_small");
    }

    #[test]
    fn test_whole_number_floats_count_as_integers() {
        let search = FlightSearch::validate_json(
            r#"{"origin":"JFK","destination":"LAX","departureDate":"2024-06-01",
                "passengers":2.0,"tripType":"oneway","cabinClass":"economy"}"#,
        )
        .unwrap();
        assert_eq!(search.passengers, 2);

        let errors = FlightSearch::validate_json(
            r#"{"origin":"JFK","destination":"LAX","departureDate":"2024-06-01",
                "passengers":-99999999999999999999,"tripType":"oneway","cabinClass":"economy"}"#,
        )
        .unwrap_err();
        assert_eq!(
            errors.field("passengers").map(|v| &v.kind),
            Some(&ViolationKind::TooSmall { min: 1 })
        );

        let errors = FlightSearch::validate_json(
            r#"{"origin":"JFK","destination":"LAX","departureDate":"2024-06-01",
                "passengers":99999999999999999999,"tripType":"oneway","cabinClass":"economy"}"#,
        )
        .unwrap_err();
        assert_eq!(
            errors.field("passengers").map(|v| &v.kind),
            Some(&ViolationKind::TooLarge { max: 9 })
        );
    }

    #[test]
    fn test_trip_type_membership() {
        let errors = FlightSearch::validate(&with("tripType", json!("return"))).unwrap_err();
        assert_eq!(
            errors.field("tripType").unwrap().to_string(),
            "tripType must be one of roundtrip, oneway"
        );

        let errors = FlightSearch::validate(&with("tripType", json!("ONEWAY"))).unwrap_err();
        assert!(errors.contains_field("tripType"));
    }

    #[test]
    fn test_cabin_classes() {
        for cabin in CabinClass::NAMES {
            let search = FlightSearch::validate(&with("cabinClass", json!(cabin))).unwrap();
            assert_eq!(search.cabin_class.as_str(), *cabin);
        }

        let errors = FlightSearch::validate(&with("cabinClass", json!("premium"))).unwrap_err();
        assert_eq!(errors.field("cabinClass").unwrap().kind.code(), "not_one_of");
    }

    #[test]
    fn test_return_date() {
        let mut input = with("tripType", json!("roundtrip"));
        input["returnDate"] = json!("2024-06-08");
        let search = FlightSearch::validate(&input).unwrap();
        assert_eq!(search.return_date.as_deref(), Some("2024-06-08"));
        assert!(search.is_round_trip());

        let errors = FlightSearch::validate(&with("returnDate", json!(20240608))).unwrap_err();
        assert_eq!(errors.field("returnDate").unwrap().kind.code(), "wrong_type");

        let errors = FlightSearch::validate(&with("returnDate", Value::Null)).unwrap_err();
        assert!(errors.contains_field("returnDate"));
    }

    #[test]
    fn test_required_strings() {
        let errors = FlightSearch::validate(&with("origin", json!(""))).unwrap_err();
        assert_eq!(errors.field("origin").map(|v| &v.kind), Some(&ViolationKind::Empty));

        let mut input = one_way();
        input.as_object_mut().unwrap().remove("departureDate");
        let errors = FlightSearch::validate(&input).unwrap_err();
        assert_eq!(
            errors.field("departureDate").map(|v| &v.kind),
            Some(&ViolationKind::Missing)
        );
    }

    #[test]
    fn test_every_bad_field_reported() {
        let errors = FlightSearch::validate(&json!({
            "origin": 1,
            "passengers": 0,
            "tripType": "return",
            "cabinClass": "coach"
        }))
        .unwrap_err();

        for field in ["origin", "destination", "departureDate", "passengers", "tripType", "cabinClass"] {
            assert!(errors.contains_field(field), "{field}");
        }
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let search = FlightSearch::validate(&one_way()).unwrap();
        assert_eq!(serde_json::to_value(&search).unwrap(), one_way());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("premium_economy".parse::<CabinClass>(), Ok(CabinClass::PremiumEconomy));
        assert_eq!("roundtrip".parse::<TripType>(), Ok(TripType::RoundTrip));
        assert_eq!(TripType::OneWay.to_string(), "oneway");
        assert!("round_trip".parse::<TripType>().is_err());
    }
}
