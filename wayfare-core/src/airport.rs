use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::AIRPORTS;
use crate::validation::{Validate, ValidationErrors};

/// Row of the `airports` table.
///
/// Coordinates are stored as text exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub id: i32,
    /// Unique across all airports.
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAirport {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
}

impl Airport {
    pub fn to_insertable(&self) -> NewAirport {
        NewAirport {
            code: self.code.clone(),
            name: self.name.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
        }
    }
}

impl NewAirport {
    pub fn into_record(self, id: i32) -> Airport {
        Airport {
            id,
            code: self.code,
            name: self.name,
            city: self.city,
            country: self.country,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl Validate for NewAirport {
    const ENTITY: &'static str = "airport";

    fn check(input: &Value) -> Result<Self, ValidationErrors> {
        AIRPORTS.decode_insert(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;
    use serde_json::json;

    fn jfk() -> Value {
        json!({
            "code": "JFK",
            "name": "John F. Kennedy International Airport",
            "city": "New York",
            "country": "United States",
            "latitude": "40.6413",
            "longitude": "-73.7781"
        })
    }

    #[test]
    fn test_accepts_complete_airport() {
        let airport = NewAirport::validate(&jfk()).unwrap();
        assert_eq!(airport.code, "JFK");
        assert_eq!(airport.latitude, "40.6413");
        assert_eq!(serde_json::to_value(&airport).unwrap(), jfk());
    }

    #[test]
    fn test_coordinates_stay_text() {
        let mut input = jfk();
        input["latitude"] = json!(40.6413);
        let errors = NewAirport::validate(&input).unwrap_err();
        assert_eq!(
            errors.field("latitude").map(|v| &v.kind),
            Some(&ViolationKind::WrongType { expected: "a string", found: "a number" })
        );
    }

    #[test]
    fn test_missing_fields_named() {
        for field in ["code", "name", "city", "country", "latitude", "longitude"] {
            let mut input = jfk();
            input.as_object_mut().unwrap().remove(field);
            let errors = NewAirport::validate(&input).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.violations()[0].path, field);
            assert_eq!(errors.violations()[0].kind, ViolationKind::Missing);
        }
    }

    #[test]
    fn test_record_projection_round_trip() {
        let airport = NewAirport::validate(&jfk()).unwrap().into_record(1);
        assert_eq!(airport.id, 1);

        let projection = airport.to_insertable();
        let json = serde_json::to_value(&projection).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(NewAirport::validate(&json).unwrap(), projection);
    }
}
