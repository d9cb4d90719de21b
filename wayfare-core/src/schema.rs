//! Table definitions for the booking database.
//!
//! Each table is declared once as a constant. The same declaration drives
//! the insert validators, the generated DDL and the drift check in
//! `wayfare-store`, so a column added here shows up everywhere.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::validation::{
    expect_bool, expect_i32, expect_string, expect_timestamp, json_kind, FieldViolation,
    ValidationErrors, ViolationKind, ROOT_PATH,
};

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing integer assigned by the database.
    Serial,
    Text,
    Integer,
    /// Timestamp without time zone.
    Timestamp,
    Boolean,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Serial => "serial",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Boolean => "boolean",
        }
    }

    /// Name Postgres reports in `information_schema.columns.data_type`.
    pub fn information_schema_type(&self) -> &'static str {
        match self {
            ColumnType::Serial | ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Timestamp => "timestamp without time zone",
            ColumnType::Boolean => "boolean",
        }
    }

    /// Checks a JSON value against this column type and returns its
    /// normalized form.
    pub fn check(&self, value: &Value) -> Result<Value, ViolationKind> {
        match self {
            ColumnType::Text => expect_string(value).map(|s| Value::String(s.to_string())),
            ColumnType::Serial | ColumnType::Integer => expect_i32(value).map(Value::from),
            ColumnType::Boolean => expect_bool(value).map(Value::Bool),
            ColumnType::Timestamp => expect_timestamp(value)
                .map(|ts| Value::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        }
    }
}

/// Value a column takes when an insert omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    Bool(bool),
}

impl ColumnDefault {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnDefault::Bool(true) => "true",
            ColumnDefault::Bool(false) => "false",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ColumnDefault::Bool(b) => Value::Bool(*b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name on the JSON side (camelCase).
    pub field: &'static str,
    /// Column name in the database (snake_case).
    pub name: &'static str,
    pub ty: ColumnType,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
    pub default: Option<ColumnDefault>,
}

impl Column {
    pub const fn new(field: &'static str, name: &'static str, ty: ColumnType) -> Self {
        Self {
            field,
            name,
            ty,
            primary_key: false,
            unique: false,
            not_null: false,
            default: None,
        }
    }

    pub const fn primary_key(self) -> Self {
        Self { primary_key: true, not_null: true, ..self }
    }

    pub const fn not_null(self) -> Self {
        Self { not_null: true, ..self }
    }

    pub const fn unique(self) -> Self {
        Self { unique: true, ..self }
    }

    pub const fn default_bool(self, value: bool) -> Self {
        Self { default: Some(ColumnDefault::Bool(value)), ..self }
    }

    /// Generated columns are filled in by the database and never accepted
    /// from clients.
    pub fn is_generated(&self) -> bool {
        matches!(self.ty, ColumnType::Serial)
    }

    /// Column clause as it appears inside `CREATE TABLE`.
    pub fn definition(&self) -> String {
        let mut def = format!("{} {}", self.name, self.ty.sql());
        if self.primary_key {
            def.push_str(" PRIMARY KEY");
        } else if self.not_null {
            def.push_str(" NOT NULL");
        }
        if self.unique {
            def.push_str(" UNIQUE");
        }
        if let Some(default) = self.default {
            def.push_str(" DEFAULT ");
            def.push_str(default.sql());
        }
        def
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn insertable_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(|c| !c.is_generated())
    }

    pub fn create_sql(&self) -> String {
        let defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("    {}", c.definition()))
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
            self.name,
            defs.join(",\n")
        )
    }

    /// Checks a candidate insert against the insertable columns.
    ///
    /// Every violation is collected. Omitted columns with a default take
    /// that default; unknown fields and generated columns are dropped.
    pub fn validate_insert(&self, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let fields = input.as_object().ok_or_else(|| {
            ValidationErrors::single(
                ROOT_PATH,
                ViolationKind::WrongType {
                    expected: "an object",
                    found: json_kind(input),
                },
            )
        })?;

        let mut accepted = Map::new();
        let mut violations = Vec::new();

        for column in self.insertable_columns() {
            match fields.get(column.field) {
                None => match column.default {
                    Some(default) => {
                        accepted.insert(column.field.to_string(), default.to_json());
                    }
                    None => {
                        violations.push(FieldViolation::new(column.field, ViolationKind::Missing));
                    }
                },
                Some(value) => match column.ty.check(value) {
                    Ok(normalized) => {
                        accepted.insert(column.field.to_string(), normalized);
                    }
                    Err(kind) => violations.push(FieldViolation::new(column.field, kind)),
                },
            }
        }

        if violations.is_empty() {
            Ok(accepted)
        } else {
            Err(ValidationErrors::new(violations))
        }
    }

    /// Validates an insert and decodes the accepted fields into `T`.
    pub fn decode_insert<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationErrors> {
        let accepted = self.validate_insert(input)?;
        serde_json::from_value(Value::Object(accepted))
            .map_err(|e| ValidationErrors::single(ROOT_PATH, ViolationKind::Malformed(e.to_string())))
    }
}

pub const AIRPORTS: Table = Table {
    name: "airports",
    columns: &[
        Column::new("id", "id", ColumnType::Serial).primary_key(),
        Column::new("code", "code", ColumnType::Text).not_null().unique(),
        Column::new("name", "name", ColumnType::Text).not_null(),
        Column::new("city", "city", ColumnType::Text).not_null(),
        Column::new("country", "country", ColumnType::Text).not_null(),
        Column::new("latitude", "latitude", ColumnType::Text).not_null(),
        Column::new("longitude", "longitude", ColumnType::Text).not_null(),
    ],
};

// origin_id and destination_id point at airports.id, flight_id at flights.id.
// No foreign keys are declared; integrity is left to the write paths.
pub const FLIGHTS: Table = Table {
    name: "flights",
    columns: &[
        Column::new("id", "id", ColumnType::Serial).primary_key(),
        Column::new("flightNumber", "flight_number", ColumnType::Text).not_null(),
        Column::new("originId", "origin_id", ColumnType::Integer).not_null(),
        Column::new("destinationId", "destination_id", ColumnType::Integer).not_null(),
        Column::new("departureTime", "departure_time", ColumnType::Timestamp).not_null(),
        Column::new("arrivalTime", "arrival_time", ColumnType::Timestamp).not_null(),
        Column::new("price", "price", ColumnType::Integer).not_null(),
        Column::new("seatsAvailable", "seats_available", ColumnType::Integer).not_null(),
        Column::new("aircraft", "aircraft", ColumnType::Text).not_null(),
    ],
};

pub const BOOKINGS: Table = Table {
    name: "bookings",
    columns: &[
        Column::new("id", "id", ColumnType::Serial).primary_key(),
        Column::new("flightId", "flight_id", ColumnType::Integer).not_null(),
        Column::new("passengerName", "passenger_name", ColumnType::Text).not_null(),
        Column::new("email", "email", ColumnType::Text).not_null(),
        Column::new("seatNumber", "seat_number", ColumnType::Text).not_null(),
        Column::new("checkedIn", "checked_in", ColumnType::Boolean)
            .not_null()
            .default_bool(false),
    ],
};

pub const TABLES: [&Table; 3] = [&AIRPORTS, &FLIGHTS, &BOOKINGS];
