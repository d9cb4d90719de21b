//! Compares the declared tables against what the database reports.

use wayfare_core::schema::Table;

/// One row of `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LiveColumn {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
}

impl LiveColumn {
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("YES")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaDrift {
    #[error("table {table} does not exist")]
    MissingTable { table: &'static str },

    #[error("column {table}.{column} does not exist")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("column {table}.{column} has type {found}, expected {expected}")]
    TypeMismatch {
        table: &'static str,
        column: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("column {table}.{column} nullability differs: declared NOT NULL = {declared_not_null}")]
    NullabilityMismatch {
        table: &'static str,
        column: &'static str,
        declared_not_null: bool,
    },
}

/// Columns present in the database but not declared are not reported.
pub fn diff_table(table: &Table, live: &[LiveColumn]) -> Vec<SchemaDrift> {
    if live.is_empty() {
        return vec![SchemaDrift::MissingTable { table: table.name }];
    }

    let mut drift = Vec::new();
    for column in table.columns {
        let Some(found) = live.iter().find(|l| l.column_name == column.name) else {
            drift.push(SchemaDrift::MissingColumn {
                table: table.name,
                column: column.name,
            });
            continue;
        };

        let expected = column.ty.information_schema_type();
        if found.data_type != expected {
            drift.push(SchemaDrift::TypeMismatch {
                table: table.name,
                column: column.name,
                expected,
                found: found.data_type.clone(),
            });
        }

        if found.nullable() == column.not_null {
            drift.push(SchemaDrift::NullabilityMismatch {
                table: table.name,
                column: column.name,
                declared_not_null: column.not_null,
            });
        }
    }
    drift
}
