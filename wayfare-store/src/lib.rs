pub mod app_config;
pub mod database;
pub mod schema_check;

pub use app_config::Config;
pub use database::DbClient;
pub use schema_check::SchemaDrift;
