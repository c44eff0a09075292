//! Infrastructure: SQLite connection, migrations, row conversions.

pub mod db;

pub(crate) use db::get_connection;
pub use db::{init_db, init_memory_db, DbPool};
