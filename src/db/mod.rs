mod schema;
pub mod sqlite;

pub use sqlite::{Database, InsertReport, ResultSet, TableStats};
