// Database service module
// SQLite connection and schema for pricing schemes and their demands

mod connection;
mod schema;

pub use connection::Database;
