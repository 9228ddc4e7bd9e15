pub mod connection;
pub mod schema;
pub mod sink;

pub use connection::{make_pool, make_pool_with_size};
pub use schema::load_names;
pub use sink::MySqlSink;
