pub mod changes;
pub mod db_utils;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod reference;
pub mod stats;
pub mod students;
pub mod users;
