pub mod attendance;
pub mod auth;
pub mod config;
pub mod log;
pub mod refdata;
pub mod report;
pub mod session;
pub mod students;
pub mod tap;
