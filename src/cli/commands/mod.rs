pub mod attendance;
pub mod auth;
pub mod config;
pub mod db;
pub mod init;
pub mod live;
pub mod log;
pub mod refdata;
pub mod report;
pub mod stats;
pub mod student;
pub mod tap;
