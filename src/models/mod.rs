pub mod attendance;
pub mod reference;
pub mod status;
pub mod student;
pub mod user;
