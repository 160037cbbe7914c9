pub mod deletion;
pub mod role;
pub mod session;
pub mod user;
