pub mod api;
pub mod client;
pub mod core;
pub mod dashboard;
pub mod session;
