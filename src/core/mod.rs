pub mod app;
pub mod config;
pub mod knowledge;
pub mod message;
pub mod session;
pub mod transport;
