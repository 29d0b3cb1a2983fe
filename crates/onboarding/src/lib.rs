pub mod config;
pub mod error;
pub mod form;
pub mod intake;
pub mod telemetry;
