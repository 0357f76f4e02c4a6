pub mod app;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod job;
pub mod scratch;
pub mod telemetry;
pub mod upload;
pub mod utils;
pub mod validate;
