pub mod chart;
pub mod cli;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod synthesis;
pub mod telemetry;
pub mod view;
