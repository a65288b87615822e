pub mod config;
pub mod ports;
pub mod settlement;
