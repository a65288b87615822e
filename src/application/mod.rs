//! Application layer: the settlement calculation engine and the
//! confirmation workflow built on top of it.

pub mod engine;
pub mod service;
