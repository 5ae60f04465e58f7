//! Configuration and shared data types.

pub mod config;
pub mod models;
