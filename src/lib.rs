// src/lib.rs

pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod geocode;
pub mod log;
pub mod present;
pub mod progress;
pub mod resolve;
pub mod scrape;
pub mod specs;
pub mod store;

pub use error::{Error, Result};
