//! # taskbot-core
//!
//! Core types, traits, configuration, and error handling for taskbot.

pub mod config;
pub mod dialog;
pub mod error;
pub mod message;
pub mod traits;

pub use config::shellexpand;
