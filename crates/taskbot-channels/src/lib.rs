//! # taskbot-channels
//!
//! Messaging platform integrations for taskbot.

pub mod telegram;
pub mod utils;
