#![warn(missing_docs)]
//! Doorwatch is a polling client for a home-security detection endpoint: it
//! maintains a bounded, newest-first buffer of recent alerts and drives push
//! notification delivery for newly detected events.

pub mod config;
pub mod detection;
pub mod http_client;
pub mod models;
pub mod notification;
pub mod pipeline;
pub mod registration;
pub mod test_helpers;
