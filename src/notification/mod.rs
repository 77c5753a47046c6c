//! # Notification Service
//!
//! This module is responsible for delivering push notifications for newly
//! admitted alerts. The [`AlertNotifier`] trait abstracts the push relay so
//! the scheduler can be tested without network access; the
//! [`ExpoPushNotifier`] is the production implementation targeting an
//! Expo-compatible relay.
//!
//! Dispatch failure is deliberately non-fatal to the pipeline: a failed
//! push is logged and surfaced in the pipeline status, but never blocks
//! buffer admission or the next poll cycle.

pub mod error;
mod payload;
mod push;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

pub use error::DispatchError;
pub use payload::build_push_message;
pub use push::ExpoPushNotifier;

use crate::models::Alert;

/// A trait for a service that can deliver a push notification for an alert.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    /// Delivers a push notification for `alert` to the device identified by
    /// `device_token`.
    async fn dispatch(&self, alert: &Alert, device_token: &str) -> Result<(), DispatchError>;
}
