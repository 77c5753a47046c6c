//! Push-relay implementation of the [`AlertNotifier`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use super::{AlertNotifier, DispatchError, build_push_message};
use crate::models::Alert;

/// Delivers push notifications through an Expo-compatible push relay.
///
/// The relay's response body is not parsed; only transport success is
/// checked.
pub struct ExpoPushNotifier {
    /// URL of the push relay's send endpoint.
    endpoint: Url,
    /// Configured HTTP client with retry middleware.
    client: Arc<ClientWithMiddleware>,
}

impl ExpoPushNotifier {
    /// Creates a new `ExpoPushNotifier` targeting the given relay endpoint.
    pub fn new(endpoint: Url, client: Arc<ClientWithMiddleware>) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl AlertNotifier for ExpoPushNotifier {
    async fn dispatch(&self, alert: &Alert, device_token: &str) -> Result<(), DispatchError> {
        let message = build_push_message(alert, device_token);
        let response =
            self.client.post(self.endpoint.clone()).json(&message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Http(status));
        }

        tracing::debug!(subject = %alert.subject, "Push notification dispatched.");
        Ok(())
    }
}
