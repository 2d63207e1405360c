use std::time::Duration;

use async_trait::async_trait;

use remindmark_scheduler::{DeliveryError, Notifier};
use remindmark_types::events::{GatewayEvent, Notification};

use crate::dispatcher::Dispatcher;

/// How long to wait for the socket write before giving up on a delivery.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers notifications as direct messages over the gateway.
#[async_trait]
impl Notifier for Dispatcher {
    async fn notify_user(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> Result<(), DeliveryError> {
        let ack = self
            .send_to_user(user_id, GatewayEvent::DirectMessage(notification.clone()))
            .await?;

        match tokio::time::timeout(DELIVERY_TIMEOUT, ack).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(DeliveryError::ConnectionClosed(user_id.to_string())),
            Err(_) => Err(DeliveryError::TimedOut(user_id.to_string())),
        }
    }
}
