use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc, oneshot};
use uuid::Uuid;

use remindmark_scheduler::DeliveryError;
use remindmark_types::events::GatewayEvent;

/// An event queued for one connection. `delivered` fires once the frame
/// has been written to the socket.
pub struct Outbound {
    pub event: GatewayEvent,
    pub delivered: Option<oneshot::Sender<()>>,
}

type UserChannel = (Uuid, mpsc::UnboundedSender<Outbound>);

/// Routes targeted events to connected users.
#[derive(Clone, Default)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

#[derive(Default)]
struct DispatcherInner {
    /// Per-user targeted send channels: user_id -> (conn_id, sender)
    user_channels: RwLock<HashMap<String, UserChannel>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a per-user targeted channel. A newer connection replaces an
    /// older one. Returns (conn_id, receiver).
    pub async fn register_user_channel(
        &self,
        user_id: &str,
    ) -> (Uuid, mpsc::UnboundedReceiver<Outbound>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .user_channels
            .write()
            .await
            .insert(user_id.to_string(), (conn_id, tx));
        (conn_id, rx)
    }

    /// Unregister a per-user targeted channel, but only if conn_id matches.
    pub async fn unregister_user_channel(&self, user_id: &str, conn_id: Uuid) {
        let mut channels = self.inner.user_channels.write().await;
        if channels
            .get(user_id)
            .is_some_and(|(stored_conn_id, _)| *stored_conn_id == conn_id)
        {
            channels.remove(user_id);
        }
    }

    /// Queue an event for a user. The returned receiver resolves once the
    /// event reached the socket, and errors if the connection went away first.
    pub async fn send_to_user(
        &self,
        user_id: &str,
        event: GatewayEvent,
    ) -> Result<oneshot::Receiver<()>, DeliveryError> {
        let channels = self.inner.user_channels.read().await;
        let (_, tx) = channels
            .get(user_id)
            .ok_or_else(|| DeliveryError::NotConnected(user_id.to_string()))?;

        let (ack_tx, ack_rx) = oneshot::channel();
        tx.send(Outbound {
            event,
            delivered: Some(ack_tx),
        })
        .map_err(|_| DeliveryError::ConnectionClosed(user_id.to_string()))?;
        Ok(ack_rx)
    }
}
