use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tracing::{info, trace, warn};

use remindmark_scheduler::CachedUserDirectory;
use remindmark_types::api::Claims;
use remindmark_types::events::GatewayEvent;
use remindmark_types::models::UserProfile;

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Handle a WebSocket connection whose token was validated at the upgrade.
///
/// Sends `Ready`, records the user's display info for reminder rendering,
/// then forwards every event targeted at this user until the socket closes.
pub async fn handle_connection(
    socket: WebSocket,
    dispatcher: Dispatcher,
    directory: Arc<CachedUserDirectory>,
    claims: Claims,
) {
    let (mut sender, mut receiver) = socket.split();
    let user_id = claims.sub;
    let username = claims.username;

    info!("{} ({}) connected to gateway", username, user_id);

    let profile = UserProfile {
        user_id: user_id.clone(),
        display_name: username.clone(),
        avatar_url: claims.avatar_url,
    };
    if let Err(e) = directory.remember(profile).await {
        warn!("Failed to record profile of {}: {}", user_id, e);
    }

    let ready = GatewayEvent::Ready {
        user_id: user_id.clone(),
        username: username.clone(),
    };
    if send_event(&mut sender, &ready).await.is_err() {
        return;
    }

    let (conn_id, mut user_rx) = dispatcher.register_user_channel(&user_id).await;

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received;

    // Forward targeted events -> client, with heartbeat
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = user_rx.recv() => {
                    let Some(outbound) = result else { break };
                    if send_event(&mut sender, &outbound.event).await.is_err() {
                        break;
                    }
                    if let Some(delivered) = outbound.delivered {
                        let _ = delivered.send(());
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The client only talks heartbeat; anything else is ignored
    let recv_user = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                Message::Text(text) => {
                    let preview: String = text.as_str().chars().take(200).collect();
                    trace!("{} sent unexpected text: {}", recv_user, preview);
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    dispatcher.unregister_user_channel(&user_id, conn_id).await;
    info!("{} ({}) disconnected from gateway", username, user_id);
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &GatewayEvent,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(event).map_err(axum::Error::new)?;
    sender.send(Message::Text(text.into())).await
}
