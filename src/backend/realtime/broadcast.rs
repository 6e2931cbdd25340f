/**
 * Presence Broadcasting
 *
 * Presence changes go to every live connection, so they travel on a
 * single `tokio::sync::broadcast` channel that each connection's writer
 * subscribes to. Routed events (messages, receipts, typing) never use
 * this channel; they go through the presence registry.
 */

use crate::shared::ServerEvent;
use tokio::sync::broadcast;

/// Global event broadcast
///
/// ```rust
/// use parley::backend::realtime::RealtimeEventBroadcast;
/// use parley::shared::ServerEvent;
///
/// let (tx, _) = tokio::sync::broadcast::channel::<ServerEvent>(16);
/// let broadcast: RealtimeEventBroadcast = tx;
/// assert_eq!(broadcast.receiver_count(), 0);
/// ```
pub type RealtimeEventBroadcast = broadcast::Sender<ServerEvent>;

/// Broadcast an event to every subscribed connection
///
/// Returns the number of subscribers that received it (0 if none).
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: ServerEvent) -> usize {
    let name = event.name();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!(
                "[Realtime] {} broadcast to {} subscribers",
                name,
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive {}", name);
            0
        }
    }
}
