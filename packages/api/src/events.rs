//! Event subscription for observers.

use actors::{DispatchError, DispatcherMessage, global_registry};
use grading_core::JobEvent;
use tokio::sync::broadcast;

/// Subscribe to the dispatcher's event stream.
///
/// The channel is lossy broadcast: a slow reader misses events instead of
/// backpressuring the dispatcher. Pollers should not depend on it.
pub fn subscribe_events() -> Result<broadcast::Receiver<JobEvent>, DispatchError> {
    let dispatcher = global_registry().get().ok_or(DispatchError::NotRunning)?;

    let (sender, receiver) = broadcast::channel(1024);
    dispatcher
        .send_message(DispatcherMessage::Subscribe { sender })
        .map_err(|e| DispatchError::Mailbox(e.to_string()))?;

    Ok(receiver)
}
