use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kanal::{AsyncReceiver, AsyncSender};
use ocrpanel_core::RequestSink;
use ocrpanel_types::ClientRequest;

/// Outbound requests waiting for the socket writer. Small on purpose:
/// a request that cannot leave promptly is dropped.
const OUTBOUND_CAPACITY: usize = 16;

/// UI side of the realtime channel
#[derive(Clone)]
pub struct ChannelHandle {
    connected: Arc<AtomicBool>,
    outbound: AsyncSender<ClientRequest>,
}

/// Connection side of the realtime channel, held by the socket task
pub(crate) struct ChannelEnds {
    pub connected: Arc<AtomicBool>,
    pub outbound: AsyncReceiver<ClientRequest>,
}

impl ChannelEnds {
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Requests queued for a session that ended never go out
    pub fn discard_pending(&self) -> usize {
        let mut dropped = 0;
        while let Ok(Some(request)) = self.outbound.try_recv() {
            tracing::debug!("Discarding {} queued before disconnect", request.event_name());
            dropped += 1;
        }
        dropped
    }
}

pub(crate) fn pair() -> (ChannelHandle, ChannelEnds) {
    let connected = Arc::new(AtomicBool::new(false));
    let (tx, rx) = kanal::bounded_async(OUTBOUND_CAPACITY);

    (
        ChannelHandle {
            connected: connected.clone(),
            outbound: tx,
        },
        ChannelEnds {
            connected,
            outbound: rx,
        },
    )
}

impl RequestSink for ChannelHandle {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn emit(&self, request: ClientRequest) -> bool {
        if !self.is_connected() {
            tracing::error!("Not connected, dropping {}", request.event_name());
            return false;
        }

        match self.outbound.try_send(request) {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Outbound queue full, dropping {}", request.event_name());
                false
            }
            Err(e) => {
                tracing::error!("Realtime channel closed, dropping {}: {e}", request.event_name());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_while_disconnected_is_dropped() {
        let (handle, ends) = pair();

        assert!(!handle.emit(ClientRequest::RequestScreenshot));
        assert_eq!(ends.outbound.len(), 0);
    }

    #[test]
    fn emit_while_connected_is_queued() {
        let (handle, ends) = pair();
        ends.set_connected(true);

        assert!(handle.emit(ClientRequest::RequestStatus));
        assert!(handle.emit(ClientRequest::RequestOcrResults));
        assert_eq!(ends.outbound.len(), 2);

        ends.set_connected(false);
        assert!(!handle.emit(ClientRequest::RequestStatus));
        assert_eq!(ends.discard_pending(), 2);
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (handle, ends) = pair();
        ends.set_connected(true);

        for _ in 0..OUTBOUND_CAPACITY {
            assert!(handle.emit(ClientRequest::RequestStatus));
        }
        assert!(!handle.emit(ClientRequest::RequestStatus));
    }
}
