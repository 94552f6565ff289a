//! Channel-backed client callbacks for async callers.

use bytes::Bytes;
use d7amux_engine::{EngineError, SessionResult, TransactionHandle};
use tokio::sync::mpsc;

use crate::callbacks::ClientCallbacks;

/// Callback invocation delivered through a [`ChannelCallbacks`] receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Response {
        handle: TransactionHandle,
        payload: Bytes,
        result: SessionResult,
    },
    Transmitted {
        handle: TransactionHandle,
        outcome: Result<(), EngineError>,
    },
    Unsolicited {
        payload: Bytes,
        result: SessionResult,
    },
}

/// Client that forwards every callback into an unbounded channel.
///
/// Unsolicited data counts as handled while the receiver is alive.
pub struct ChannelCallbacks {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl ChannelCallbacks {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ClientCallbacks for ChannelCallbacks {
    fn on_response(&mut self, handle: TransactionHandle, payload: &[u8], result: &SessionResult) {
        let _ = self.tx.send(ClientEvent::Response {
            handle,
            payload: Bytes::copy_from_slice(payload),
            result: *result,
        });
    }

    fn on_transmitted(&mut self, handle: TransactionHandle, outcome: Result<(), EngineError>) {
        let _ = self.tx.send(ClientEvent::Transmitted { handle, outcome });
    }

    fn on_unsolicited(&mut self, payload: &[u8], result: &SessionResult) -> bool {
        self.tx
            .send(ClientEvent::Unsolicited {
                payload: Bytes::copy_from_slice(payload),
                result: *result,
            })
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use d7amux_engine::{SimOutcome, SimulatedEngine};
    use d7amux_store::MemoryStore;

    use super::*;
    use crate::router::SendMode;
    use crate::stack::Stack;

    #[tokio::test]
    async fn async_send_completes_through_channel() {
        let mut stack = Stack::new(SimulatedEngine::new(), MemoryStore::default());
        stack.init().unwrap();
        let (callbacks, mut rx) = ChannelCallbacks::new();
        let id = stack.register(callbacks);

        stack
            .engine_mut()
            .push_outcome(SimOutcome::Responded(Bytes::from_static(b"pong")));
        let handle = stack
            .send(id, None, b"ping", 4, SendMode::Async)
            .unwrap()
            .unwrap();
        assert_eq!(stack.process_events(), 2);

        match rx.recv().await {
            Some(ClientEvent::Response {
                handle: h, payload, ..
            }) => {
                assert_eq!(h, handle);
                assert_eq!(payload.as_ref(), b"pong");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            rx.recv().await,
            Some(ClientEvent::Transmitted {
                handle,
                outcome: Ok(())
            })
        );
    }

    #[test]
    fn unsolicited_is_declined_once_receiver_is_gone() {
        let (mut callbacks, rx) = ChannelCallbacks::new();
        assert!(callbacks.on_unsolicited(b"cmd", &SessionResult::default()));
        drop(rx);
        assert!(!callbacks.on_unsolicited(b"cmd", &SessionResult::default()));
    }
}
