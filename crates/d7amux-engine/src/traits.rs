use bytes::Bytes;

use crate::error::{EngineError, Result};
use crate::types::{ClientId, SessionConfig, SessionResult, TransactionHandle, TxPower};

/// Outcome reported by the engine, tagged with the client it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Inbound payload. `handle` is set when it answers one of the client's
    /// own transactions, and `None` for an unsolicited command.
    Received {
        handle: Option<TransactionHandle>,
        client_id: ClientId,
        payload: Bytes,
        result: SessionResult,
    },
    /// A client-initiated send is finished, successfully or not.
    Transmitted {
        handle: TransactionHandle,
        client_id: ClientId,
        outcome: std::result::Result<(), EngineError>,
    },
}

impl EngineEvent {
    /// Client the event is addressed to.
    pub fn client_id(&self) -> ClientId {
        match self {
            EngineEvent::Received { client_id, .. } | EngineEvent::Transmitted { client_id, .. } => {
                *client_id
            }
        }
    }
}

/// The radio/session engine underneath the multiplexing layer.
///
/// The engine owns framing, channel access and retransmission. Completions
/// are pulled with [`poll_event`](SessionEngine::poll_event) and delivered
/// serially by the caller; the engine must produce exactly one
/// [`EngineEvent::Transmitted`] for every handle it returns from `send`.
pub trait SessionEngine {
    /// Start the engine.
    fn init(&mut self) -> Result<()>;

    /// Stop the engine. In-flight transactions are abandoned.
    fn stop(&mut self);

    /// Start a transaction on behalf of `client_id`.
    fn send(
        &mut self,
        client_id: ClientId,
        config: &SessionConfig,
        payload: &[u8],
        expected_response_len: u8,
    ) -> Result<TransactionHandle>;

    /// Next pending completion, if any.
    fn poll_event(&mut self) -> Option<EngineEvent>;

    /// Set the radio transmit power.
    fn set_tx_power(&mut self, power: TxPower) {
        let _ = power;
    }
}

impl<E: SessionEngine + ?Sized> SessionEngine for Box<E> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn send(
        &mut self,
        client_id: ClientId,
        config: &SessionConfig,
        payload: &[u8],
        expected_response_len: u8,
    ) -> Result<TransactionHandle> {
        (**self).send(client_id, config, payload, expected_response_len)
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        (**self).poll_event()
    }

    fn set_tx_power(&mut self, power: TxPower) {
        (**self).set_tx_power(power)
    }
}
