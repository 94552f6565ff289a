use std::sync::{Arc, Mutex};

use bytes::Bytes;
use d7amux_engine::{EngineError, TransactionHandle};

use crate::status::InterfaceStatus;

/// Receiver of interface traffic on the application-layer side.
pub trait AlpSink: Send {
    /// A response to an application-layer command arrived.
    fn received_response(
        &mut self,
        handle: TransactionHandle,
        payload: &[u8],
        status: &InterfaceStatus,
    );

    /// An unsolicited command arrived on `itf_id`. Returns whether it was handled.
    fn process_command(&mut self, payload: &[u8], itf_id: u8, status: &InterfaceStatus) -> bool;

    /// An application-layer command finished.
    fn command_completed(
        &mut self,
        handle: TransactionHandle,
        outcome: Result<(), EngineError>,
    );
}

/// Event observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Response {
        handle: TransactionHandle,
        payload: Bytes,
        status: InterfaceStatus,
    },
    Command {
        payload: Bytes,
        itf_id: u8,
        status: InterfaceStatus,
    },
    Completed {
        handle: TransactionHandle,
        outcome: Result<(), EngineError>,
    },
}

/// Sink that records every event. Clones share the same log.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
    accept_commands: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            accept_commands: true,
        }
    }

    /// Value returned from `process_command`.
    pub fn accept_commands(mut self, accept: bool) -> Self {
        self.accept_commands = accept;
        self
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: SinkEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AlpSink for RecordingSink {
    fn received_response(
        &mut self,
        handle: TransactionHandle,
        payload: &[u8],
        status: &InterfaceStatus,
    ) {
        self.push(SinkEvent::Response {
            handle,
            payload: Bytes::copy_from_slice(payload),
            status: *status,
        });
    }

    fn process_command(&mut self, payload: &[u8], itf_id: u8, status: &InterfaceStatus) -> bool {
        self.push(SinkEvent::Command {
            payload: Bytes::copy_from_slice(payload),
            itf_id,
            status: *status,
        });
        self.accept_commands
    }

    fn command_completed(
        &mut self,
        handle: TransactionHandle,
        outcome: Result<(), EngineError>,
    ) {
        self.push(SinkEvent::Completed { handle, outcome });
    }
}
