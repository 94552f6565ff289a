//! Scripted in-memory session engine.
//!
//! Every `send` consumes the next scripted [`SimOutcome`] (or
//! [`SimOutcome::Delivered`] when the script is empty) and queues the
//! matching events. Nothing goes over the air.

use std::collections::VecDeque;

use bytes::Bytes;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::traits::{EngineEvent, SessionEngine};
use crate::types::{ClientId, SessionConfig, SessionResult, TransactionHandle, TxPower};

/// What the simulated engine does with the next send.
#[derive(Debug, Clone, PartialEq)]
pub enum SimOutcome {
    /// Transmission succeeds, no response.
    Delivered,
    /// A response arrives, then the transmission succeeds.
    Responded(Bytes),
    /// Transmission is accepted but finishes with an error.
    Failed(EngineError),
    /// `send` itself fails; no events are queued.
    Rejected(EngineError),
    /// Transmission is accepted but never completes.
    Silent,
}

/// A send observed by the simulated engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SentCommand {
    pub handle: TransactionHandle,
    pub client_id: ClientId,
    pub config: SessionConfig,
    pub payload: Bytes,
    pub expected_response_len: u8,
}

#[derive(Debug, Default)]
pub struct SimulatedEngine {
    running: bool,
    next_handle: u16,
    script: VecDeque<SimOutcome>,
    events: VecDeque<EngineEvent>,
    sent: Vec<SentCommand>,
    result: SessionResult,
    tx_power: Option<TxPower>,
    init_count: usize,
    stop_count: usize,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reception metadata attached to simulated inbound payloads.
    pub fn with_result(mut self, result: SessionResult) -> Self {
        self.result = result;
        self
    }

    /// Script the outcome of a future send.
    pub fn push_outcome(&mut self, outcome: SimOutcome) {
        self.script.push_back(outcome);
    }

    /// Queue an unsolicited command for `client_id`.
    pub fn inject_unsolicited(&mut self, client_id: ClientId, payload: impl Into<Bytes>) {
        self.events.push_back(EngineEvent::Received {
            handle: None,
            client_id,
            payload: payload.into(),
            result: self.result,
        });
    }

    /// Queue a response to `handle` for `client_id`.
    pub fn inject_response(
        &mut self,
        handle: TransactionHandle,
        client_id: ClientId,
        payload: impl Into<Bytes>,
    ) {
        self.events.push_back(EngineEvent::Received {
            handle: Some(handle),
            client_id,
            payload: payload.into(),
            result: self.result,
        });
    }

    /// Sends accepted so far, in order.
    pub fn sent(&self) -> &[SentCommand] {
        &self.sent
    }

    /// Number of events not yet polled.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn init_count(&self) -> usize {
        self.init_count
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn tx_power(&self) -> Option<TxPower> {
        self.tx_power
    }
}

impl SessionEngine for SimulatedEngine {
    fn init(&mut self) -> Result<()> {
        self.running = true;
        self.init_count += 1;
        debug!("simulated engine started");
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
        self.stop_count += 1;
        self.events.clear();
        debug!("simulated engine stopped");
    }

    fn send(
        &mut self,
        client_id: ClientId,
        config: &SessionConfig,
        payload: &[u8],
        expected_response_len: u8,
    ) -> Result<TransactionHandle> {
        if !self.running {
            return Err(EngineError::Stopped);
        }

        let outcome = self.script.pop_front().unwrap_or(SimOutcome::Delivered);
        if let SimOutcome::Rejected(err) = outcome {
            debug!(client_id = client_id.0, error = %err, "simulated send rejected");
            return Err(err);
        }

        let handle = TransactionHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.sent.push(SentCommand {
            handle,
            client_id,
            config: *config,
            payload: Bytes::copy_from_slice(payload),
            expected_response_len,
        });

        match outcome {
            SimOutcome::Delivered => self.push_transmitted(handle, client_id, Ok(())),
            SimOutcome::Responded(response) => {
                self.inject_response(handle, client_id, response);
                self.push_transmitted(handle, client_id, Ok(()));
            }
            SimOutcome::Failed(err) => self.push_transmitted(handle, client_id, Err(err)),
            SimOutcome::Silent | SimOutcome::Rejected(_) => {}
        }

        debug!(
            client_id = client_id.0,
            handle = handle.0,
            len = payload.len(),
            "simulated send accepted"
        );
        Ok(handle)
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }

    fn set_tx_power(&mut self, power: TxPower) {
        self.tx_power = Some(power);
    }
}

impl SimulatedEngine {
    fn push_transmitted(
        &mut self,
        handle: TransactionHandle,
        client_id: ClientId,
        outcome: std::result::Result<(), EngineError>,
    ) {
        self.events.push_back(EngineEvent::Transmitted {
            handle,
            client_id,
            outcome,
        });
    }
}
