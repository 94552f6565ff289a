use d7amux_engine::{
    ClientId, EngineError, EngineEvent, SessionConfig, SessionEngine, SessionResult,
    TransactionHandle,
};
use d7amux_store::DeviceStore;
use tracing::{debug, warn};

use crate::error::{Result, StackError};
use crate::lifecycle::LifecycleState;
use crate::stack::Stack;

/// How [`Stack::send`] waits for the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendMode {
    /// Return once the engine reports the transaction finished.
    #[default]
    Sync,
    /// Return the handle as soon as the engine accepts the send.
    Async,
}

impl<E: SessionEngine, S: DeviceStore, const N: usize> Stack<E, S, N> {
    /// Send `payload` on behalf of `client_id`.
    ///
    /// `config` of `None` uses the active session configuration. In
    /// [`SendMode::Async`] the handle is returned immediately and completion
    /// arrives through the client's `on_transmitted`. In [`SendMode::Sync`]
    /// engine events are dispatched until this transaction finishes, and
    /// `Ok(None)` means it succeeded.
    pub fn send(
        &mut self,
        client_id: ClientId,
        config: Option<&SessionConfig>,
        payload: &[u8],
        expected_response_len: u8,
        mode: SendMode,
    ) -> Result<Option<TransactionHandle>> {
        if self.state != LifecycleState::Initialized {
            return Err(StackError::NotInitialized);
        }
        if !self.registry.contains(client_id) {
            warn!(client_id = client_id.0, "send from unregistered client");
            return Err(StackError::InvalidClient(client_id));
        }

        let config = match config {
            Some(config) => *config,
            None => self.active_session_config()?,
        };
        let max = self.budget.max_payload(config.addressee.nls_method);
        if payload.len() > max {
            return Err(StackError::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }

        let handle = self
            .engine
            .send(client_id, &config, payload, expected_response_len)
            .inspect_err(|err| {
                warn!(client_id = client_id.0, error = %err, "engine rejected send");
            })?;
        debug!(
            client_id = client_id.0,
            handle = handle.0,
            len = payload.len(),
            ?mode,
            "send forwarded"
        );

        match mode {
            SendMode::Async => Ok(Some(handle)),
            SendMode::Sync => {
                self.wait_for_completion(handle, client_id)?;
                Ok(None)
            }
        }
    }

    /// Route inbound data to its client.
    ///
    /// A response to one of the client's transactions goes to `on_response`
    /// and returns `true`; unsolicited data goes to `on_unsolicited` and
    /// returns whether the client handled it.
    pub fn on_response(
        &mut self,
        handle: Option<TransactionHandle>,
        client_id: ClientId,
        payload: &[u8],
        result: &SessionResult,
    ) -> Result<bool> {
        let Some(client) = self.registry.lookup(client_id) else {
            warn!(client_id = client_id.0, "received data for unknown client");
            return Err(StackError::InvalidClient(client_id));
        };

        debug!(
            client_id = client_id.0,
            handle = handle.map(|h| h.0),
            len = payload.len(),
            link_budget = result.link_budget,
            "dispatching received data"
        );
        match handle {
            Some(handle) => {
                client.on_response(handle, payload, result);
                Ok(true)
            }
            None => Ok(client.on_unsolicited(payload, result)),
        }
    }

    /// Report a finished transaction to its client.
    pub fn on_transmitted(
        &mut self,
        handle: TransactionHandle,
        client_id: ClientId,
        outcome: std::result::Result<(), EngineError>,
    ) -> Result<()> {
        let Some(client) = self.registry.lookup(client_id) else {
            warn!(
                client_id = client_id.0,
                handle = handle.0,
                "completion for unknown client"
            );
            return Err(StackError::InvalidClient(client_id));
        };

        if let Err(err) = &outcome {
            warn!(client_id = client_id.0, handle = handle.0, error = %err, "transaction failed");
        } else {
            debug!(client_id = client_id.0, handle = handle.0, "transaction complete");
        }
        client.on_transmitted(handle, outcome);
        Ok(())
    }

    /// Route one engine event to its client.
    pub fn dispatch(&mut self, event: EngineEvent) -> Result<()> {
        match event {
            EngineEvent::Received {
                handle,
                client_id,
                payload,
                result,
            } => self
                .on_response(handle, client_id, &payload, &result)
                .map(|_| ()),
            EngineEvent::Transmitted {
                handle,
                client_id,
                outcome,
            } => self.on_transmitted(handle, client_id, outcome),
        }
    }

    /// Dispatch every pending engine event. Returns how many reached a
    /// registered client.
    ///
    /// Events for unknown clients are logged and dropped without being
    /// counted.
    pub fn process_events(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.engine.poll_event() {
            if self.dispatch(event).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    fn wait_for_completion(&mut self, handle: TransactionHandle, client_id: ClientId) -> Result<()> {
        loop {
            let Some(event) = self.engine.poll_event() else {
                warn!(handle = handle.0, "engine idle before transaction completed");
                return Err(StackError::IncompleteTransaction(handle));
            };

            match event {
                EngineEvent::Transmitted {
                    handle: done,
                    client_id: owner,
                    outcome,
                } if done == handle && owner == client_id => {
                    self.on_transmitted(handle, client_id, outcome.clone())?;
                    return outcome.map_err(StackError::from);
                }
                other => {
                    let _ = self.dispatch(other);
                }
            }
        }
    }
}
