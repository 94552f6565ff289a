use d7amux_engine::SessionEngine;
use d7amux_store::DeviceStore;
use tracing::{debug, info, warn};

use crate::adapter::{interface_descriptor, AdapterCallbacks};
use crate::error::Result;
use crate::stack::Stack;

/// Whether a stack has been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
}

impl<E: SessionEngine, S: DeviceStore, const N: usize> Stack<E, S, N> {
    /// Start the stack. Does nothing when already initialized.
    ///
    /// When an interface adapter is configured it is published in the
    /// directory first; a refusal leaves storage, the engine and the client
    /// table untouched. Then device storage and the engine are initialized,
    /// the client table is emptied and the adapter registers as the first
    /// client (id 0).
    pub fn init(&mut self) -> Result<()> {
        if self.state == LifecycleState::Initialized {
            debug!("session stack already initialized");
            return Ok(());
        }

        // Nothing is started unless the directory accepts the adapter.
        if let Some(slot) = self.adapter.as_mut() {
            slot.directory.register_interface(interface_descriptor())?;
        }

        self.store.init()?;
        self.engine.init()?;
        self.registry.reset();

        if let Some(slot) = self.adapter.as_mut() {
            let client_id = self
                .registry
                .register(Box::new(AdapterCallbacks::new(slot.sink.clone())));
            slot.client_id = Some(client_id);
            debug!(client_id = client_id.0, "interface adapter registered");
        }

        self.state = LifecycleState::Initialized;
        info!(capacity = N, "session stack initialized");
        Ok(())
    }

    /// Stop the stack and the engine, and forget every registered client.
    ///
    /// Transactions still in flight in the engine lose their client; their
    /// completions are reported as events for an unknown client.
    pub fn stop(&mut self) {
        let clients = self.registry.len();
        if clients > 0 {
            warn!(clients, "stopping with registered clients; their callbacks are dropped");
        }
        self.state = LifecycleState::Uninitialized;
        self.engine.stop();
        self.registry.reset();
        if let Some(slot) = self.adapter.as_mut() {
            slot.client_id = None;
        }
        info!("session stack stopped");
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == LifecycleState::Initialized
    }
}
