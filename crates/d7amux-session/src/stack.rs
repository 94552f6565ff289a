use std::sync::{Arc, Mutex};

use d7amux_alp::{AlpSink, InterfaceDirectory};
use d7amux_engine::{ClientId, NlsMethod, SessionConfig, SessionEngine, TxPower};
use d7amux_store::DeviceStore;
use tracing::debug;

use crate::address::{resolve_device_address, DeviceAddress};
use crate::budget::PayloadBudget;
use crate::callbacks::ClientCallbacks;
use crate::config::StackConfig;
use crate::error::{Result, StackError};
use crate::lifecycle::LifecycleState;
use crate::registry::{ClientRegistry, MAX_CLIENT_COUNT};

pub(crate) type SharedSink = Arc<Mutex<dyn AlpSink>>;

/// Interface adapter wiring chosen at construction time.
pub(crate) struct AdapterSlot {
    pub(crate) directory: Box<dyn InterfaceDirectory + Send>,
    pub(crate) sink: SharedSink,
    pub(crate) client_id: Option<ClientId>,
}

/// One session stack: the engine, device storage, the client table and the
/// lifecycle state, owned together.
///
/// All entry points take `&mut self`; callers deliver engine events serially.
pub struct Stack<E, S, const N: usize = MAX_CLIENT_COUNT> {
    pub(crate) engine: E,
    pub(crate) store: S,
    pub(crate) registry: ClientRegistry<N>,
    pub(crate) budget: PayloadBudget,
    pub(crate) default_session: SessionConfig,
    pub(crate) state: LifecycleState,
    pub(crate) adapter: Option<AdapterSlot>,
}

impl<E: SessionEngine, S: DeviceStore> Stack<E, S> {
    /// Stack with the default client capacity and configuration.
    pub fn new(engine: E, store: S) -> Self {
        let config = StackConfig::default();
        Self {
            engine,
            store,
            registry: ClientRegistry::new(),
            budget: PayloadBudget::default(),
            default_session: config.default_session,
            state: LifecycleState::Uninitialized,
            adapter: None,
        }
    }
}

impl<E: SessionEngine, S: DeviceStore, const N: usize> Stack<E, S, N> {
    /// Stack with explicit configuration.
    pub fn with_config(engine: E, store: S, config: StackConfig) -> Result<Self> {
        Ok(Self {
            engine,
            store,
            registry: ClientRegistry::new(),
            budget: PayloadBudget::new(config.max_payload_size)?,
            default_session: config.default_session,
            state: LifecycleState::Uninitialized,
            adapter: None,
        })
    }

    /// Publish this stack as an interface in `directory` on every `init`,
    /// forwarding its traffic to `sink`.
    pub fn with_interface_adapter(
        mut self,
        directory: impl InterfaceDirectory + Send + 'static,
        sink: impl AlpSink + 'static,
    ) -> Self {
        let sink: SharedSink = Arc::new(Mutex::new(sink));
        self.adapter = Some(AdapterSlot {
            directory: Box::new(directory),
            sink,
            client_id: None,
        });
        self
    }

    /// Register a client and return its id.
    ///
    /// `init` clears the table, so register after initializing.
    ///
    /// # Panics
    ///
    /// Panics when the client table is full.
    pub fn register(&mut self, callbacks: impl ClientCallbacks + 'static) -> ClientId {
        self.registry.register(Box::new(callbacks))
    }

    /// Register a client, or report a full table.
    pub fn try_register(&mut self, callbacks: impl ClientCallbacks + 'static) -> Result<ClientId> {
        self.registry.try_register(Box::new(callbacks))
    }

    /// Number of registered clients.
    pub fn client_count(&self) -> usize {
        self.registry.len()
    }

    pub fn client_capacity(&self) -> usize {
        self.registry.capacity()
    }

    /// Session used for sends that pass no config.
    pub fn active_session_config(&self) -> Result<SessionConfig> {
        let mut config = self.default_session;
        config.addressee.access_class = self.store.read_active_access_class()?;
        Ok(config)
    }

    /// Device address, VID when assigned and UID otherwise.
    pub fn get_device_address(&self) -> Result<DeviceAddress> {
        resolve_device_address(&self.store).map_err(StackError::from)
    }

    /// Largest application payload for `method`.
    pub fn get_max_payload_size(&self, method: NlsMethod) -> usize {
        self.budget.max_payload(method)
    }

    pub fn budget(&self) -> &PayloadBudget {
        &self.budget
    }

    /// Set the radio transmit power index (1..=16).
    pub fn set_tx_power(&mut self, level: u8) -> Result<()> {
        let power = TxPower::new(level).ok_or(StackError::InvalidTxPower(level))?;
        debug!(level, "setting tx power");
        self.engine.set_tx_power(power);
        Ok(())
    }

    /// Transmit power index. Not read back from the radio; always 0.
    pub fn get_tx_power(&self) -> u8 {
        0
    }

    pub fn set_access_class(&mut self, access_class: u8) -> Result<()> {
        self.store
            .write_active_access_class(access_class)
            .map_err(StackError::from)
    }

    pub fn get_access_class(&self) -> Result<u8> {
        self.store
            .read_active_access_class()
            .map_err(StackError::from)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Interface directory, when the adapter is configured.
    pub fn directory(&self) -> Option<&(dyn InterfaceDirectory + Send)> {
        self.adapter.as_ref().map(|slot| &*slot.directory)
    }
}
