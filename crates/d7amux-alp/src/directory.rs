use std::collections::HashMap;

use tracing::debug;

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};

/// Interface id of the DASH7 session layer.
pub const ITF_ID_D7ASP: u8 = 0xD7;

/// Registration record of one interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub itf_id: u8,
    /// Size of the interface-specific configuration blob.
    pub cfg_len: usize,
    /// Largest encoded status record.
    pub status_len: usize,
    /// Only one instance of this interface may exist.
    pub unique: bool,
}

/// Directory that protocol-agnostic components use to find interfaces.
pub trait InterfaceDirectory {
    /// Add an interface. Registering an identical descriptor again is a no-op.
    fn register_interface(&mut self, descriptor: InterfaceDescriptor) -> Result<()>;

    /// Descriptor registered under `itf_id`.
    fn lookup(&self, itf_id: u8) -> Option<&InterfaceDescriptor>;
}

/// In-memory interface directory keyed by interface id.
pub struct InterfaceTable {
    interfaces: HashMap<u8, InterfaceDescriptor>,
    config: DirectoryConfig,
}

impl InterfaceTable {
    /// Create an empty table with default config.
    pub fn new() -> Self {
        Self::with_config(DirectoryConfig::default())
    }

    /// Create an empty table with explicit config.
    pub fn with_config(config: DirectoryConfig) -> Self {
        Self {
            interfaces: HashMap::new(),
            config,
        }
    }

    /// Registered interface ids, ascending.
    pub fn interfaces(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.interfaces.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }
}

impl Default for InterfaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceDirectory for InterfaceTable {
    fn register_interface(&mut self, descriptor: InterfaceDescriptor) -> Result<()> {
        match self.interfaces.get(&descriptor.itf_id) {
            Some(existing) if *existing == descriptor => {
                debug!(itf_id = descriptor.itf_id, "interface already registered");
                return Ok(());
            }
            Some(existing) if existing.unique || descriptor.unique => {
                return Err(DirectoryError::UniqueConflict(descriptor.itf_id));
            }
            Some(_) => {
                debug!(itf_id = descriptor.itf_id, "replacing interface descriptor");
            }
            None if self.interfaces.len() >= self.config.max_interfaces => {
                return Err(DirectoryError::Full {
                    max: self.config.max_interfaces,
                });
            }
            None => {
                debug!(
                    itf_id = descriptor.itf_id,
                    unique = descriptor.unique,
                    "interface registered"
                );
            }
        }

        self.interfaces.insert(descriptor.itf_id, descriptor);
        Ok(())
    }

    fn lookup(&self, itf_id: u8) -> Option<&InterfaceDescriptor> {
        self.interfaces.get(&itf_id)
    }
}

impl<D: InterfaceDirectory + ?Sized> InterfaceDirectory for Box<D> {
    fn register_interface(&mut self, descriptor: InterfaceDescriptor) -> Result<()> {
        (**self).register_interface(descriptor)
    }

    fn lookup(&self, itf_id: u8) -> Option<&InterfaceDescriptor> {
        (**self).lookup(itf_id)
    }
}
