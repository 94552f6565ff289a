use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Read/write accessors over persistent device configuration.
pub trait DeviceStore {
    /// Prepare the store for access. Calling it again reloads state.
    fn init(&mut self) -> Result<()>;

    /// Stored virtual identifier. `FF FF` means unset.
    fn read_vid(&self) -> Result<[u8; 2]>;

    /// Stored unique identifier.
    fn read_uid(&self) -> Result<[u8; 8]>;

    fn write_active_access_class(&mut self, access_class: u8) -> Result<()>;

    fn read_active_access_class(&self) -> Result<u8>;
}

impl<S: DeviceStore + ?Sized> DeviceStore for Box<S> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn read_vid(&self) -> Result<[u8; 2]> {
        (**self).read_vid()
    }

    fn read_uid(&self) -> Result<[u8; 8]> {
        (**self).read_uid()
    }

    fn write_active_access_class(&mut self, access_class: u8) -> Result<()> {
        (**self).write_active_access_class(access_class)
    }

    fn read_active_access_class(&self) -> Result<u8> {
        (**self).read_active_access_class()
    }
}

/// Stored device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub uid: [u8; 8],
    pub vid: [u8; 2],
    pub active_access_class: u8,
}

impl Default for DeviceRecord {
    fn default() -> Self {
        Self {
            uid: [0; 8],
            vid: [0xFF, 0xFF],
            active_access_class: 0x01,
        }
    }
}
