use crate::error::{Result, StoreError};
use crate::record::{DeviceRecord, DeviceStore};

/// Device store kept in memory. Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: DeviceRecord,
    initialized: bool,
}

impl MemoryStore {
    pub fn new(record: DeviceRecord) -> Self {
        Self {
            record,
            initialized: false,
        }
    }

    /// Current record, regardless of init state.
    pub fn record(&self) -> &DeviceRecord {
        &self.record
    }

    /// Replace the stored virtual identifier.
    pub fn set_vid(&mut self, vid: [u8; 2]) {
        self.record.vid = vid;
    }

    fn checked(&self) -> Result<&DeviceRecord> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }
        Ok(&self.record)
    }
}

impl DeviceStore for MemoryStore {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn read_vid(&self) -> Result<[u8; 2]> {
        Ok(self.checked()?.vid)
    }

    fn read_uid(&self) -> Result<[u8; 8]> {
        Ok(self.checked()?.uid)
    }

    fn write_active_access_class(&mut self, access_class: u8) -> Result<()> {
        self.checked()?;
        self.record.active_access_class = access_class;
        Ok(())
    }

    fn read_active_access_class(&self) -> Result<u8> {
        Ok(self.checked()?.active_access_class)
    }
}
