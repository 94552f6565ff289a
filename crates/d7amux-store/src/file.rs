use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::record::{DeviceRecord, DeviceStore};

/// Device store persisted as a JSON document.
///
/// `init` loads the file, creating it with `DeviceRecord::default()` when it
/// does not exist. Writes replace the file through a sibling temp file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    record: Option<DeviceRecord>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            record: None,
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&self) -> Result<&DeviceRecord> {
        self.record.as_ref().ok_or(StoreError::NotInitialized)
    }

    fn persist(&self, record: &DeviceRecord) -> Result<()> {
        let json = serde_json::to_vec_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl DeviceStore for JsonFileStore {
    fn init(&mut self) -> Result<()> {
        let record = match std::fs::read(&self.path) {
            Ok(content) => serde_json::from_slice(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let record = DeviceRecord::default();
                self.persist(&record)?;
                info!(path = ?self.path, "created default device record");
                record
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        debug!(path = ?self.path, "device record loaded");
        self.record = Some(record);
        Ok(())
    }

    fn read_vid(&self) -> Result<[u8; 2]> {
        Ok(self.loaded()?.vid)
    }

    fn read_uid(&self) -> Result<[u8; 8]> {
        Ok(self.loaded()?.uid)
    }

    fn write_active_access_class(&mut self, access_class: u8) -> Result<()> {
        let mut record = *self.loaded()?;
        record.active_access_class = access_class;
        self.persist(&record)?;
        self.record = Some(record);
        Ok(())
    }

    fn read_active_access_class(&self) -> Result<u8> {
        Ok(self.loaded()?.active_access_class)
    }
}
