//! Persistent device configuration for the d7amux session front-end.
//!
//! The session layer only needs a handful of stored values: the device's
//! unique and virtual identifiers and its active access class. This crate
//! defines the [`DeviceStore`] accessors and two implementations, one in
//! memory and one backed by a JSON file.

pub mod error;
pub mod file;
pub mod memory;
pub mod record;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{DeviceRecord, DeviceStore};
