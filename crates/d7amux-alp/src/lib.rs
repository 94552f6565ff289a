//! Generic command-interface boundary.
//!
//! Application-layer components address every protocol through one
//! directory of interfaces. Each interface publishes a descriptor (its id,
//! configuration and status record sizes, and whether only one instance may
//! exist) and reports inbound traffic to an [`AlpSink`] together with an
//! [`InterfaceStatus`].

pub mod config;
pub mod directory;
pub mod error;
pub mod sink;
pub mod status;

pub use config::DirectoryConfig;
pub use directory::{InterfaceDescriptor, InterfaceDirectory, InterfaceTable, ITF_ID_D7ASP};
pub use error::{DirectoryError, Result};
pub use sink::{AlpSink, RecordingSink, SinkEvent};
pub use status::{status_len, InterfaceStatus, STATUS_BASE_LEN};
