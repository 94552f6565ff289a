//! Client multiplexing and transaction routing for a DASH7 session stack.
//!
//! This is the layer applications talk to. Several clients register their
//! callbacks with one [`Stack`], send payloads through it, and get their
//! responses, completions and unsolicited commands routed back to them.
//! The stack also resolves the device address, computes per-security-method
//! payload budgets and, when configured, publishes itself as an interface in
//! a generic command-interface directory.

pub mod adapter;
pub mod address;
pub mod budget;
pub mod callbacks;
#[cfg(feature = "async")]
pub mod channel;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod router;
pub mod stack;

pub use adapter::InterfaceAdapter;
pub use address::{resolve_device_address, DeviceAddress, VID_UNSET};
pub use budget::{PayloadBudget, DEFAULT_MAX_PAYLOAD};
pub use callbacks::{ClientCallbacks, FnCallbacks};
#[cfg(feature = "async")]
pub use channel::{ChannelCallbacks, ClientEvent};
pub use config::StackConfig;
pub use error::{ConfigError, Result, StackError};
pub use lifecycle::LifecycleState;
pub use registry::{ClientRegistry, MAX_CLIENT_COUNT};
pub use router::SendMode;
pub use stack::Stack;
