//! Multi-client session front-end for a DASH7 radio stack.
//!
//! d7amux sits between applications and a DASH7 session engine: it hands out
//! client ids, routes transaction completions and inbound data back to the
//! client that owns them, resolves the device address and computes payload
//! budgets per security method.
//!
//! # Crate Structure
//!
//! - [`engine`]: Session engine boundary, wire types and record codec
//! - [`store`]: Persistent device configuration
//! - [`alp`]: Generic command-interface directory and sink
//! - [`session`]: Client registry, transaction router and lifecycle

/// Re-export engine types.
pub mod engine {
    pub use d7amux_engine::*;
}

/// Re-export device store types.
pub mod store {
    pub use d7amux_store::*;
}

/// Re-export command-interface types.
pub mod alp {
    pub use d7amux_alp::*;
}

/// Re-export session stack types.
pub mod session {
    pub use d7amux_session::*;
}
