//! Session engine boundary for the d7amux session front-end.
//!
//! This is the lowest layer of d7amux. It defines the values that cross the
//! boundary between the client multiplexing layer and the radio/session
//! engine underneath it:
//! - Session configuration and reception result records
//! - The [`SessionEngine`] contract (init/stop/send/poll)
//! - A fixed binary encoding for configuration and result records
//!
//! A scripted [`SimulatedEngine`] is included for tests and tooling. It does
//! not model channel access or retransmission.

pub mod codec;
pub mod error;
pub mod sim;
pub mod traits;
pub mod types;

pub use codec::{
    decode_session_config, decode_session_result, encode_session_config, encode_session_result,
    SESSION_CONFIG_LEN, SESSION_RESULT_BASE_LEN, SESSION_RESULT_MAX_LEN,
};
pub use error::{CodecError, EngineError, Result};
pub use sim::{SentCommand, SimOutcome, SimulatedEngine};
pub use traits::{EngineEvent, SessionEngine};
pub use types::{
    Addressee, Channel, ClientId, IdType, NlsMethod, Qos, ResponseMode, ResultStatus,
    SessionConfig, SessionResult, TransactionHandle, TxPower, SECURITY_HEADER_SIZE,
};
