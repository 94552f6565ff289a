use std::fmt;
use std::io;

use d7amux_engine::EngineError;
use d7amux_session::StackError;
use d7amux_store::StoreError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const RADIO_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn engine_error(context: &str, err: EngineError) -> CliError {
    match err {
        EngineError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(RADIO_ERROR, format!("{context}: {other}")),
    }
}

pub fn store_error(context: &str, err: StoreError) -> CliError {
    match err {
        StoreError::Io { source, .. } => io_error(context, source),
        StoreError::Json(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn stack_error(context: &str, err: StackError) -> CliError {
    match err {
        StackError::Engine(err) => engine_error(context, err),
        StackError::Store(err) => store_error(context, err),
        StackError::PayloadTooLarge { .. } | StackError::Codec(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        StackError::InvalidClient(_) | StackError::InvalidTxPower(_) | StackError::Config(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        StackError::IncompleteTransaction(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}
