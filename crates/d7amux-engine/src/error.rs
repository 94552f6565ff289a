/// Errors reported by the session engine.
///
/// These are opaque to the multiplexing layer: they are wrapped and handed to
/// callers unchanged, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The channel was busy for the whole access window.
    #[error("channel busy")]
    Busy,

    /// No acknowledgement was received for the request.
    #[error("no acknowledgement received")]
    NoAck,

    /// The addressee could not be resolved or reached.
    #[error("addressing failed")]
    AddressingFailed,

    /// The engine rejected the session configuration.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    /// The engine is not running.
    #[error("session engine stopped")]
    Stopped,

    /// Any other engine-specific failure code.
    #[error("engine error code {0}")]
    Code(i16),
}

/// Errors that can occur while encoding or decoding boundary records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The input ended before a complete record was read.
    #[error("record truncated ({got} bytes, need {needed})")]
    Truncated { needed: usize, got: usize },

    /// The addressee control field carries an unknown id type.
    #[error("invalid addressee id type {0}")]
    InvalidIdType(u8),

    /// The addressee control field carries an unknown security method.
    #[error("invalid security method {0}")]
    InvalidNlsMethod(u8),

    /// The QoS field carries an unknown response mode.
    #[error("invalid response mode {0}")]
    InvalidResponseMode(u8),
}

pub type Result<T> = std::result::Result<T, EngineError>;
