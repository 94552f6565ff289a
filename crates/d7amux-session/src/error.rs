use d7amux_engine::{ClientId, TransactionHandle};

/// Errors that can occur in session stack operations.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// The client id was never registered.
    #[error("client {0} is not registered")]
    InvalidClient(ClientId),

    /// The client table is at capacity.
    #[error("client registry full (max {max})")]
    RegistryFull { max: usize },

    /// The stack has not been initialized, or was stopped.
    #[error("session stack not initialized")]
    NotInitialized,

    /// The payload does not fit the security method's budget.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Transmit power outside 1..=16.
    #[error("tx power {0} out of range (1..=16)")]
    InvalidTxPower(u8),

    /// The engine ran out of events before completing a synchronous send.
    #[error("transaction {0} did not complete")]
    IncompleteTransaction(TransactionHandle),

    /// Session engine error.
    #[error("engine error: {0}")]
    Engine(#[from] d7amux_engine::EngineError),

    /// Device store error.
    #[error("store error: {0}")]
    Store(#[from] d7amux_store::StoreError),

    /// Interface directory error.
    #[error("interface directory error: {0}")]
    Directory(#[from] d7amux_alp::DirectoryError),

    /// Interface configuration blob could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] d7amux_engine::CodecError),

    /// Invalid stack configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Deployment configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The protocol maximum cannot absorb the largest security overhead.
    #[error("max payload {max_payload} is smaller than security overhead {overhead}")]
    PayloadBudgetTooSmall { max_payload: usize, overhead: usize },
}

pub type Result<T> = std::result::Result<T, StackError>;
