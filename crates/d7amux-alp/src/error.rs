/// Errors that can occur while registering interfaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// A different descriptor already holds a unique interface id.
    #[error("interface 0x{0:02X} is unique and already registered")]
    UniqueConflict(u8),

    /// The directory is at capacity.
    #[error("interface directory full (max {max})")]
    Full { max: usize },
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
