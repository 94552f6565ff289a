/// Controls interface directory behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Maximum number of interfaces the directory holds.
    pub max_interfaces: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self { max_interfaces: 8 }
    }
}
