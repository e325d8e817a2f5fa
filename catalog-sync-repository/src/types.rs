//! Response types for gateway operations.

/// Result of pinging the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The cluster answered the ping.
    Connected,
    /// The cluster could not be reached; carries the reason.
    Unreachable(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("connected"),
            ConnectionStatus::Unreachable(reason) => write!(f, "unreachable: {}", reason),
        }
    }
}
