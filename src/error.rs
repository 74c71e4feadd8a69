// src/error.rs
use std::fmt;

/// Why a status query produced no record.
///
/// Every variant carries the host it was raised for so log lines can be
/// read without the surrounding context.
#[derive(Debug)]
pub enum QueryError {
    /// The host string could not be turned into a connectable address.
    Resolution { host: String, reason: String },
    /// A connect, read or overall deadline elapsed.
    Timeout { host: String, stage: &'static str },
    /// The server refused or dropped the connection.
    Unreachable { host: String, source: std::io::Error },
    /// The server answered with something that is not a status reply.
    Protocol { host: String, reason: String },
    /// Failure inside this service after a successful query (render, task join).
    Internal { host: String, reason: String },
}

impl QueryError {
    pub fn resolution(host: &str, reason: impl Into<String>) -> Self {
        Self::Resolution { host: host.to_string(), reason: reason.into() }
    }

    pub fn timeout(host: &str, stage: &'static str) -> Self {
        Self::Timeout { host: host.to_string(), stage }
    }

    pub fn protocol(host: &str, reason: impl Into<String>) -> Self {
        Self::Protocol { host: host.to_string(), reason: reason.into() }
    }

    pub fn internal(host: &str, reason: impl Into<String>) -> Self {
        Self::Internal { host: host.to_string(), reason: reason.into() }
    }

    /// Short name of the failure kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "resolution",
            Self::Timeout { .. } => "timeout",
            Self::Unreachable { .. } => "unreachable",
            Self::Protocol { .. } => "protocol",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn host(&self) -> &str {
        match self {
            Self::Resolution { host, .. }
            | Self::Timeout { host, .. }
            | Self::Unreachable { host, .. }
            | Self::Protocol { host, .. }
            | Self::Internal { host, .. } => host,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution { host, reason } => {
                write!(f, "Failed to resolve {}: {}", host, reason)
            }
            Self::Timeout { host, stage } => {
                write!(f, "Timed out during {} for {}", stage, host)
            }
            Self::Unreachable { host, source } => {
                write!(f, "Server {} is unreachable: {}", host, source)
            }
            Self::Protocol { host, reason } => {
                write!(f, "Invalid status reply from {}: {}", host, reason)
            }
            Self::Internal { host, reason } => {
                write!(f, "Internal error while serving {}: {}", host, reason)
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreachable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure to produce the PNG for an otherwise valid status record.
#[derive(Debug)]
pub enum RenderError {
    /// The canvas could not be allocated for the derived dimensions.
    Canvas { width: u32, height: u32 },
    Encode(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas { width, height } => {
                write!(f, "Could not allocate a {}x{} canvas", width, height)
            }
            Self::Encode(reason) => write!(f, "PNG encoding failed: {}", reason),
        }
    }
}

impl std::error::Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_host_and_stage() {
        let err = QueryError::timeout("mc.example.org", "status read");
        assert_eq!(err.to_string(), "Timed out during status read for mc.example.org");
        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.host(), "mc.example.org");
    }

    #[test]
    fn unreachable_exposes_io_source() {
        let io = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        let err = QueryError::Unreachable { host: "a:1".into(), source: io };
        assert!(std::error::Error::source(&err).is_some());
    }
}
