use std::fmt;

/// One notification from the transport, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Opaque text payload of a default-typed SSE event.
    Message(String),
    Error(TransportError),
}

/// Any failure reported by the event stream transport: refused or dropped
/// connections, unexpected responses, malformed framing. Sub-kinds are not
/// distinguished; the transport's own description is kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    description: String,
}

impl TransportError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl std::error::Error for TransportError {}
