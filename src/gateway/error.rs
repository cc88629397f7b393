//! Gateway error types.
//!
//! The `Display` form of each variant is the text shown to the user.

use std::time::Duration;

use crate::execution::QueryId;
use crate::kernel::{KernelError, Message};

use super::envelope::ResponseEnvelope;

/// Why a gateway operation produced no result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The query is in the negative cache; the Kernel was not called
    #[error("Aborted because query is known to take longer than {}", describe_limit(.limit))]
    CachedAbort { query: QueryId, limit: Duration },

    /// The query ran past the limit just now
    #[error("Aborted because query takes longer than {}", describe_limit(.limit))]
    TimedOut { query: QueryId, limit: Duration },

    /// Any other Kernel failure, passed through as messages
    #[error("{}", join_messages(.messages))]
    KernelFailure { messages: Vec<Message> },

    /// Every constituent query of a composite operation failed
    #[error("All queries failed: {}", join_messages(.messages))]
    AllQueriesFailed { messages: Vec<Message> },

    /// The download archive could not be written
    #[error("Could not build archive: {0}")]
    Archive(String),
}

impl GatewayError {
    pub fn kernel_failure(text: impl Into<String>) -> Self {
        GatewayError::KernelFailure {
            messages: vec![Message::error(text)],
        }
    }

    /// User-facing messages for this error (never empty).
    pub fn messages(&self) -> Vec<Message> {
        match self {
            GatewayError::KernelFailure { messages }
            | GatewayError::AllQueriesFailed { messages }
                if !messages.is_empty() =>
            {
                messages.clone()
            }
            other => vec![Message::error(other.to_string())],
        }
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        ResponseEnvelope::failed(self.messages())
    }

    /// True for the two timeout-class aborts
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            GatewayError::CachedAbort { .. } | GatewayError::TimedOut { .. }
        )
    }
}

impl From<KernelError> for GatewayError {
    fn from(e: KernelError) -> Self {
        GatewayError::kernel_failure(e.to_string())
    }
}

/// `180 seconds`, `1 second`, `250 milliseconds`
pub fn describe_limit(limit: &Duration) -> String {
    if limit.subsec_nanos() == 0 {
        let secs = limit.as_secs();
        format!("{secs} second{}", if secs == 1 { "" } else { "s" })
    } else {
        let millis = limit.as_millis();
        format!("{millis} millisecond{}", if millis == 1 { "" } else { "s" })
    }
}

/// Shown when the Kernel reports a failure without saying why
pub const UNEXPLAINED_FAILURE: &str = "Query failed without a message from the Kernel";

fn join_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return UNEXPLAINED_FAILURE.to_string();
    }
    messages
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
