//! Execution context of a sync operation.

/// Receives messages meant for an operator.
pub trait NoticeSink: Send + Sync {
    fn notice(&self, message: &str);

    fn error(&self, message: &str);
}

/// Where a sync operation was triggered from.
///
/// Interactive callers have an operator to show failures to, so failures are
/// surfaced and absorbed. Background callers (resync jobs, the console) get
/// failures back as errors.
#[derive(Clone, Copy)]
pub enum ExecutionContext<'a> {
    Interactive(&'a dyn NoticeSink),
    Background,
}

impl<'a> ExecutionContext<'a> {
    pub fn is_interactive(&self) -> bool {
        matches!(self, ExecutionContext::Interactive(_))
    }

    /// Forward `message` to the operator, if there is one.
    pub fn notice(&self, message: &str) {
        if let ExecutionContext::Interactive(sink) = self {
            sink.notice(message);
        }
    }

    /// Forward an error `message` to the operator, if there is one.
    pub fn error(&self, message: &str) {
        if let ExecutionContext::Interactive(sink) = self {
            sink.error(message);
        }
    }
}

impl std::fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionContext::Interactive(_) => f.write_str("Interactive"),
            ExecutionContext::Background => f.write_str("Background"),
        }
    }
}
