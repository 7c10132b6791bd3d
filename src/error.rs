//! Application error type.
//!
//! Every fallible operation in the crate returns `Result<_, AppError>`. The
//! error carries a coarse [`ErrorKind`] (which decides the process exit code)
//! and a human-readable message that is shown verbatim to the user.

/// Error category.
///
/// Parse / format / fitting errors are terminal for the current interaction
/// only: the CLI exits, the TUI shows the message and keeps its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A data cell is non-empty and not numeric.
    Parse,
    /// An uploaded table does not have exactly two columns.
    Format,
    /// The solver failed or a model precondition was violated.
    Fitting,
    /// No model was chosen or the data is empty.
    InputIncomplete,
    /// File open/create/write failure.
    Io,
    /// Terminal setup or drawing failure (TUI only).
    Terminal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Parse | ErrorKind::Format | ErrorKind::Io => 2,
            ErrorKind::InputIncomplete => 3,
            ErrorKind::Fitting => 4,
            ErrorKind::Terminal => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    pub fn fitting(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fitting, message)
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputIncomplete, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::parse("bad").exit_code(), 2);
        assert_eq!(AppError::format("bad").exit_code(), 2);
        assert_eq!(AppError::incomplete("none").exit_code(), 3);
        assert_eq!(AppError::fitting("diverged").exit_code(), 4);
        assert_eq!(AppError::terminal("tty").exit_code(), 5);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::format("The CSV file must contain exactly two columns.");
        assert_eq!(err.to_string(), "The CSV file must contain exactly two columns.");
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
