//! Error types for the key-input engine.
//!
//! Kept as a small hand-rolled enum with manual `Display`/`Error` impls,
//! matching the style of the old `ConfigError`/`PatternError` types this
//! crate grew out of — no `thiserror`, no `anyhow`.

use std::fmt;

/// Failures the engine can report to a caller.
#[derive(Debug)]
pub enum KuiError {
    /// A read from the underlying byte source failed. Carries the
    /// triggering `std::io::Error`; the engine does not retry on its own.
    InputError(std::io::Error),

    /// A `MapSet::register` call was rejected because `human_key` decoded
    /// to an empty key sequence (nothing to bind).
    RegistrationRejected { human_key: String },
}

impl fmt::Display for KuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuiError::InputError(e) => write!(f, "input error: {e}"),
            KuiError::RegistrationRejected { human_key } => {
                write!(f, "cannot register empty key sequence for {human_key:?}")
            }
        }
    }
}

impl std::error::Error for KuiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KuiError::InputError(e) => Some(e),
            KuiError::RegistrationRejected { .. } => None,
        }
    }
}

impl From<std::io::Error> for KuiError {
    fn from(e: std::io::Error) -> Self {
        KuiError::InputError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_human_key() {
        let e = KuiError::RegistrationRejected { human_key: "".to_owned() };
        assert!(e.to_string().contains("\"\""));
    }

    #[test]
    fn input_error_source_is_the_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let e = KuiError::InputError(io);
        assert!(std::error::Error::source(&e).is_some());
    }
}
