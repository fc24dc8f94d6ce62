//! Domain error types.

/// Top-level error type for orbtest.
///
/// Per-session conditions (no opening-range bars, degenerate range, no
/// actionable signal, malformed bars) are silent skips, not errors; only
/// configuration problems, data access problems and a fully empty input
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum OrbError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no usable bars in input")]
    EmptyInput,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&OrbError> for std::process::ExitCode {
    fn from(err: &OrbError) -> Self {
        let code: u8 = match err {
            OrbError::Io(_) => 1,
            OrbError::ConfigParse { .. }
            | OrbError::ConfigMissing { .. }
            | OrbError::ConfigInvalid { .. } => 2,
            OrbError::Data { .. } => 3,
            OrbError::EmptyInput => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = OrbError::ConfigMissing {
            section: "orb".into(),
            key: "window_start".into(),
        };
        assert_eq!(err.to_string(), "missing config key [orb] window_start");

        let err = OrbError::EmptyInput;
        assert_eq!(err.to_string(), "no usable bars in input");
    }

    #[test]
    fn io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = OrbError::from(io);
        assert!(err.to_string().contains("gone"));
    }
}
