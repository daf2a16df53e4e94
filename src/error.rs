//! Error types for the process wrapper.
//!
//! Registries have no error surface: invalid or repeated add/remove calls are absorbed as
//! no-ops. Only [`process`](crate::process) reports failures.

use std::io;

use thiserror::Error;

/// Errors raised by [`Process`](crate::process::Process).
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("process `{program}` is not joinable")]
    NotJoinable { program: String },

    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{stream} of `{program}` is not piped")]
    StreamUnavailable {
        program: String,
        stream: &'static str,
    },

    #[error("I/O on {stream} of `{program}` failed: {source}")]
    Io {
        program: String,
        stream: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// The raw OS error code behind this error, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            ProcessError::Spawn { source, .. }
            | ProcessError::Wait { source, .. }
            | ProcessError::Io { source, .. } => source.raw_os_error(),
            ProcessError::NotJoinable { .. } | ProcessError::StreamUnavailable { .. } => None,
        }
    }
}

pub type Result<T, E = ProcessError> = std::result::Result<T, E>;
