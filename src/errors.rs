use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Represents all possible errors in the toolbelt crate.
///
/// Every variant names the operation that failed (`op`) and the target it
/// was working on so that messages read like
/// `find_files_by_extension: target does not exist [/tmp/x]`.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Error {
    /// The target path does not exist.
    #[error("{op}: target does not exist [{path}]")]
    NotFound {
        /// Operation that failed.
        op: String,
        /// The missing path.
        path: String,
    },

    /// The target path exists but is not a directory.
    #[error("{op}: target is not a directory [{path}]")]
    NotADirectory {
        /// Operation that failed.
        op: String,
        /// The offending path.
        path: String,
    },

    /// The target path is a symlink and the operation refuses to follow it.
    #[error("{op}: target is a symlink [{path}]")]
    SymlinkRejected {
        /// Operation that failed.
        op: String,
        /// The symlinked path.
        path: String,
    },

    /// Something already occupies the target path.
    #[error("{op}: target already exists [{path}]")]
    AlreadyExists {
        /// Operation that failed.
        op: String,
        /// The occupied path.
        path: String,
    },

    /// An underlying filesystem call failed.
    #[error("{op}: failed to {what} [{path}]: {how}")]
    Io {
        /// Operation that failed.
        op: String,
        /// The step that failed, e.g. "open", "read", "stat".
        what: String,
        /// Path the step was working on.
        path: String,
        /// The underlying cause.
        how: String,
    },

    /// A write or flush on an already open handle failed.
    #[error("{op}: failed to {what} open file: {how}")]
    HandleIo {
        /// Operation that failed.
        op: String,
        /// The step that failed, e.g. "write".
        what: String,
        /// The underlying cause.
        how: String,
    },

    /// An HTTP request did not complete before its deadline.
    #[error("{op}: request timeout [{url}]: {how}")]
    Timeout {
        /// Operation that failed.
        op: String,
        /// Requested URL.
        url: String,
        /// The underlying cause.
        how: String,
    },

    /// An HTTP request failed for a reason other than a timeout.
    #[error("{op}: request error [{url}]: {how}")]
    Transport {
        /// Operation that failed.
        op: String,
        /// Requested URL.
        url: String,
        /// The underlying cause.
        how: String,
    },

    /// The server answered with an unexpected status.
    #[error("{op}: bad return status [{url}]: {status}")]
    BadStatus {
        /// Operation that failed.
        op: String,
        /// Requested URL.
        url: String,
        /// Status line, e.g. "404 Not Found".
        status: String,
    },

    /// A child process could not be run or exited unsuccessfully.
    #[error("{op}: command failed [{command}]: {how}")]
    Command {
        /// Operation that failed.
        op: String,
        /// The command line that was run.
        command: String,
        /// Exit status and captured stderr, or the spawn error.
        how: String,
    },

    /// Error indicating an invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn not_found(op: &str, path: &Path) -> Self {
        Error::NotFound {
            op: op.into(),
            path: path.display().to_string(),
        }
    }

    pub(crate) fn not_a_directory(op: &str, path: &Path) -> Self {
        Error::NotADirectory {
            op: op.into(),
            path: path.display().to_string(),
        }
    }

    pub(crate) fn symlink_rejected(op: &str, path: &Path) -> Self {
        Error::SymlinkRejected {
            op: op.into(),
            path: path.display().to_string(),
        }
    }

    pub(crate) fn already_exists(op: &str, path: &Path) -> Self {
        Error::AlreadyExists {
            op: op.into(),
            path: path.display().to_string(),
        }
    }

    pub(crate) fn io(op: &str, what: &str, path: &Path, how: impl ToString) -> Self {
        Error::Io {
            op: op.into(),
            what: what.into(),
            path: path.display().to_string(),
            how: how.to_string(),
        }
    }

    pub(crate) fn handle_io(op: &str, what: &str, how: impl ToString) -> Self {
        Error::HandleIo {
            op: op.into(),
            what: what.into(),
            how: how.to_string(),
        }
    }

    /// Maps a reqwest failure onto `Timeout` or `Transport`.
    pub(crate) fn request(op: &str, url: &str, e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout {
                op: op.into(),
                url: url.into(),
                how: e.to_string(),
            }
        } else {
            Error::Transport {
                op: op.into(),
                url: url.into(),
                how: e.to_string(),
            }
        }
    }
}
