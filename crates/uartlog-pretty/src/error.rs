use std::path::PathBuf;

/// Errors that can occur while pretty-printing a log file.
#[derive(Debug, thiserror::Error)]
pub enum PrettyError {
    /// The input path does not name a regular file.
    #[error("not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The input log could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PrettyError>;
