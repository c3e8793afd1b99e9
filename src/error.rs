/// Errors raised while loading, chunking or writing transfer data.
///
/// Every variant is fatal: the pipeline stops at the first one and `main`
/// reports it with a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// A row in one of the input files could not be parsed.
    #[error("{path}:{line}: {reason}")]
    InputFormat {
        path: std::path::PathBuf,
        line: u64,
        reason: String,
    },

    /// Bad window width code or an input path that cannot be used.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Window arithmetic left the representable time range, or the window
    /// span is too large to hold in memory.
    #[error("time range error: {0}")]
    OutOfRange(String),

    /// Failure creating or writing an output artifact.
    #[error("failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure encoding a chunk row.
    #[error("failed to encode {path}: {source}")]
    Csv {
        path: std::path::PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChunkError>;

impl ChunkError {
    pub fn input_format<P: AsRef<std::path::Path>>(path: P, line: u64, reason: impl Into<String>) -> Self {
        ChunkError::InputFormat {
            path: path.as_ref().to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        ChunkError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn csv<P: AsRef<std::path::Path>>(path: P, source: csv::Error) -> Self {
        ChunkError::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
