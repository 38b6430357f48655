use thiserror::Error;

/// Custom error type for decoding operations.
///
/// Only `EmptyBytecode` is raised by the instruction scanner itself; the remaining variants come
/// from acquiring the input (hex text, files) or from re-reading rendered disassembly.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytecode buffer is empty.
    #[error("empty bytecode")]
    EmptyBytecode,

    /// The input is not valid hexadecimal.
    #[error("hex decode failed: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// The input file could not be read.
    #[error("could not read file '{path}': {source}")]
    FileRead {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A disassembly line could not be parsed.
    #[error("disassembly parse error at line {line}: {msg} ⇒ `{raw}`")]
    Parse {
        /// Zero-based line number.
        line: usize,
        /// What went wrong.
        msg: String,
        /// The offending line.
        raw: String,
    },
}

/// Errors raised while loading an analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config '{path}': {source}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for the expected schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error type for running the derived views over a decoded stream.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Decoding the input failed.
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// A view task panicked or was cancelled.
    #[error("analysis task failed: {0}")]
    TaskFailed(String),
}
