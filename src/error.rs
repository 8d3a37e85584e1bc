use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, LzfError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LzfError {
    /// A caller-supplied argument violated a precondition.
    /// Raised before any output is produced.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The framed stream is malformed. No partial output is returned.
    #[error("corrupt input in block {block} at byte {offset}: {reason}")]
    CorruptInput {
        block: usize,
        offset: usize,
        reason: &'static str,
    },
}
