use std::borrow::Cow;
use std::fmt;

/// Result type used across the ingest/window pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Error surfaced by the codec, column store, or orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The leading 32-bit word of a wire buffer did not match `BATCH_MAGIC`.
    #[error("invalid batch magic while processing {stage}")]
    InvalidMagic { stage: Stage },

    /// A column descriptor carried an unrecognized type tag.
    #[error("unknown column type tag {tag} at column {column_index} while processing {stage}")]
    UnknownTypeTag {
        stage: Stage,
        column_index: u32,
        tag: u32,
    },

    /// A declared byte length extended past the end of the buffer.
    #[error("truncated buffer while processing {stage}: need {needed} bytes, have {available}")]
    Truncated {
        stage: Stage,
        needed: usize,
        available: usize,
    },

    /// Pre-commit schema validation failed for one column.
    #[error(
        "Schema type mismatch at column {column_index} ({name}): expected {expected:?}, got {got:?}"
    )]
    SchemaMismatch {
        column_index: u32,
        name: Cow<'static, str>,
        expected: crate::column::ColumnType,
        got: crate::column::ColumnType,
    },

    /// Post-commit row-count check failed; indicates an encoder bug.
    #[error(
        "Integrity violation in column {column_name}: row count {column_rows} != expected {expected_rows}"
    )]
    IntegrityViolation {
        column_name: Cow<'static, str>,
        column_rows: usize,
        expected_rows: usize,
    },

    /// Two sibling `list_utf8` columns report the same total row count but
    /// disagree on how many items a given row holds.
    #[error(
        "list_utf8 item-count mismatch at row {row}: column {column_name} has {item_count} items, column {sibling_name} has {sibling_item_count}"
    )]
    ListItemCountMismatch {
        row: usize,
        column_name: Cow<'static, str>,
        item_count: u32,
        sibling_name: Cow<'static, str>,
        sibling_item_count: u32,
    },

    /// A queued ingest command was evicted under the SHED backpressure
    /// strategy before it could be committed.
    #[error("ingest batch shed under backpressure")]
    Shed,

    /// The worker endpoint disappeared (channel disconnect / panic).
    #[error("transport crash: {details}")]
    TransportCrash { details: Cow<'static, str> },

    /// The pump was cancelled by the consumer before completion.
    #[error("aborted by caller")]
    Aborted,
}

/// Logical pipeline stage used for diagnostic reporting, carried on every
/// error so a log line can say which phase of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Codec,
    Schema,
    Integrity,
    Transport,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec => write!(f, "wire codec"),
            Self::Schema => write!(f, "schema validation"),
            Self::Integrity => write!(f, "integrity check"),
            Self::Transport => write!(f, "transport"),
        }
    }
}

impl Error {
    /// Formats the user-visible failure message carried by consumer state:
    /// `"Batch {seq}: {message}"`.
    #[must_use]
    pub fn as_batch_message(&self, seq: crate::types::BatchSeq) -> String {
        format!("Batch {}: {self}", seq.get())
    }
}
