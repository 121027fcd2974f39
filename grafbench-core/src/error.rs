//! Error types for the grafbench core library.
//!
//! Defines the error enums exposed by the public API together with stable
//! machine-readable error codes.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while pulling records from an edge stream.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading from the underlying dataset failed.
    #[error("I/O failure while reading edge stream: {0}")]
    Io(#[from] std::io::Error),
    /// A record could not be parsed into an edge.
    #[error("malformed edge record on line {line}: {message}")]
    Malformed {
        /// One-based line number of the offending record.
        line: u64,
        /// Human-readable parse failure.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`SourceError`] variants.
    enum SourceErrorCode for SourceError {
        /// Reading from the underlying dataset failed.
        Io => Io { .. } => "SOURCE_IO",
        /// A record could not be parsed into an edge.
        Malformed => Malformed { .. } => "SOURCE_MALFORMED",
    }
}

/// An error surfaced by a [`crate::StagedStore`] collaborator.
///
/// Store failures are propagated to the caller unmodified; the core never
/// retries internally. Retry policy belongs to the benchmark driver.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Human-readable failure description from the store.
        message: String,
    },
    /// A merge violated a store constraint, typically a duplicate identifier
    /// under an insert-only policy.
    #[error("store constraint violated: {message}")]
    Constraint {
        /// Human-readable constraint description from the store.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`StoreError`] variants.
    enum StoreErrorCode for StoreError {
        /// The store could not be reached or refused the operation.
        Unavailable => Unavailable { .. } => "STORE_UNAVAILABLE",
        /// A merge violated a store constraint.
        Constraint => Constraint { .. } => "STORE_CONSTRAINT",
    }
}

/// Error type produced by [`crate::TaskSampler`] operations.
///
/// Undersized input is never an error: all requested counts are clamped to
/// what the reservoir actually holds.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SampleError {
    /// The node range cannot yield two distinct endpoints, so rejection
    /// sampling of self-loop-free edges would never terminate.
    #[error("node count {node_count} leaves fewer than two distinct node identifiers in [1, {node_count})")]
    DegenerateNodeRange {
        /// Exclusive upper bound supplied by the caller.
        node_count: u64,
    },
    /// The underlying edge stream failed mid-pass.
    #[error("edge stream failed: {source}")]
    Source {
        /// Underlying stream error, propagated unmodified.
        #[from]
        source: SourceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SampleError`] variants.
    enum SampleErrorCode for SampleError {
        /// The node range cannot yield two distinct endpoints.
        DegenerateNodeRange => DegenerateNodeRange { .. } => "SAMPLE_DEGENERATE_NODE_RANGE",
        /// The underlying edge stream failed mid-pass.
        SourceFailure => Source { .. } => "SAMPLE_SOURCE_FAILURE",
    }
}

/// Error type produced by [`crate::StagedBulkWriter`] operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ImportError {
    /// The staging table held rows before the run started. A previous failure
    /// skipped its truncate step; this is a logic error in the calling
    /// workflow, not a condition the writer recovers from.
    #[error("staging table holds {staged} rows from a previous run; truncate before retrying")]
    DirtyStaging {
        /// Number of rows found in the staging table.
        staged: usize,
    },
    /// An identifier-keyed upsert met a record without an identifier.
    #[error("record at stream position {position} carries no edge id to merge on")]
    MissingMergeId {
        /// One-based position of the record within the input stream.
        position: u64,
    },
    /// The input stream failed mid-import.
    #[error("edge stream failed: {source}")]
    Source {
        /// Underlying stream error, propagated unmodified.
        #[from]
        source: SourceError,
    },
    /// A store operation failed.
    #[error("store operation failed: {source}")]
    Store {
        /// Underlying store error, propagated unmodified.
        #[from]
        source: StoreError,
    },
}

define_error_codes! {
    /// Stable codes describing [`ImportError`] variants.
    enum ImportErrorCode for ImportError {
        /// The staging table held rows before the run started.
        DirtyStaging => DirtyStaging { .. } => "IMPORT_DIRTY_STAGING",
        /// An identifier-keyed upsert met a record without an identifier.
        MissingMergeId => MissingMergeId { .. } => "IMPORT_MISSING_MERGE_ID",
        /// The input stream failed mid-import.
        SourceFailure => Source { .. } => "IMPORT_SOURCE_FAILURE",
        /// A store operation failed.
        StoreFailure => Store { .. } => "IMPORT_STORE_FAILURE",
    }
}

impl ImportError {
    /// Retrieve the inner [`StoreErrorCode`] when the failure originated in the store.
    pub const fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            Self::Store { source } => Some(source.code()),
            _ => None,
        }
    }
}
