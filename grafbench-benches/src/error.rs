//! Benchmark setup error type.
//!
//! Aggregates the error types that may arise during benchmark data
//! preparation so that setup functions can propagate failures with `?`
//! instead of using `.expect()`.

use grafbench_core::{ImportError, SampleError, SourceError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic edge stream configuration was invalid.
    #[error("synthetic stream requires at least three nodes (got {node_count})")]
    DegenerateStream {
        /// Configured node range bound.
        node_count: u64,
    },
    /// Task sampling failed.
    #[error("task sampling failed: {0}")]
    Sample(#[from] SampleError),
    /// Bulk import failed.
    #[error("bulk import failed: {0}")]
    Import(#[from] ImportError),
    /// An edge stream failed while materializing fixture data.
    #[error("edge stream failed: {0}")]
    Source(#[from] SourceError),
}
