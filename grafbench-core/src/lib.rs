//! Grafbench core library.
//!
//! Two independent components consumed together by a benchmark driver: a
//! deterministic, memory-bounded [`TaskSampler`] that turns an edge stream or
//! a synthetic distribution into a fixed [`Workload`], and a
//! [`StagedBulkWriter`] that persists large edge sequences through a store's
//! staging table with a single bulk merge.

mod edge;
mod error;
mod sampler;
mod source;
mod store;
#[cfg(test)]
mod test_utils;
mod workload;
mod writer;

pub use crate::{
    edge::{Edge, EdgeId, EdgeRecord, NodeId},
    error::{
        ImportError, ImportErrorCode, SampleError, SampleErrorCode, SourceError, SourceErrorCode,
        StoreError, StoreErrorCode,
    },
    sampler::{SamplerConfig, TaskSampler},
    source::EdgeStream,
    store::{MergeKey, MergePolicy, StagedStore},
    workload::{MUTATION_BATCH_LEN, Workload, batch_mutations},
    writer::StagedBulkWriter,
};
