//! Edge stream abstraction consumed by the sampler and the bulk writer.

use crate::{edge::EdgeRecord, error::SourceError};

/// A forward-only, fallible stream of raw edge records.
///
/// Streams are consumed exactly once. Implementors are usually dataset
/// readers of unknown length; failures are surfaced through [`SourceError`]
/// and propagated to the caller unmodified.
///
/// Every `Iterator<Item = Result<EdgeRecord, SourceError>>` is an edge
/// stream, so in-memory fixtures need no dedicated type.
///
/// # Examples
/// ```
/// use grafbench_core::{EdgeRecord, EdgeStream, NodeId};
///
/// let records = vec![
///     EdgeRecord::new(NodeId::new(1), NodeId::new(2)),
///     EdgeRecord::new(NodeId::new(2), NodeId::new(3)),
/// ];
/// let mut stream = records.into_iter().map(Ok);
///
/// let first = stream.next_edge()?.expect("stream holds two records");
/// assert_eq!(first.from, NodeId::new(1));
/// # Ok::<(), grafbench_core::SourceError>(())
/// ```
pub trait EdgeStream {
    /// Pulls the next record, `None` once the stream is exhausted.
    ///
    /// # Errors
    /// Returns [`SourceError`] when the underlying dataset fails to produce a
    /// record.
    fn next_edge(&mut self) -> Result<Option<EdgeRecord>, SourceError>;
}

impl<I> EdgeStream for I
where
    I: Iterator<Item = Result<EdgeRecord, SourceError>>,
{
    fn next_edge(&mut self) -> Result<Option<EdgeRecord>, SourceError> {
        self.next().transpose()
    }
}
