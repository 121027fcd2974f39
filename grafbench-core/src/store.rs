//! Staged store abstraction targeted by the bulk write pipeline.
//!
//! A store pairs a durable, indexed primary edge table with a disposable,
//! unindexed staging table of identical row shape. The writer fills the
//! staging table in batches and folds it into the primary table with a single
//! merge, deferring all index maintenance to one pass.

use crate::{
    edge::{Edge, EdgeId},
    error::StoreError,
};

/// Field(s) deciding whether a staged row replaces an existing primary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKey {
    /// Merge on the assigned edge identifier. Reproduces the historical
    /// behaviour; records must already carry identifiers.
    EdgeId,
    /// Merge on the `(from, to)` natural key. Re-importing the same dataset
    /// is idempotent under this key.
    Endpoints,
}

/// Conflict policy applied when staged rows are merged into the primary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Fresh import: every staged row must be new. A duplicate identifier is
    /// a constraint violation, never a silent drop.
    Insert,
    /// Insert-or-replace keyed by the given [`MergeKey`].
    Upsert(MergeKey),
}

/// A store exposing staging-table semantics for bulk writes.
///
/// The writer assumes exclusive ownership of the staging area for the
/// duration of one stage→merge→truncate cycle; stores serving concurrent
/// writers must provide their own mutual exclusion.
///
/// # Examples
/// ```
/// use grafbench_core::{Edge, EdgeId, MergePolicy, StagedStore, StoreError};
///
/// #[derive(Default)]
/// struct Toy {
///     primary: Vec<Edge>,
///     staging: Vec<Edge>,
/// }
///
/// impl StagedStore for Toy {
///     fn max_batch_size(&self) -> usize { 1000 }
///     fn max_edge_id(&self) -> Result<Option<EdgeId>, StoreError> {
///         Ok(self.primary.iter().map(|e| e.id).max())
///     }
///     fn stage_batch(&mut self, batch: Vec<Edge>) -> Result<(), StoreError> {
///         self.staging.extend(batch);
///         Ok(())
///     }
///     fn staged_count(&self) -> Result<usize, StoreError> { Ok(self.staging.len()) }
///     fn merge_staged(&mut self, _policy: MergePolicy) -> Result<(), StoreError> {
///         self.primary.append(&mut self.staging.clone());
///         Ok(())
///     }
///     fn truncate_staging(&mut self) -> Result<(), StoreError> {
///         self.staging.clear();
///         Ok(())
///     }
///     fn edge_count(&self) -> Result<usize, StoreError> { Ok(self.primary.len()) }
/// }
///
/// let store = Toy::default();
/// assert_eq!(store.edge_count()?, 0);
/// # Ok::<(), StoreError>(())
/// ```
pub trait StagedStore {
    /// Largest number of rows the store accepts in one staged batch.
    fn max_batch_size(&self) -> usize;

    /// Largest identifier present in the primary table, `None` when empty.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot be queried.
    fn max_edge_id(&self) -> Result<Option<EdgeId>, StoreError>;

    /// Appends a batch to the staging table. No uniqueness or index checks
    /// are performed at this point.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the staging write fails.
    fn stage_batch(&mut self, batch: Vec<Edge>) -> Result<(), StoreError>;

    /// Number of rows currently held in the staging table.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot be queried.
    fn staged_count(&self) -> Result<usize, StoreError>;

    /// Folds all staged rows into the primary table under `policy`.
    ///
    /// A failed merge must leave the primary table unchanged; the staging
    /// table may be left in an undefined but re-truncatable state.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the merge fails or violates `policy`.
    fn merge_staged(&mut self, policy: MergePolicy) -> Result<(), StoreError>;

    /// Empties the staging table.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the truncate fails.
    fn truncate_staging(&mut self) -> Result<(), StoreError>;

    /// Number of rows in the primary table.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot be queried.
    fn edge_count(&self) -> Result<usize, StoreError>;
}
