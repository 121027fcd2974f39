//! Edge and node identifier types shared across samplers, writers, and stores.
//!
//! Nodes have no record of their own; they exist only as the endpoints of
//! edges. A raw [`EdgeRecord`] flows out of a dataset stream, and a persisted
//! [`Edge`] is what a store's primary and staging tables hold. Both tables use
//! the same row shape.

/// Identifier of a node derived from edge endpoints.
///
/// Node identifiers are positive; zero marks an invalid endpoint and records
/// carrying one are dropped during write validation.
///
/// # Examples
/// ```
/// use grafbench_core::NodeId;
///
/// let node = NodeId::new(42);
/// assert_eq!(node.get(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new node identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// Identifier assigned to an edge once it is persisted.
///
/// # Examples
/// ```
/// use grafbench_core::EdgeId;
///
/// let id = EdgeId::new(7);
/// assert_eq!(id.get(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new edge identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// A raw directed edge as produced by a dataset stream.
///
/// `id` is populated only when the dataset itself assigns identifiers; fresh
/// imports receive monotonically increasing identifiers from the write
/// pipeline instead.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// Dataset-assigned identifier, if any.
    pub id: Option<EdgeId>,
    /// Source endpoint.
    pub from: NodeId,
    /// Target endpoint.
    pub to: NodeId,
    /// Numeric edge weight.
    pub weight: f64,
    /// Opaque attribute payload carried through unparsed.
    pub attributes: Option<String>,
}

impl EdgeRecord {
    /// Creates a record between two endpoints with unit weight and no payload.
    ///
    /// # Examples
    /// ```
    /// use grafbench_core::{EdgeRecord, NodeId};
    ///
    /// let record = EdgeRecord::new(NodeId::new(1), NodeId::new(2));
    /// assert_eq!(record.weight, 1.0);
    /// assert!(record.id.is_none());
    /// ```
    #[must_use]
    pub const fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            id: None,
            from,
            to,
            weight: 1.0,
            attributes: None,
        }
    }

    /// Sets the dataset-assigned identifier.
    #[must_use]
    pub const fn with_id(mut self, id: EdgeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the edge weight.
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns whether both endpoints are positive node identifiers.
    #[must_use]
    pub const fn has_valid_endpoints(&self) -> bool {
        self.from.get() != 0 && self.to.get() != 0
    }
}

/// An edge persisted in a store's primary table.
///
/// The staging table reuses this shape; there is no separate staging entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Monotonically assigned identifier.
    pub id: EdgeId,
    /// Source endpoint.
    pub from: NodeId,
    /// Target endpoint.
    pub to: NodeId,
    /// Numeric edge weight.
    pub weight: f64,
    /// Opaque attribute payload.
    pub attributes: Option<String>,
}

impl Edge {
    /// Builds a persisted edge from a raw record and an assigned identifier.
    #[must_use]
    pub fn from_record(record: EdgeRecord, id: EdgeId) -> Self {
        Self {
            id,
            from: record.from,
            to: record.to,
            weight: record.weight,
            attributes: record.attributes,
        }
    }
}
