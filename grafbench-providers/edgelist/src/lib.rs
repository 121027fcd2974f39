//! Line-oriented edge-list dataset provider.
//!
//! Reads the plain-text adjacency dumps the benchmark datasets ship as: one
//! edge per line, `from to [weight]`, separated by whitespace or commas.
//! Blank lines and `#` comments are skipped. The reader yields records
//! lazily, so arbitrarily large dumps stream through the sampler and the bulk
//! writer in bounded memory.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use grafbench_core::{EdgeRecord, NodeId, SourceError};

/// Errors raised while opening an edge-list dataset.
#[derive(Debug, thiserror::Error)]
pub enum EdgeListError {
    /// The dataset file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

/// A lazy edge stream over a line-oriented reader.
///
/// Implements `Iterator<Item = Result<EdgeRecord, SourceError>>`, which makes
/// it an [`grafbench_core::EdgeStream`] via the blanket impl.
///
/// # Examples
/// ```
/// use grafbench_core::EdgeStream;
/// use grafbench_providers_edgelist::EdgeListSource;
///
/// let data = "# toy graph\n1 2 0.5\n2,3\n";
/// let mut source = EdgeListSource::from_reader(data.as_bytes());
///
/// let first = source.next_edge()?.expect("two records expected");
/// assert_eq!(first.weight, 0.5);
/// let second = source.next_edge()?.expect("two records expected");
/// assert_eq!(second.to.get(), 3);
/// assert!(source.next_edge()?.is_none());
/// # Ok::<(), grafbench_core::SourceError>(())
/// ```
#[derive(Debug)]
pub struct EdgeListSource<R> {
    reader: R,
    line: u64,
    buffer: String,
}

impl EdgeListSource<BufReader<File>> {
    /// Opens a dataset file for streaming.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] when the file cannot be opened.
    pub fn try_from_path(path: impl AsRef<Path>) -> Result<Self, EdgeListError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EdgeListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> EdgeListSource<R> {
    /// Wraps an already-open buffered reader.
    #[must_use]
    pub const fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    fn parse_line(&self) -> Result<Option<EdgeRecord>, SourceError> {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let mut fields = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty());
        let from = self.parse_node(fields.next())?;
        let to = self.parse_node(fields.next())?;
        let mut record = EdgeRecord::new(from, to);
        if let Some(raw) = fields.next() {
            let weight: f64 = raw.parse().map_err(|_| self.malformed("weight is not a number"))?;
            record = record.with_weight(weight);
        }
        if fields.next().is_some() {
            return Err(self.malformed("more than three fields"));
        }
        Ok(Some(record))
    }

    fn parse_node(&self, field: Option<&str>) -> Result<NodeId, SourceError> {
        let raw = field.ok_or_else(|| self.malformed("fewer than two fields"))?;
        let id: u64 = raw
            .parse()
            .map_err(|_| self.malformed("endpoint is not an integer"))?;
        Ok(NodeId::new(id))
    }

    fn malformed(&self, message: &str) -> SourceError {
        SourceError::Malformed {
            line: self.line,
            message: message.to_owned(),
        }
    }
}

impl<R: BufRead> Iterator for EdgeListSource<R> {
    type Item = Result<EdgeRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(SourceError::Io(err))),
            }
            self.line = self.line.saturating_add(1);
            match self.parse_line() {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
