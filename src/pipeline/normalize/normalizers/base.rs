use crate::pipeline::normalize::{CanonicalRow, SourceRow};
use crate::types::Source;

/// Maps one row of a source's intermediate table onto the canonical schema.
///
/// Implementations are pure: the same row always yields the same canonical row.
pub trait SourceNormalizer: Send + Sync {
    fn source(&self) -> Source;

    fn name(&self) -> &str;

    fn to_canonical(&self, row: &SourceRow) -> CanonicalRow;
}
