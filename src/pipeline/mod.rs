// Pure extraction and normalization stages; no network or file I/O here
pub mod extract;
pub mod normalize;

// Re-export the entry points of each stage
pub use extract::{extract, extract_html, Extraction, Tactic};
pub use normalize::registry::NormalizationRegistry;
pub use normalize::{coalesce, CanonicalRow, SourceRow};
