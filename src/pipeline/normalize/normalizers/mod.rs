// Base trait shared by source-specific normalizers
pub mod base;

// Individual normalizer implementations
pub mod abb_home;
pub mod bir_bank;
pub mod pasha_bank;
pub mod xalq_bank;

// Re-export the main components
pub use abb_home::AbbHomeNormalizer;
pub use base::SourceNormalizer;
pub use bir_bank::BirBankNormalizer;
pub use pasha_bank::PashaBankNormalizer;
pub use xalq_bank::XalqBankNormalizer;
