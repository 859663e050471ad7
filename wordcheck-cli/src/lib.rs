// All checking logic is in wordcheck-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod converter;

// Re-export core types for convenience
pub use wordcheck_core::*;

// Re-export CLI utilities
pub use converter::{ConversionError, SofficeConverter};
