//! Document Preprocessors
//!
//! This module turns input documents into location-annotated blocks, the
//! unit every scanner works on.
//!
//! ## Architecture
//!
//! ```text
//! Document (DOCX, JSON model)
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! SourceDocument (body items + section headers/footers)
//!     ↓
//! [LocationTagger]
//!     ↓
//! Vec<Block>
//! ```
//!
//! ## Available Preprocessors
//!
//! - `DocxPreprocessor` - Word packages read with zip + quick-xml
//! - `JsonPreprocessor` - pre-extracted SourceDocument models
//!
//! Legacy `.doc` files are not read here; the CLI converts them to DOCX first.

pub mod docx;
pub mod json;
pub mod preprocessor;
pub mod tagger;

pub use docx::DocxPreprocessor;
pub use json::JsonPreprocessor;
pub use preprocessor::{file_extension, Preprocessor};
pub use tagger::LocationTagger;
