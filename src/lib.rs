//! News-QA Dataset Preprocessing Toolkit
//!
//! Tools for preparing news-article question-answering datasets: entity
//! anonymization, story/highlight extraction, and de-anonymization.
//!
//! This library provides:
//! - `substitute`: Core bidirectional entity substitution engine
//! - `entity`: Per-document entity remapping and `.entities` files
//! - `normalize` / `split`: Story line normalization and sectioning
//! - `writer`: Content-addressed per-split output
//! - `pipeline`: Batch workflows driving the above
//!
//! Binaries:
//! - `qa-prep`: Full preprocessing run over a question/story dataset tree
//! - `unanonymize`: Restore surface text from anonymized lines

pub mod entity;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod split;
pub mod substitute;
pub mod tokenize;
pub mod writer;

// Re-export the types most callers need
pub use entity::{build_mapping, EntityMapping, EntityRecord};
pub use error::{PrepError, Result};
pub use substitute::{substitute, Direction};
