//! Collexeme: distinctive collexeme analysis and sentence tagging
//!
//! Measures how strongly verbs associate with the causative versus the
//! intransitive frame, and frames plain-text sentences with dependency
//! analyses from an external parser.
//! Core implementation in Rust with Python bindings.

// Association analysis
pub mod allow_list; // Verb allow-lists
pub mod analyzer; // Per-verb association statistics
pub mod contingency; // 2x2 tables: chi-square, Fisher, odds ratio
pub mod dca; // End-to-end DCA pipeline (workbook -> report + plot)
pub mod frequency; // Workbook frequency tables and the merged table
pub mod label; // Association labels
pub mod plot; // SVG scatter plot
pub mod report; // CSV report

// Tagging
pub mod annotator; // Sources of sentence analyses
pub mod conllu; // CoNLL-U file parsing
pub mod tagger; // <s> block output
pub mod tree; // Analyzed sentences

pub mod config;
pub mod error;
pub mod input; // Plain or gzip text input
pub mod output; // Output files staged before rename

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use analyzer::{AssociationResult, Totals, analyze};
pub use annotator::{Annotator, CommandAnnotator, ConlluAnnotator};
pub use config::{AnnotatorSource, DcaConfig, TagConfig};
pub use conllu::CoNLLUReader;
pub use contingency::ContingencyTable;
pub use error::{AnnotateError, DcaError, TagError};
pub use frequency::{FrequencyTable, MergedRecord, MergedTable};
pub use label::{AssociationLabel, assign_label};
pub use tagger::{tag_file, tagged_output_path};
pub use tree::{Tree, Word};
