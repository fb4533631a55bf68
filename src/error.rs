//! Error types for both pipelines

use crate::conllu::ConlluError;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors while loading frequency tables from a workbook
#[derive(Debug, Error)]
pub enum FrequencyError {
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' could not be read: {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' is empty")]
    EmptySheet { sheet: String },

    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: &'static str },

    #[error("sheet '{sheet}', row {row}: invalid count {value:?}")]
    InvalidCount {
        sheet: String,
        row: usize,
        value: String,
    },
}

/// Errors while loading the verb allow-list
#[derive(Debug, Error)]
pub enum AllowListError {
    #[error("failed to read allow-list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("allow-list {path} contains no verbs")]
    Empty { path: PathBuf },
}

/// Errors while writing the CSV report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error writing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error writing report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to move report into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while rendering the scatter plot
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("I/O error writing plot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to move plot into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any fatal error of the DCA pipeline
#[derive(Debug, Error)]
pub enum DcaError {
    #[error(transparent)]
    Frequency(#[from] FrequencyError),

    #[error(transparent)]
    AllowList(#[from] AllowListError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// Errors while annotating a sentence
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Conllu(#[from] ConlluError),

    #[error("no analysis left for sentence {sentence:?}")]
    Exhausted { sentence: String },

    #[error("analysis {analysis:?} does not match sentence {sentence:?}")]
    Mismatch { sentence: String, analysis: String },

    #[error("annotator command '{program}' failed with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("annotator output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors of the tagger pipeline
#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to set up annotator: {0}")]
    Setup(#[source] AnnotateError),

    #[error("failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sentence {id}: {source}")]
    Annotate {
        id: usize,
        #[source]
        source: AnnotateError,
    },

    #[error("I/O error writing tagged output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to move tagged output into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
