//! Run configuration for the two pipelines

use crate::plot::PlotOptions;
use std::path::PathBuf;

/// Where sentence analyses come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorSource {
    /// CoNLL-U file written beforehand by an external parser
    Conllu(PathBuf),
    /// Parser command run once per sentence
    Command { program: String, args: Vec<String> },
}

/// Tagger run
#[derive(Debug, Clone)]
pub struct TagConfig {
    pub input: PathBuf,
    pub source: AnnotatorSource,
}

impl TagConfig {
    pub fn new(input: PathBuf, source: AnnotatorSource) -> Self {
        Self { input, source }
    }
}

/// Distinctive collexeme analysis run
#[derive(Debug, Clone)]
pub struct DcaConfig {
    pub workbook: PathBuf,
    pub allow_list: PathBuf,
    pub transitive_sheet: String,
    pub intransitive_sheet: String,
    pub report: PathBuf,
    /// None skips the figure
    pub plot: Option<PathBuf>,
    pub plot_options: PlotOptions,
}

impl Default for DcaConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("result_v2.xlsx"),
            allow_list: PathBuf::from("COS verb_list_279.txt"),
            transitive_sheet: "transitive_count".to_string(),
            intransitive_sheet: "intransitive_count".to_string(),
            report: PathBuf::from("dca_result_COS.csv"),
            plot: Some(PathBuf::from("dca_cos_final_plot.svg")),
            plot_options: PlotOptions::default(),
        }
    }
}
