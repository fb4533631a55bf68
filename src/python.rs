//! Python bindings for collexeme
//!
//! This module provides PyO3-based Python bindings for the Rust core.

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::allow_list::VerbAllowList;
use crate::analyzer::AssociationResult as RustAssociationResult;
use crate::config::DcaConfig;
use crate::dca::{analyze_tables, run};
use crate::error::{DcaError, FrequencyError};
use crate::frequency::FrequencyTable;
use crate::label::assign_label as rust_assign_label;
use crate::plot::PlotOptions;
use crate::tagger::tagged_output_path as rust_tagged_output_path;

/// Convert DcaError to Python exception
impl From<DcaError> for PyErr {
    fn from(err: DcaError) -> PyErr {
        match err {
            DcaError::Frequency(FrequencyError::Workbook { .. }) | DcaError::AllowList(_) => {
                PyIOError::new_err(err.to_string())
            }
            DcaError::Frequency(_) => PyValueError::new_err(err.to_string()),
            DcaError::Report(_) | DcaError::Plot(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

#[pyclass(name = "AssociationResult", frozen)]
#[derive(Clone)]
pub struct PyAssociationResult {
    inner: RustAssociationResult,
}

#[pymethods]
impl PyAssociationResult {
    #[getter]
    fn verb(&self) -> &str {
        &self.inner.verb
    }

    #[getter]
    fn freq_causative(&self) -> u64 {
        self.inner.freq_causative
    }

    #[getter]
    fn freq_intransitive(&self) -> u64 {
        self.inner.freq_intransitive
    }

    #[getter]
    fn chi2_statistic(&self) -> f64 {
        self.inner.chi2_statistic
    }

    #[getter]
    fn p_value_chi2(&self) -> f64 {
        self.inner.p_value_chi2
    }

    #[getter]
    fn p_value_fisher(&self) -> f64 {
        self.inner.p_value_fisher
    }

    #[getter]
    fn log_odds_ratio(&self) -> f64 {
        self.inner.log_odds_ratio
    }

    #[getter]
    fn label(&self) -> &'static str {
        self.inner.label.as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "<AssociationResult verb='{}' log_odds={:.3} p={:.3e} label='{}'>",
            self.inner.verb, self.inner.log_odds_ratio, self.inner.p_value_chi2, self.inner.label
        )
    }
}

fn frequency_table(counts: HashMap<String, u64>) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for (verb, count) in counts {
        let verb = verb.trim();
        if !verb.is_empty() {
            table.add(verb, count);
        }
    }
    table
}

/// Association label for a log-odds ratio and chi-square p-value.
///
/// Returns one of "not significant", "strong attractor", "weak attractor",
/// "neutral", "slight repeller", "strong repeller".
#[pyfunction]
fn assign_label(log_odds_ratio: f64, p_value: f64) -> &'static str {
    rust_assign_label(log_odds_ratio, p_value).as_str()
}

/// Distinctive collexeme analysis of in-memory counts.
///
/// Args:
///     causative: verb -> count in the causative (transitive) frame
///     intransitive: verb -> count in the intransitive frame
///     allow_list: verbs to keep
///
/// Returns:
///     List of AssociationResult, largest chi-square first
#[pyfunction]
fn analyze(
    causative: HashMap<String, u64>,
    intransitive: HashMap<String, u64>,
    allow_list: Vec<String>,
) -> Vec<PyAssociationResult> {
    let allow_list = VerbAllowList::from_verbs(allow_list);
    analyze_tables(
        &frequency_table(causative),
        &frequency_table(intransitive),
        &allow_list,
    )
    .into_iter()
    .map(|inner| PyAssociationResult { inner })
    .collect()
}

/// Run the workbook pipeline, writing the CSV report and optionally a plot.
#[pyfunction]
#[pyo3(signature = (workbook, allow_list, report, plot=None, seed=None))]
fn run_dca(
    workbook: PathBuf,
    allow_list: PathBuf,
    report: PathBuf,
    plot: Option<PathBuf>,
    seed: Option<u64>,
) -> PyResult<Vec<PyAssociationResult>> {
    let config = DcaConfig {
        workbook,
        allow_list,
        report,
        plot,
        plot_options: PlotOptions {
            seed,
            ..PlotOptions::default()
        },
        ..DcaConfig::default()
    };
    Ok(run(&config)?
        .into_iter()
        .map(|inner| PyAssociationResult { inner })
        .collect())
}

/// Path the tagger writes for a given input file.
#[pyfunction]
fn tagged_output_path(path: PathBuf) -> PathBuf {
    rust_tagged_output_path(&path)
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn collexeme(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAssociationResult>()?;

    m.add_function(wrap_pyfunction!(assign_label, m)?)?;
    m.add_function(wrap_pyfunction!(analyze, m)?)?;
    m.add_function(wrap_pyfunction!(run_dca, m)?)?;
    m.add_function(wrap_pyfunction!(tagged_output_path, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
