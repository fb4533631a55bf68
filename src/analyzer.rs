//! Distinctive collexeme analysis
//!
//! Each verb is compared against all other verbs of the filtered domain:
//! its counts in the causative and intransitive frames form the first row of
//! a 2×2 table and the remaining domain counts form the second.

use crate::contingency::ContingencyTable;
use crate::frequency::{MergedRecord, MergedTable};
use crate::label::{AssociationLabel, assign_label};

/// Column sums of the filtered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total_causative: u64,
    pub total_intransitive: u64,
}

impl Totals {
    pub fn new(total_causative: u64, total_intransitive: u64) -> Self {
        Self {
            total_causative,
            total_intransitive,
        }
    }

    pub fn from_table(table: &MergedTable) -> Self {
        let (total_causative, total_intransitive) = table.column_sums();
        Self {
            total_causative,
            total_intransitive,
        }
    }
}

/// Association statistics of one verb
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationResult {
    pub verb: String,
    pub freq_causative: u64,
    pub freq_intransitive: u64,
    pub chi2_statistic: f64,
    pub p_value_chi2: f64,
    pub p_value_fisher: f64,
    pub log_odds_ratio: f64,
    pub label: AssociationLabel,
}

impl AssociationResult {
    /// Label re-derived from the stored statistics
    pub fn derived_label(&self) -> AssociationLabel {
        assign_label(self.log_odds_ratio, self.p_value_chi2)
    }
}

/// Contingency table of `record` against the rest of the domain
pub fn contingency_table(record: &MergedRecord, totals: Totals) -> ContingencyTable {
    let o11 = record.count_trans;
    let o12 = record.count_intrans;
    ContingencyTable::new(
        o11,
        o12,
        totals.total_causative.saturating_sub(o11),
        totals.total_intransitive.saturating_sub(o12),
    )
}

/// Analyze one verb; None if it occurs in neither frame
pub fn analyze_verb(record: &MergedRecord, totals: Totals) -> Option<AssociationResult> {
    if record.is_unattested() {
        return None;
    }

    let table = contingency_table(record, totals);
    let chi2 = table.chi_square();
    if table.is_degenerate() {
        log::warn!(
            "Chi-square undefined for '{}' ({:?}); reporting p = 1",
            record.verb,
            table
        );
    }

    let p_value_fisher = table.fisher_exact();
    let log_odds_ratio = table.log_odds_ratio();
    let label = assign_label(log_odds_ratio, chi2.p_value);

    log::debug!(
        "{}: {:?} chi2={:.4} p={:.3e} log_odds={:.4} -> {}",
        record.verb,
        table,
        chi2.statistic,
        chi2.p_value,
        log_odds_ratio,
        label
    );

    Some(AssociationResult {
        verb: record.verb.clone(),
        freq_causative: record.count_trans,
        freq_intransitive: record.count_intrans,
        chi2_statistic: chi2.statistic,
        p_value_chi2: chi2.p_value,
        p_value_fisher,
        log_odds_ratio,
        label,
    })
}

/// Analyze every verb of a filtered table
///
/// Totals are taken over the whole table before any verb is analyzed.
/// Results are ordered by chi-square statistic, largest first; ties keep
/// table order.
pub fn analyze(table: &MergedTable) -> Vec<AssociationResult> {
    let totals = Totals::from_table(table);
    log::info!(
        "Analyzing {} verbs (causative total {}, intransitive total {})",
        table.len(),
        totals.total_causative,
        totals.total_intransitive
    );

    let mut results: Vec<AssociationResult> = table
        .iter()
        .filter_map(|record| analyze_verb(record, totals))
        .collect();

    let skipped = table.len() - results.len();
    if skipped > 0 {
        log::info!("Skipped {} verbs attested in neither frame", skipped);
    }

    results.sort_by(|a, b| b.chi2_statistic.total_cmp(&a.chi2_statistic));
    results
}
