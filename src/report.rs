//! CSV report of association results

use crate::analyzer::AssociationResult;
use crate::error::ReportError;
use crate::label::AssociationLabel;
use crate::output::staging_file;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Column order of the report
pub const HEADER: [&str; 8] = [
    "Verb",
    "Freq_in_Causative",
    "Freq_in_Intransitive",
    "Log_Likelihood",
    "p_value_chi2",
    "Fisher_p_value",
    "Log_Odds_Ratio",
    "Label",
];

/// One report row; fields follow [`HEADER`]
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    verb: &'a str,
    freq_causative: u64,
    freq_intransitive: u64,
    chi2_statistic: f64,
    p_value_chi2: f64,
    p_value_fisher: f64,
    log_odds_ratio: f64,
    label: AssociationLabel,
}

impl<'a> From<&'a AssociationResult> for ReportRow<'a> {
    fn from(r: &'a AssociationResult) -> Self {
        Self {
            verb: &r.verb,
            freq_causative: r.freq_causative,
            freq_intransitive: r.freq_intransitive,
            chi2_statistic: r.chi2_statistic,
            p_value_chi2: r.p_value_chi2,
            p_value_fisher: r.p_value_fisher,
            log_odds_ratio: r.log_odds_ratio,
            label: r.label,
        }
    }
}

/// Write results in the given order, header first
pub fn write_report<W: Write>(writer: W, results: &[AssociationResult]) -> Result<(), ReportError> {
    // Header written by hand so an empty report still has one
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for result in results {
        wtr.serialize(ReportRow::from(result))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the report to a temporary file next to `path`
///
/// Nothing appears at `path` until [`commit_report`] is called.
pub fn stage_report(path: &Path, results: &[AssociationResult]) -> Result<NamedTempFile, ReportError> {
    let mut tmp = staging_file(path)?;
    write_report(tmp.as_file_mut(), results)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Move a staged report into place at `path`
pub fn commit_report(tmp: NamedTempFile, path: &Path) -> Result<(), ReportError> {
    tmp.persist(path).map_err(|e| ReportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    log::info!("Wrote report to {}", path.display());
    Ok(())
}

/// Write the report to `path`, replacing it only once fully written
pub fn write_report_file(path: &Path, results: &[AssociationResult]) -> Result<(), ReportError> {
    let tmp = stage_report(path, results)?;
    commit_report(tmp, path)?;
    log::debug!("{} report rows", results.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(verb: &str, label: AssociationLabel) -> AssociationResult {
        AssociationResult {
            verb: verb.to_string(),
            freq_causative: 40,
            freq_intransitive: 10,
            chi2_statistic: 17.5,
            p_value_chi2: 0.25,
            p_value_fisher: 1.0,
            log_odds_ratio: -1.5,
            label,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let results = vec![
            result("break", AssociationLabel::WeakAttractor),
            result("melt", AssociationLabel::NotSignificant),
        ];
        let mut buf = Vec::new();
        write_report(&mut buf, &results).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Verb,Freq_in_Causative,Freq_in_Intransitive,Log_Likelihood,p_value_chi2,Fisher_p_value,Log_Odds_Ratio,Label"
        );
        assert_eq!(lines[1], "break,40,10,17.5,0.25,1.0,-1.5,weak attractor");
        assert_eq!(lines[2], "melt,40,10,17.5,0.25,1.0,-1.5,not significant");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_report_has_header() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_quotes_verbs_with_commas() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[result("break, up", AssociationLabel::Neutral)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("\"break, up\","));
    }

    #[test]
    fn test_write_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dca_result_COS.csv");
        std::fs::write(&path, "stale").unwrap();

        write_report_file(&path, &[result("break", AssociationLabel::Neutral)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Verb,"));
        assert_eq!(text.lines().count(), 2);
        // No temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_staged_report_not_visible_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dca_result_COS.csv");

        let tmp = stage_report(&path, &[result("break", AssociationLabel::Neutral)]).unwrap();
        assert!(!path.exists());

        // Dropping a staged report leaves nothing behind
        drop(tmp);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let tmp = stage_report(&path, &[result("break", AssociationLabel::Neutral)]).unwrap();
        commit_report(tmp, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Verb,"));
    }
}
