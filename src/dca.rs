//! The DCA pipeline: load, merge, filter, analyze, report, plot

use crate::allow_list::VerbAllowList;
use crate::analyzer::{AssociationResult, analyze};
use crate::config::DcaConfig;
use crate::error::DcaError;
use crate::frequency::{FrequencyTable, MergedTable, load_frames};
use crate::plot::{commit_plot, stage_plot};
use crate::report::{commit_report, stage_report};

/// Merge both frame tables, keep allow-listed verbs and analyze them
pub fn analyze_tables(
    trans: &FrequencyTable,
    intrans: &FrequencyTable,
    allow_list: &VerbAllowList,
) -> Vec<AssociationResult> {
    let merged = MergedTable::merge(trans, intrans);
    let filtered = merged.filter(allow_list);
    log::info!(
        "{} of {} merged verbs are allow-listed",
        filtered.len(),
        merged.len()
    );
    analyze(&filtered)
}

/// Run the whole pipeline
///
/// All inputs are read and both outputs fully rendered before anything
/// appears under its final name. A failed run leaves neither report nor plot.
pub fn run(config: &DcaConfig) -> Result<Vec<AssociationResult>, DcaError> {
    let (trans, intrans) = load_frames(
        &config.workbook,
        &config.transitive_sheet,
        &config.intransitive_sheet,
    )?;
    let allow_list = VerbAllowList::from_file(&config.allow_list)?;

    let results = analyze_tables(&trans, &intrans, &allow_list);
    let significant = results.iter().filter(|r| r.label.is_significant()).count();
    log::info!(
        "{} verbs analyzed, {} significant",
        results.len(),
        significant
    );

    let report = stage_report(&config.report, &results)?;
    let plot = match &config.plot {
        Some(path) => Some((stage_plot(path, &results, &config.plot_options)?, path)),
        None => None,
    };

    commit_report(report, &config.report)?;
    if let Some((tmp, path)) = plot {
        if let Err(e) = commit_plot(tmp, path) {
            if let Err(rm) = std::fs::remove_file(&config.report) {
                log::warn!("Could not remove {}: {}", config.report.display(), rm);
            }
            return Err(e.into());
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::AssociationLabel;
    use crate::report::write_report;
    use std::path::PathBuf;

    fn table(pairs: &[(&str, u64)]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for (verb, count) in pairs {
            t.add(verb, *count);
        }
        t
    }

    fn inputs() -> (FrequencyTable, FrequencyTable, VerbAllowList) {
        let trans = table(&[
            ("break", 40),
            ("melt", 2),
            ("open", 30),
            ("shatter", 12),
            ("eat", 500),
            ("dry", 0),
        ]);
        let intrans = table(&[("melt", 60), ("break", 10), ("open", 28), ("shatter", 11), ("sleep", 90)]);
        let allow = VerbAllowList::from_verbs(["break", "melt", "open", "shatter", "dry", "freeze"]);
        (trans, intrans, allow)
    }

    #[test]
    fn test_only_allow_listed_verbs() {
        let (trans, intrans, allow) = inputs();
        let results = analyze_tables(&trans, &intrans, &allow);

        let mut verbs: Vec<&str> = results.iter().map(|r| r.verb.as_str()).collect();
        verbs.sort_unstable();
        // dry is attested in neither frame, freeze is absent from both sheets
        assert_eq!(verbs, ["break", "melt", "open", "shatter"]);
    }

    #[test]
    fn test_totals_from_filtered_table() {
        let (trans, intrans, allow) = inputs();
        let results = analyze_tables(&trans, &intrans, &allow);

        let causative: u64 = results.iter().map(|r| r.freq_causative).sum();
        let intransitive: u64 = results.iter().map(|r| r.freq_intransitive).sum();
        assert_eq!(causative, 84);
        assert_eq!(intransitive, 109);

        let melt = results.iter().find(|r| r.verb == "melt").unwrap();
        assert_eq!(melt.label, AssociationLabel::StrongRepeller);
    }

    #[test]
    fn test_report_is_reproducible() {
        let (trans, intrans, allow) = inputs();
        let render = || {
            let mut buf = Vec::new();
            write_report(&mut buf, &analyze_tables(&trans, &intrans, &allow)).unwrap();
            buf
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_missing_workbook_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = DcaConfig {
            workbook: dir.path().join("missing.xlsx"),
            allow_list: dir.path().join("verbs.txt"),
            report: dir.path().join("report.csv"),
            plot: Some(dir.path().join("plot.svg")),
            ..DcaConfig::default()
        };

        let err = run(&config).unwrap_err();
        assert!(matches!(err, DcaError::Frequency(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    fn workbook_config(dir: &std::path::Path) -> DcaConfig {
        let allow_list = dir.join("verbs.txt");
        std::fs::write(&allow_list, "break\nmelt\nopen\nshatter\ncrack\ndry\nfreeze\n").unwrap();
        DcaConfig {
            workbook: std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/cos_counts.xlsx"),
            allow_list,
            report: dir.join("dca_result_COS.csv"),
            plot: Some(dir.join("dca_cos_final_plot.svg")),
            plot_options: crate::plot::PlotOptions {
                seed: Some(3),
                ..Default::default()
            },
            ..DcaConfig::default()
        }
    }

    #[test]
    fn test_run_on_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let config = workbook_config(dir.path());

        let results = run(&config).unwrap();
        let mut verbs: Vec<&str> = results.iter().map(|r| r.verb.as_str()).collect();
        verbs.sort_unstable();
        assert_eq!(verbs, ["break", "crack", "melt", "open", "shatter"]);

        let report = std::fs::read_to_string(&config.report).unwrap();
        assert_eq!(report.lines().count(), 6);
        assert!(report.starts_with("Verb,Freq_in_Causative,"));

        let plot = config.plot.as_ref().unwrap();
        assert!(std::fs::metadata(plot).unwrap().len() > 0);
        // Only the allow-list and the two outputs, no leftover temporaries
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_run_twice_gives_identical_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = workbook_config(dir.path());

        run(&config).unwrap();
        let first = std::fs::read(&config.report).unwrap();
        // Unseeded jitter must not affect the report
        let config = DcaConfig {
            plot_options: crate::plot::PlotOptions::default(),
            ..config
        };
        run(&config).unwrap();
        assert_eq!(std::fs::read(&config.report).unwrap(), first);
    }

    #[test]
    fn test_plot_failure_leaves_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = DcaConfig {
            plot: Some(dir.path().join("missing").join("plot.svg")),
            ..workbook_config(dir.path())
        };

        let err = run(&config).unwrap_err();
        assert!(matches!(err, DcaError::Plot(_)));
        assert!(!config.report.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_run_without_plot() {
        let dir = tempfile::tempdir().unwrap();
        let config = DcaConfig {
            plot: None,
            ..workbook_config(dir.path())
        };

        run(&config).unwrap();
        assert!(config.report.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_default_config() {
        let config = DcaConfig::default();
        assert_eq!(config.workbook, PathBuf::from("result_v2.xlsx"));
        assert_eq!(config.report, PathBuf::from("dca_result_COS.csv"));
        assert_eq!(config.plot, Some(PathBuf::from("dca_cos_final_plot.svg")));
        assert_eq!(config.plot_options.label_top_n, 8);
    }
}
