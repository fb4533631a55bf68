//! Distinctive collexeme analysis of verb frame counts
//!
//! Reads the causative and intransitive count sheets of a workbook, keeps
//! the allow-listed verbs, and writes a CSV report and an SVG scatter plot.

use anyhow::Context;
use clap::Parser;
use collexeme::DcaConfig;
use collexeme::dca::run;
use collexeme::plot::PlotOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workbook with the count sheets (xlsx, xlsm, xlsb, xls or ods)
    #[arg(long, default_value = "result_v2.xlsx")]
    workbook: PathBuf,

    /// Verbs to analyze, one per line
    #[arg(long, default_value = "COS verb_list_279.txt")]
    allow_list: PathBuf,

    /// Sheet with causative (transitive) frame counts
    #[arg(long, default_value = "transitive_count")]
    transitive_sheet: String,

    /// Sheet with intransitive frame counts
    #[arg(long, default_value = "intransitive_count")]
    intransitive_sheet: String,

    /// CSV report
    #[arg(long, default_value = "dca_result_COS.csv")]
    report: PathBuf,

    /// SVG scatter plot
    #[arg(long, default_value = "dca_cos_final_plot.svg")]
    plot: PathBuf,

    /// Skip the plot
    #[arg(long)]
    no_plot: bool,

    /// Verbs annotated per label in the plot
    #[arg(long, default_value_t = 8)]
    label_top_n: usize,

    /// Seed for the annotation jitter
    #[arg(long)]
    seed: Option<u64>,

    /// The log level
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    log_level: log::LevelFilter,
}

impl From<Args> for DcaConfig {
    fn from(args: Args) -> Self {
        DcaConfig {
            workbook: args.workbook,
            allow_list: args.allow_list,
            transitive_sheet: args.transitive_sheet,
            intransitive_sheet: args.intransitive_sheet,
            report: args.report,
            plot: (!args.no_plot).then_some(args.plot),
            plot_options: PlotOptions {
                label_top_n: args.label_top_n,
                seed: args.seed,
                ..PlotOptions::default()
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let config = DcaConfig::from(args);
    let results = run(&config)
        .with_context(|| format!("analysis of {} failed", config.workbook.display()))?;

    println!(
        "{} verbs written to {}",
        results.len(),
        config.report.display()
    );
    Ok(())
}
