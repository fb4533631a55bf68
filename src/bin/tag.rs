//! Frame plain-text sentences with dependency analyses
//!
//! Writes `<input>_tagged.txt` next to the input file.

use anyhow::Context;
use clap::{ArgGroup, Parser};
use collexeme::{AnnotatorSource, TagConfig, tag_file};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["conllu", "command"])))]
struct Args {
    /// Text file with one sentence per line (may be gzip-compressed)
    input: PathBuf,

    /// CoNLL-U analyses of the input, produced beforehand by a parser
    #[arg(long)]
    conllu: Option<PathBuf>,

    /// Parser command run once per sentence (sentence on stdin, CoNLL-U on stdout)
    #[arg(long)]
    command: Option<String>,

    /// Argument passed to the parser command; repeatable
    #[arg(long = "arg", requires = "command", allow_hyphen_values = true)]
    args: Vec<String>,

    /// The log level
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    log_level: log::LevelFilter,
}

impl Args {
    fn into_config(self) -> anyhow::Result<TagConfig> {
        let source = match (self.conllu, self.command) {
            (Some(path), _) => AnnotatorSource::Conllu(path),
            (None, Some(program)) => AnnotatorSource::Command {
                program,
                args: self.args,
            },
            (None, None) => anyhow::bail!("one of --conllu or --command is required"),
        };
        Ok(TagConfig::new(self.input, source))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let config = args.into_config()?;
    let output = tag_file(&config)
        .with_context(|| format!("tagging {} failed", config.input.display()))?;
    println!("{}", output.display());
    Ok(())
}
