//! Sources of sentence analyses
//!
//! An [`Annotator`] turns one raw sentence into the dependency trees an NLP
//! pipeline produced for it. The pipeline itself is external: either its
//! CoNLL-U output was saved beforehand ([`ConlluAnnotator`]) or it is run as
//! a command per sentence ([`CommandAnnotator`]).

use crate::config::AnnotatorSource;
use crate::conllu::CoNLLUReader;
use crate::error::AnnotateError;
use crate::tree::Tree;
use std::collections::VecDeque;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Sentence in, analyzed sentences out
pub trait Annotator {
    fn annotate(&mut self, sentence: &str) -> Result<Vec<Tree>, AnnotateError>;

    /// Called once after the last sentence
    fn finish(&mut self) {}
}

/// Text with all whitespace removed, for tokenization-insensitive matching
fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Serves trees from a pre-parsed CoNLL-U file, in order
pub struct ConlluAnnotator {
    trees: VecDeque<Tree>,
}

impl ConlluAnnotator {
    pub fn new<I: IntoIterator<Item = Tree>>(trees: I) -> Self {
        Self {
            trees: trees.into_iter().collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AnnotateError> {
        let trees = CoNLLUReader::from_file(path)?.collect::<Result<VecDeque<_>, _>>()?;
        log::info!("Loaded {} analyses from {}", trees.len(), path.display());
        Ok(Self { trees })
    }

    /// Trees not yet handed out
    pub fn remaining(&self) -> usize {
        self.trees.len()
    }
}

impl Annotator for ConlluAnnotator {
    fn annotate(&mut self, sentence: &str) -> Result<Vec<Tree>, AnnotateError> {
        let first = self.trees.pop_front().ok_or_else(|| AnnotateError::Exhausted {
            sentence: sentence.to_string(),
        })?;

        let target = squash(sentence);
        let Some(text) = first.sentence_text.clone() else {
            return Ok(vec![first]);
        };
        let mut covered = squash(&text);
        let mut analysis = text;

        // The parser may have split the line into several sentences
        let mut trees = vec![first];
        while target.starts_with(&covered) && covered.len() < target.len() {
            let Some(next) = self.trees.front().and_then(|t| t.sentence_text.as_deref()) else {
                break;
            };
            let extended = covered.clone() + &squash(next);
            if !target.starts_with(&extended) {
                break;
            }
            covered = extended;
            analysis.push(' ');
            analysis.push_str(next);
            trees.extend(self.trees.pop_front());
        }

        if covered != target {
            return Err(AnnotateError::Mismatch {
                sentence: sentence.to_string(),
                analysis,
            });
        }
        Ok(trees)
    }

    fn finish(&mut self) {
        if !self.trees.is_empty() {
            log::warn!("{} analyses left unused", self.trees.len());
        }
    }
}

/// Runs an external parser once per sentence
///
/// The sentence is written to the command's stdin; its stdout must be
/// CoNLL-U.
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    program: String,
    args: Vec<String>,
}

impl CommandAnnotator {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl Annotator for CommandAnnotator {
    fn annotate(&mut self, sentence: &str) -> Result<Vec<Tree>, AnnotateError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A parser that exits without reading is judged by its status
            match stdin.write_all(format!("{sentence}\n").as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(AnnotateError::CommandFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }

        let text = String::from_utf8(output.stdout)?;
        let trees = CoNLLUReader::from_string(&text).collect::<Result<Vec<_>, _>>()?;
        if trees.is_empty() {
            log::warn!("'{}' produced no analysis for {:?}", self.program, sentence);
        }
        Ok(trees)
    }
}

/// Build the annotator named by `source`
pub fn build_annotator(source: &AnnotatorSource) -> Result<Box<dyn Annotator>, AnnotateError> {
    Ok(match source {
        AnnotatorSource::Conllu(path) => Box::new(ConlluAnnotator::from_file(path)?),
        AnnotatorSource::Command { program, args } => {
            log::info!("Annotating with '{}' {:?}", program, args);
            Box::new(CommandAnnotator::new(program, args))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARSED: &str = "# text = The ice melted.
1\tThe\tthe\tDET\t_\t_\t2\tdet\t_\t_
2\tice\tice\tNOUN\t_\t_\t3\tnsubj\t_\t_
3\tmelted\tmelt\tVERB\t_\t_\t0\troot\t_\t_
4\t.\t.\tPUNCT\t_\t_\t3\tpunct\t_\t_

# text = It broke.
1\tIt\tit\tPRON\t_\t_\t2\tnsubj\t_\t_
2\tbroke\tbreak\tVERB\t_\t_\t0\troot\t_\t_
3\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_

# text = It shattered.
1\tIt\tit\tPRON\t_\t_\t2\tnsubj\t_\t_
2\tshattered\tshatter\tVERB\t_\t_\t0\troot\t_\t_
3\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_
";

    fn annotator() -> ConlluAnnotator {
        let trees = CoNLLUReader::from_string(PARSED).collect::<Result<Vec<_>, _>>();
        ConlluAnnotator::new(trees.unwrap())
    }

    #[test]
    fn test_conllu_one_tree_per_sentence() {
        let mut ann = annotator();
        let trees = ann.annotate("The ice melted.").unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].words[2].lemma, "melt");
        assert_eq!(ann.remaining(), 2);
    }

    #[test]
    fn test_conllu_split_sentence_grouped() {
        let mut ann = annotator();
        ann.annotate("The ice melted.").unwrap();

        let trees = ann.annotate("It broke.  It shattered.").unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[1].words[1].form, "shattered");
        assert_eq!(ann.remaining(), 0);
    }

    #[test]
    fn test_conllu_exhausted() {
        let mut ann = ConlluAnnotator::new(Vec::new());
        let err = ann.annotate("The ice melted.").unwrap_err();
        assert!(matches!(err, AnnotateError::Exhausted { .. }));
    }

    #[test]
    fn test_conllu_mismatch_is_an_error() {
        let mut ann = annotator();
        let err = ann.annotate("She opened the door.").unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::Mismatch { ref analysis, .. } if analysis == "The ice melted."
        ));
    }

    #[test]
    fn test_conllu_partial_cover_is_an_error() {
        let mut ann = annotator();
        ann.annotate("The ice melted.").unwrap();

        // Only the first half of the line has an analysis
        let err = ann.annotate("It broke. Then it melted.").unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::Mismatch { ref analysis, .. } if analysis == "It broke."
        ));
    }

    #[test]
    fn test_conllu_whitespace_insensitive() {
        let mut ann = annotator();
        assert_eq!(ann.annotate("The  ice melted .").unwrap().len(), 1);
    }

    #[test]
    fn test_conllu_without_text_comments() {
        let conllu = "1\tmelted\tmelt\tVERB\t_\t_\t0\troot\t_\t_\n\n\
                      1\tbroke\tbreak\tVERB\t_\t_\t0\troot\t_\t_\n";
        let trees = CoNLLUReader::from_string(conllu).collect::<Result<Vec<_>, _>>();
        let mut ann = ConlluAnnotator::new(trees.unwrap());

        assert_eq!(ann.annotate("melted").unwrap()[0].words[0].lemma, "melt");
        assert_eq!(ann.annotate("broke").unwrap()[0].words[0].lemma, "break");
    }

    #[test]
    fn test_from_file_and_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parsed.conllu");
        std::fs::write(&path, PARSED).unwrap();

        let mut ann = build_annotator(&AnnotatorSource::Conllu(path)).unwrap();
        assert_eq!(ann.annotate("The ice melted.").unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_annotator() {
        let script = "cat >/dev/null; printf '# text = Ice melts.\\n1\\tIce\\tice\\tNOUN\\t_\\t_\\t2\\tnsubj\\t_\\t_\\n2\\tmelts\\tmelt\\tVERB\\t_\\t_\\t0\\troot\\t_\\t_\\n'";
        let mut ann = CommandAnnotator::new("sh", &["-c".to_string(), script.to_string()]);

        let trees = ann.annotate("Ice melts.").unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].words[1].lemma, "melt");
        assert_eq!(trees[0].head_text(&trees[0].words[0]), "melts");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_failure() {
        let mut ann = CommandAnnotator::new("sh", &["-c".to_string(), "exit 3".to_string()]);
        let err = ann.annotate("Ice melts.").unwrap_err();
        assert!(matches!(err, AnnotateError::CommandFailed { .. }));
    }

    #[test]
    fn test_missing_command() {
        let mut ann = CommandAnnotator::new("/nonexistent/collexeme-parser", &[]);
        assert!(matches!(ann.annotate("x").unwrap_err(), AnnotateError::Io(_)));
    }
}
