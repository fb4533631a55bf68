//! Sentence tagger
//!
//! Frames each input sentence with its analysis:
//!
//! ```text
//! <s id="1">
//! ice	NOUN	ice	1	2	melted	nsubj
//! melted	VERB	melt	2	0	root	root
//! </s>
//! ```
//!
//! Columns are form, UPOS, lemma, token id, head id, head form and relation.

use crate::annotator::{Annotator, build_annotator};
use crate::config::TagConfig;
use crate::error::TagError;
use crate::input::open_input;
use crate::output::staging_file;
use crate::tree::Tree;
use std::ffi::OsString;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

const TAGGED_SUFFIX: &str = "_tagged.txt";

/// Output path for `input`: `x.txt` becomes `x_tagged.txt`, anything else
/// gets `_tagged.txt` appended
pub fn tagged_output_path(input: &Path) -> PathBuf {
    if let Some(stem) = input.to_str().and_then(|s| s.strip_suffix(".txt")) {
        return PathBuf::from(format!("{stem}{TAGGED_SUFFIX}"));
    }
    let mut name = OsString::from(input.as_os_str());
    name.push(TAGGED_SUFFIX);
    PathBuf::from(name)
}

/// One input line to be tagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// 1-based input line number
    pub id: usize,
    pub text: String,
}

/// Trimmed non-blank lines of `reader`, numbered by input line
///
/// Blank lines produce no sentence but still count toward the numbering.
pub fn read_sentences<R: BufRead>(reader: R) -> io::Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if !text.is_empty() {
            sentences.push(Sentence {
                id: i + 1,
                text: text.to_string(),
            });
        }
    }
    Ok(sentences)
}

/// One input sentence with its analyses
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSentence {
    /// 1-based input line number
    pub id: usize,
    pub text: String,
    pub trees: Vec<Tree>,
}

/// Annotate every sentence; stops at the first failure
pub fn tag_sentences(
    sentences: &[Sentence],
    annotator: &mut dyn Annotator,
) -> Result<Vec<TaggedSentence>, TagError> {
    let mut tagged = Vec::with_capacity(sentences.len());
    for Sentence { id, text } in sentences {
        let id = *id;
        let trees = annotator
            .annotate(text)
            .map_err(|source| TagError::Annotate { id, source })?;
        log::debug!(
            "Sentence {}: {} analyses, {} tokens",
            id,
            trees.len(),
            trees.iter().map(Tree::len).sum::<usize>()
        );
        tagged.push(TaggedSentence {
            id,
            text: text.clone(),
            trees,
        });
    }
    annotator.finish();
    Ok(tagged)
}

/// Write one `<s>` block per sentence
pub fn write_tagged<W: Write>(writer: &mut W, tagged: &[TaggedSentence]) -> io::Result<()> {
    for sentence in tagged {
        writeln!(writer, "<s id=\"{}\">", sentence.id)?;
        for tree in &sentence.trees {
            for word in &tree.words {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    word.form,
                    word.upos,
                    word.lemma,
                    word.id,
                    word.head,
                    tree.head_text(word),
                    word.deprel
                )?;
            }
        }
        writeln!(writer, "</s>")?;
    }
    Ok(())
}

/// Tag `input` with `annotator`, writing next to it; returns the output path
///
/// Nothing is written unless every sentence was annotated.
pub fn tag_file_with(input: &Path, annotator: &mut dyn Annotator) -> Result<PathBuf, TagError> {
    let reader = open_input(input).map_err(|source| TagError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    let sentences = read_sentences(reader).map_err(|source| TagError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    log::info!("Read {} sentences from {}", sentences.len(), input.display());

    let tagged = tag_sentences(&sentences, annotator)?;

    let output = tagged_output_path(input);
    let tmp = staging_file(&output)?;
    let mut writer = BufWriter::new(tmp);
    write_tagged(&mut writer, &tagged)?;
    let tmp = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    tmp.persist(&output).map_err(|e| TagError::Persist {
        path: output.clone(),
        source: e.error,
    })?;

    log::info!("Wrote {} tagged sentences to {}", tagged.len(), output.display());
    Ok(output)
}

/// Run the tagger as configured
pub fn tag_file(config: &TagConfig) -> Result<PathBuf, TagError> {
    let mut annotator = build_annotator(&config.source).map_err(TagError::Setup)?;
    tag_file_with(&config.input, annotator.as_mut())
}
