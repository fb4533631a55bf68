//! CoNLL-U file parsing
//!
//! Reads the dependency analyses an external parser emits in CoNLL-U format
//! into [`Tree`]s. Only the columns the tagger prints are kept: FORM, LEMMA,
//! UPOS, HEAD and DEPREL. Multiword token ranges and empty nodes are skipped.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use crate::input::open_input;
use crate::tree::{Tree, Word, WordId};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Lines};
use std::path::Path;
use thiserror::Error;

/// Error during CoNLL-U parsing
#[derive(Debug, Error)]
pub enum ConlluError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line_num}: {message}")]
    Parse { line_num: usize, message: String },
}

impl ConlluError {
    fn parse(line_num: usize, message: impl Into<String>) -> Self {
        ConlluError::Parse {
            line_num,
            message: message.into(),
        }
    }
}

/// Kind of token line, from the ID column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenId {
    Single(WordId),
    Range,
    Empty,
}

/// CoNLL-U reader that iterates over sentences
pub struct CoNLLUReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
}

impl CoNLLUReader<Box<dyn BufRead>> {
    /// Create a reader from a file path (plain or gzip-compressed)
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(open_input(path)?))
    }
}

impl CoNLLUReader<BufReader<Cursor<String>>> {
    /// Create a reader from a string
    pub fn from_string(text: &str) -> Self {
        Self::new(BufReader::new(Cursor::new(text.to_string())))
    }
}

impl<R: BufRead> CoNLLUReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }
}

impl<R: BufRead> Iterator for CoNLLUReader<R> {
    type Item = Result<Tree, ConlluError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut tree_lines = Vec::new();
        let mut metadata = HashMap::new();
        let mut sentence_text = None;

        // Read lines until we hit a blank line (sentence boundary) or EOF
        loop {
            self.line_num += 1;
            match self.lines.next() {
                None => {
                    if tree_lines.is_empty() {
                        return None;
                    }
                    // Last sentence without trailing blank line
                    break;
                }
                Some(Err(e)) => return Some(Err(ConlluError::Io(e))),
                Some(Ok(line)) => {
                    let line = line.trim_end_matches(['\r', '\n']);

                    if line.trim().is_empty() {
                        if !tree_lines.is_empty() {
                            break;
                        }
                        continue;
                    }

                    if let Some(comment) = line.strip_prefix('#') {
                        parse_comment(comment, &mut metadata, &mut sentence_text);
                        continue;
                    }

                    tree_lines.push((self.line_num, line.to_string()));
                }
            }
        }

        Some(parse_tree(tree_lines, sentence_text, metadata))
    }
}

/// Parse a comment line (starts with #)
fn parse_comment(
    comment: &str,
    metadata: &mut HashMap<String, String>,
    sentence_text: &mut Option<String>,
) {
    if let Some((key, value)) = comment.split_once('=') {
        let key = key.trim();
        let value = value.trim();

        if key == "text" {
            *sentence_text = Some(value.to_string());
        } else {
            metadata.insert(key.to_string(), value.to_string());
        }
    }
}

/// Parse accumulated lines into a Tree
fn parse_tree(
    lines: Vec<(usize, String)>,
    sentence_text: Option<String>,
    metadata: HashMap<String, String>,
) -> Result<Tree, ConlluError> {
    let mut tree = Tree::with_metadata(sentence_text, metadata);
    let mut last_line = 0;

    for (line_num, line) in lines {
        last_line = line_num;
        if let Some(word) = parse_line(&line, line_num)? {
            if word.id != tree.len() + 1 {
                return Err(ConlluError::parse(
                    line_num,
                    format!("Expected word id {}, found {}", tree.len() + 1, word.id),
                ));
            }
            tree.add_word(word);
        }
    }

    if let Some(word) = tree.words.iter().find(|w| w.head > tree.len()) {
        return Err(ConlluError::parse(
            last_line,
            format!(
                "Word {} has head {} outside the sentence ({} words)",
                word.id,
                word.head,
                tree.len()
            ),
        ));
    }

    Ok(tree)
}

/// Parse a single CoNLL-U line into a Word
/// Returns None for multiword tokens and empty nodes
fn parse_line(line: &str, line_num: usize) -> Result<Option<Word>, ConlluError> {
    let fields: Vec<&str> = line.split('\t').collect();

    if fields.len() != 10 {
        return Err(ConlluError::parse(
            line_num,
            format!("Expected 10 fields, found {}", fields.len()),
        ));
    }

    let id = match parse_id(fields[0]).map_err(|m| ConlluError::parse(line_num, m))? {
        TokenId::Single(id) => id,
        TokenId::Range | TokenId::Empty => return Ok(None),
    };

    let form = fields[1];
    // Default to form if lemma not specified
    let lemma = if fields[2] == "_" { form } else { fields[2] };
    let upos = fields[3];
    let head = parse_head(fields[6]).map_err(|m| ConlluError::parse(line_num, m))?;
    let deprel = fields[7];

    Ok(Some(Word::new(id, form, lemma, upos, head, deprel)))
}

/// Parse ID field (can be integer, range, or decimal)
fn parse_id(s: &str) -> Result<TokenId, String> {
    if s.contains('-') {
        Ok(TokenId::Range)
    } else if s.contains('.') {
        Ok(TokenId::Empty)
    } else {
        match s.parse::<WordId>() {
            Ok(id) if id > 0 => Ok(TokenId::Single(id)),
            _ => Err(format!("Invalid ID: {}", s)),
        }
    }
}

/// Parse HEAD field; `_` is treated as root
fn parse_head(s: &str) -> Result<WordId, String> {
    if s == "_" {
        return Ok(0);
    }
    s.parse().map_err(|_| format!("Invalid HEAD: {}", s))
}
