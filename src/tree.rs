//! Analyzed sentences
//!
//! The annotator's view of one sentence: a list of words with part-of-speech
//! tag, lemma, head and dependency relation. Word ids and heads are 1-based
//! as in CoNLL-U; head 0 marks the root.

use std::collections::HashMap;

/// 1-based position of a word within its sentence
pub type WordId = usize;

/// Head text printed for the root word
pub const ROOT: &str = "root";

/// A word of an analyzed sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub id: WordId,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    /// Head word id, 0 for the root
    pub head: WordId,
    pub deprel: String,
}

impl Word {
    pub fn new(id: WordId, form: &str, lemma: &str, upos: &str, head: WordId, deprel: &str) -> Self {
        Self {
            id,
            form: form.to_string(),
            lemma: lemma.to_string(),
            upos: upos.to_string(),
            head,
            deprel: deprel.to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.head == 0
    }
}

/// One analyzed sentence (a dependency tree)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub words: Vec<Word>,
    pub sentence_text: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(sentence_text: Option<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            words: Vec::new(),
            sentence_text,
            metadata,
        }
    }

    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Word by 1-based id
    pub fn word(&self, id: WordId) -> Option<&Word> {
        id.checked_sub(1).and_then(|i| self.words.get(i))
    }

    /// Text of `word`'s head, or `root`
    pub fn head_text<'a>(&'a self, word: &Word) -> &'a str {
        if word.is_root() {
            return ROOT;
        }
        self.word(word.head).map_or(ROOT, |head| head.form.as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
