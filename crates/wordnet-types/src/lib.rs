//! Shared, zero-copy types that mirror WordNet's dictionary format.
//!
//! Text fields borrow from a backing buffer (`&str`); numeric fields keep the
//! raw representation found in `data.*` (`offset`, `lex_filenum`, `lex_id`,
//! `ss_type`). On top of the raw records this crate knows how to render a
//! WordNet sense key, which is the label used by sense-tagged corpora such as
//! SemCor and the Senseval/SemEval gold files.
//!
//! ```rust
//! use wordnet_types::{Pos, SenseKey, SynsetType};
//!
//! let pos = Pos::from_char('n').unwrap();
//! assert_eq!(pos.to_char(), 'n');
//!
//! let key = SenseKey::new("Bank", SynsetType::Noun, 17, 1);
//! assert_eq!(key.to_string(), "bank%1:17:01::");
//! ```

use std::fmt;

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// Every POS in the order dictionary-wide lookups visit them.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix of the `index.<suffix>`/`data.<suffix>` file pair for this POS.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// Dense index, stable across runs, for per-POS arrays.
    pub fn ordinal(self) -> usize {
        match self {
            Pos::Noun => 0,
            Pos::Verb => 1,
            Pos::Adj => 2,
            Pos::Adv => 3,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        })
    }
}

/// `(offset, pos)` pair uniquely identifying a synset within the WordNet files.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

/// Raw `ss_type` marker from `data.*`, including adjective satellites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    /// Numeric code used in the `ss_type` slot of a sense key.
    pub fn sense_key_code(self) -> u8 {
        match self {
            SynsetType::Noun => 1,
            SynsetType::Verb => 2,
            SynsetType::Adj => 3,
            SynsetType::Adv => 4,
            SynsetType::AdjSatellite => 5,
        }
    }
}

/// A lemma string and its per-synset `lex_id`.
#[derive(Clone, Debug)]
pub struct Lemma<'a> {
    pub text: &'a str,
    pub lex_id: u8,
}

impl Lemma<'_> {
    /// Lemma as it appears in sense keys: lower-case, adjective marker removed.
    pub fn key_form(&self) -> String {
        key_lemma(self.text)
    }
}

/// Parsed gloss. `definition` runs up to the first quoted example.
#[derive(Clone, Debug)]
pub struct Gloss<'a> {
    pub raw: &'a str,
    pub definition: &'a str,
    pub examples: Vec<&'a str>,
}

/// Synset record with the fields needed to label and describe a sense.
#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub lex_filenum: u8,
    pub synset_type: SynsetType,
    pub words: Vec<Lemma<'a>>,
    /// Head word of the adjective cluster; only set for satellites.
    pub head: Option<Lemma<'a>>,
    pub gloss: Gloss<'a>,
}

impl Synset<'_> {
    /// Sense key of the `n`th word in this synset.
    pub fn sense_key(&self, word_index: usize) -> Option<SenseKey> {
        let word = self.words.get(word_index)?;
        let key = SenseKey::new(word.text, self.synset_type, self.lex_filenum, word.lex_id);
        Some(match &self.head {
            Some(head) if self.synset_type == SynsetType::AdjSatellite => {
                key.with_head(head.text, head.lex_id)
            }
            _ => key,
        })
    }

    /// Sense key of the synset's first lemma.
    pub fn first_sense_key(&self) -> Option<SenseKey> {
        self.sense_key(0)
    }
}

/// `lemma%ss_type:lex_filenum:lex_id:head_word:head_id`
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SenseKey {
    pub lemma: String,
    pub synset_type: SynsetType,
    pub lex_filenum: u8,
    pub lex_id: u8,
    pub head: Option<(String, u8)>,
}

impl SenseKey {
    pub fn new(lemma: &str, synset_type: SynsetType, lex_filenum: u8, lex_id: u8) -> Self {
        Self {
            lemma: key_lemma(lemma),
            synset_type,
            lex_filenum,
            lex_id,
            head: None,
        }
    }

    /// Attach the satellite head (`head_word`, `head_id`).
    pub fn with_head(mut self, head_word: &str, head_id: u8) -> Self {
        self.head = Some((key_lemma(head_word), head_id));
        self
    }
}

impl fmt::Display for SenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}%{}:{:02}:{:02}:",
            self.lemma,
            self.synset_type.sense_key_code(),
            self.lex_filenum,
            self.lex_id
        )?;
        match &self.head {
            Some((word, id)) => write!(f, "{word}:{id:02}"),
            None => f.write_str(":"),
        }
    }
}

/// Lower-case a lemma and drop a trailing syntactic marker like `(p)`.
pub fn key_lemma(text: &str) -> String {
    let trimmed = match text.rfind('(') {
        Some(idx) if text.ends_with(')') => &text[..idx],
        _ => text,
    };
    trimmed.to_lowercase()
}
