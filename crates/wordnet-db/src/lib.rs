//! Load WordNet dictionaries for sense lookup with zero-copy glosses.
//!
//! This crate ingests the canonical `index.*`/`data.*` files and keeps what a
//! word-sense disambiguator needs: the sense-ordered synset list for every
//! lemma, the words of each synset with their `lex_id`, the lexicographer file
//! number, the satellite head link and the gloss split into definition and
//! examples. Gloss and lemma text borrows from the `data.*` bytes, which are
//! either memory-mapped or read into owned buffers ([`LoadMode`]).
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/path/to/wordnet", LoadMode::Mmap)?;
//! for sid in wn.synsets_for_lemma(Pos::Noun, "bank") {
//!     let syn = wn.get_synset(*sid).unwrap();
//!     println!("{:?}: {}", syn.first_sense_key(), syn.gloss.definition);
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use wordnet_types::{Gloss, Lemma, Pos, Synset, SynsetId, SynsetType};

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

impl LoadMode {
    /// Parse `mmap`/`owned`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Span inside the `data.*` file of one POS.
#[derive(Clone, Copy)]
struct TextRef {
    pos: Pos,
    start: usize,
    len: usize,
}

struct LemmaData {
    text: TextRef,
    lex_id: u8,
}

struct GlossData {
    raw: TextRef,
    definition: TextRef,
    examples: Vec<TextRef>,
}

struct SynsetData {
    id: SynsetId,
    lex_filenum: u8,
    synset_type: SynsetType,
    words: Vec<LemmaData>,
    head: Option<SynsetId>,
    gloss: GlossData,
}

/// In-memory view of a WordNet dictionary backed by mmap or owned buffers.
pub struct WordNet {
    data: [Buffer; 4],
    synsets: HashMap<SynsetId, SynsetData>,
    lemma_to_synsets: HashMap<(Pos, String), Vec<SynsetId>>,
}

impl WordNet {
    /// Load WordNet from a directory containing `data.*` and `index.*` files.
    ///
    /// Defaults to memory-mapping the source files. Use [`WordNet::load_with_mode`]
    /// to force owned buffers instead.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load WordNet choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            for prefix in ["index", "data"] {
                let path = dir.join(format!("{prefix}.{}", pos.file_suffix()));
                if !path.exists() {
                    anyhow::bail!("missing required WordNet file: {}", path.display());
                }
            }
        }

        let mut lemma_to_synsets = HashMap::new();
        for pos in Pos::ALL {
            let index = load_file(dir.join(format!("index.{}", pos.file_suffix())), mode)?;
            parse_index(index.as_slice(), pos, &mut lemma_to_synsets)?;
        }

        let data = [
            load_file(dir.join("data.noun"), mode)?,
            load_file(dir.join("data.verb"), mode)?,
            load_file(dir.join("data.adj"), mode)?,
            load_file(dir.join("data.adv"), mode)?,
        ];
        let mut synsets = HashMap::new();
        for pos in Pos::ALL {
            parse_data(data[pos.ordinal()].as_slice(), pos, &mut synsets)?;
        }

        Ok(Self {
            data,
            synsets,
            lemma_to_synsets,
        })
    }

    /// Check whether a lemma exists for the given POS according to index files.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        let key = (pos, normalize_lemma(lemma));
        self.lemma_to_synsets.contains_key(&key)
    }

    /// Synsets of a lemma in sense order, or an empty slice.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> &[SynsetId] {
        let key = (pos, normalize_lemma(lemma));
        self.lemma_to_synsets
            .get(&key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Fetch a `Synset` by id if loaded.
    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        self.synsets.get(&id).map(|syn| self.make_synset_view(syn))
    }

    /// Number of `(pos, lemma)` keys.
    pub fn lemma_count(&self) -> usize {
        self.lemma_to_synsets.len()
    }

    /// Number of synsets.
    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    fn text(&self, r: TextRef) -> &str {
        let bytes = self.data[r.pos.ordinal()].as_slice();
        // Spans are cut from lines that were validated as UTF-8 during parsing.
        std::str::from_utf8(&bytes[r.start..r.start + r.len]).unwrap_or_default()
    }

    fn make_synset_view<'a>(&'a self, data: &'a SynsetData) -> Synset<'a> {
        let words = data
            .words
            .iter()
            .map(|w| Lemma {
                text: self.text(w.text),
                lex_id: w.lex_id,
            })
            .collect();
        let head = data
            .head
            .and_then(|id| self.synsets.get(&id))
            .and_then(|head| head.words.first())
            .map(|w| Lemma {
                text: self.text(w.text),
                lex_id: w.lex_id,
            });
        let gloss = Gloss {
            raw: self.text(data.gloss.raw),
            definition: self.text(data.gloss.definition),
            examples: data.gloss.examples.iter().map(|r| self.text(*r)).collect(),
        };

        Synset {
            id: data.id,
            lex_filenum: data.lex_filenum,
            synset_type: data.synset_type,
            words,
            head,
            gloss,
        }
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Iterate content lines, skipping the license preamble (lines starting with spaces).
fn content_lines(bytes: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    bytes
        .split(|b| *b == b'\n')
        .map(strip_cr)
        .enumerate()
        .filter(|(_, line)| !line.is_empty() && !matches!(line.first(), Some(b' ' | b'\t')))
}

fn parse_index(
    bytes: &[u8],
    pos: Pos,
    lemma_to_synsets: &mut HashMap<(Pos, String), Vec<SynsetId>>,
) -> Result<()> {
    for (lineno, line) in content_lines(bytes) {
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("index.{}:{} not utf-8", pos.file_suffix(), lineno + 1))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        let at = |what: &str| format!("index.{}:{} {what}", pos.file_suffix(), lineno + 1);
        if tokens.len() < 6 {
            anyhow::bail!(at("malformed index line (too few tokens)"));
        }

        let synset_cnt: usize = tokens[2].parse().with_context(|| at("synset_cnt"))?;
        let p_cnt: usize = tokens[3].parse().with_context(|| at("p_cnt"))?;
        // lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt offsets...
        let first_offset = 4 + p_cnt + 2;
        if tokens.len() < first_offset {
            anyhow::bail!(at("pointer count mismatch"));
        }
        let offsets = tokens[first_offset..]
            .iter()
            .map(|t| t.parse::<u32>().with_context(|| at("synset_offsets")))
            .collect::<Result<Vec<_>>>()?;
        if offsets.len() != synset_cnt {
            anyhow::bail!(at(&format!(
                "synset_cnt mismatch (expected {synset_cnt}, got {})",
                offsets.len()
            )));
        }

        lemma_to_synsets.insert(
            (pos, normalize_lemma(tokens[0])),
            offsets
                .into_iter()
                .map(|offset| SynsetId { pos, offset })
                .collect(),
        );
    }

    Ok(())
}

fn parse_data(bytes: &[u8], pos: Pos, synsets: &mut HashMap<SynsetId, SynsetData>) -> Result<()> {
    for (lineno, line) in content_lines(bytes) {
        let at = |what: &str| format!("data.{}:{} {what}", pos.file_suffix(), lineno + 1);
        let line_str = std::str::from_utf8(line).with_context(|| at("not utf-8"))?;
        let (left, gloss_part) = match line_str.split_once('|') {
            Some((l, r)) => (l.trim(), r.trim()),
            None => (line_str.trim(), ""),
        };

        let tokens: Vec<&str> = left.split_ascii_whitespace().collect();
        if tokens.len() < 4 {
            anyhow::bail!(at("malformed data line"));
        }

        let offset: u32 = tokens[0].parse().with_context(|| at("offset"))?;
        let lex_filenum: u8 = tokens[1].parse().with_context(|| at("lex_filenum"))?;
        let synset_type = tokens[2]
            .chars()
            .next()
            .and_then(SynsetType::from_char)
            .ok_or_else(|| anyhow::anyhow!(at("invalid ss_type")))?;
        let w_cnt = usize::from_str_radix(tokens[3], 16).with_context(|| at("w_cnt"))?;

        let mut idx = 4;
        if tokens.len() < idx + w_cnt * 2 + 1 {
            anyhow::bail!(at("not enough word/lex_id pairs"));
        }
        let mut words = Vec::with_capacity(w_cnt);
        for _ in 0..w_cnt {
            let lex_id = u8::from_str_radix(tokens[idx + 1], 16).with_context(|| at("lex_id"))?;
            words.push(LemmaData {
                text: text_ref(pos, bytes, tokens[idx]),
                lex_id,
            });
            idx += 2;
        }

        let p_cnt: usize = tokens[idx].parse().with_context(|| at("p_cnt"))?;
        idx += 1;
        if tokens.len() < idx + p_cnt * 4 {
            anyhow::bail!(at("incomplete pointer block"));
        }
        let mut head = None;
        for ptr in tokens[idx..idx + p_cnt * 4].chunks_exact(4) {
            // Satellites point at their cluster head with "&".
            if head.is_none() && synset_type == SynsetType::AdjSatellite && ptr[0] == "&" {
                let target_offset: u32 = ptr[1].parse().with_context(|| at("pointer offset"))?;
                let target_pos = ptr[2]
                    .chars()
                    .next()
                    .and_then(Pos::from_char)
                    .ok_or_else(|| anyhow::anyhow!(at("pointer pos")))?;
                head = Some(SynsetId {
                    pos: target_pos,
                    offset: target_offset,
                });
            }
        }

        let id = SynsetId { pos, offset };
        synsets.insert(
            id,
            SynsetData {
                id,
                lex_filenum,
                synset_type,
                words,
                head,
                gloss: parse_gloss(pos, bytes, gloss_part),
            },
        );
    }

    Ok(())
}

/// Split a gloss into the definition (text before the first quoted example)
/// and the quoted examples.
fn parse_gloss(pos: Pos, root: &[u8], gloss: &str) -> GlossData {
    let trimmed = gloss.trim();

    let mut examples = Vec::new();
    let mut quote_start: Option<usize> = None;
    let mut def_end: Option<usize> = None;
    for (idx, ch) in trimmed.char_indices() {
        if ch != '"' {
            continue;
        }
        match quote_start.take() {
            Some(start) => {
                if idx > start + 1 {
                    examples.push(text_ref(pos, root, &trimmed[start + 1..idx]));
                }
            }
            None => {
                def_end.get_or_insert(idx);
                quote_start = Some(idx);
            }
        }
    }

    let definition = trimmed[..def_end.unwrap_or(trimmed.len())]
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    GlossData {
        raw: text_ref(pos, root, trimmed),
        definition: text_ref(pos, root, definition),
        examples,
    }
}

fn text_ref(pos: Pos, root: &[u8], token: &str) -> TextRef {
    let start = token.as_ptr() as usize - root.as_ptr() as usize;
    TextRef {
        pos,
        start,
        len: token.len(),
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn normalize_lemma(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gloss_splits_definition_and_examples() {
        let line = r#"a financial institution; accepts deposits; "he cashed a check at the bank"; "that bank holds the mortgage""#;
        let gloss = parse_gloss(Pos::Noun, line.as_bytes(), line);
        let text = |r: TextRef| &line[r.start..r.start + r.len];
        assert_eq!(
            text(gloss.definition),
            "a financial institution; accepts deposits"
        );
        let examples: Vec<&str> = gloss.examples.iter().map(|r| text(*r)).collect();
        assert_eq!(
            examples,
            vec!["he cashed a check at the bank", "that bank holds the mortgage"]
        );
    }

    #[test]
    fn gloss_without_examples_keeps_full_definition() {
        let line = "sloping land beside a body of water";
        let gloss = parse_gloss(Pos::Noun, line.as_bytes(), line);
        assert_eq!(gloss.definition.len, line.len());
        assert!(gloss.examples.is_empty());
    }

    #[test]
    fn load_mode_parses_case_insensitively() {
        assert_eq!(LoadMode::parse("MMAP"), Some(LoadMode::Mmap));
        assert_eq!(LoadMode::parse("owned"), Some(LoadMode::Owned));
        assert_eq!(LoadMode::parse("disk"), None);
    }
}
