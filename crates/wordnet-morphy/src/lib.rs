//! WordNet-style morphological processing (morphy).
//!
//! Reduces an inflected surface form to the base forms attested in the
//! dictionary. The algorithm is the one dictionary front-ends use when a
//! lemma lookup is asked for an arbitrary word:
//!
//! 1. If the form is in the POS exception list (`*.exc`), return the
//!    attested members of `[form] + exceptions`.
//! 2. Otherwise apply every POS suffix substitution once and return the
//!    attested members of `[form] + substitutions`.
//! 3. While nothing is attested, keep applying substitutions to the previous
//!    round's output.
//!
//! Existence is decided by a caller-provided predicate, so the crate does not
//! depend on any particular loader.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/path/to/wordnet";
//! let wn = WordNet::load_with_mode(dict, LoadMode::Mmap)?;
//! let morph = Morphy::load(dict)?;
//! let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);
//!
//! assert_eq!(morph.base_forms(Pos::Noun, "banks", exists), vec!["bank"]);
//! # Ok(()) }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// Exception lists keyed by POS; substitutions are built in.
#[derive(Debug, Default)]
pub struct Morphy {
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// Load morphy exception lists (`*.exc`) from a WordNet dict directory.
    ///
    /// Files are optional; missing ones are treated as empty.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = HashMap::new();
        for pos in Pos::ALL {
            exceptions.insert(pos, load_exc(dir.join(format!("{}.exc", pos.file_suffix())))?);
        }
        Ok(Self { exceptions })
    }

    /// Build from in-memory exception entries (`surface -> base forms`).
    pub fn with_exceptions(entries: impl IntoIterator<Item = (Pos, String, Vec<String>)>) -> Self {
        let mut exceptions: HashMap<Pos, HashMap<String, Vec<String>>> = HashMap::new();
        for (pos, surface, lemmas) in entries {
            exceptions
                .entry(pos)
                .or_default()
                .insert(normalize(&surface), lemmas.iter().map(|l| normalize(l)).collect());
        }
        Self { exceptions }
    }

    /// Attested base forms of `form` for `pos`, in discovery order.
    ///
    /// The callback `lemma_exists` typically delegates to `WordNet::lemma_exists`.
    pub fn base_forms<F>(&self, pos: Pos, form: &str, lemma_exists: F) -> Vec<String>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let form = normalize(form);
        let attested = |forms: Vec<String>| -> Vec<String> {
            let mut seen = HashSet::new();
            forms
                .into_iter()
                .filter(|f| lemma_exists(pos, f) && seen.insert(f.clone()))
                .collect()
        };

        if let Some(entries) = self.exceptions.get(&pos).and_then(|m| m.get(&form)) {
            let mut forms = vec![form.clone()];
            forms.extend(entries.iter().cloned());
            return attested(forms);
        }

        let mut forms = apply_rules(pos, std::slice::from_ref(&form));
        let mut first_round = vec![form];
        first_round.extend(forms.iter().cloned());
        let results = attested(first_round);
        if !results.is_empty() {
            return results;
        }

        while !forms.is_empty() {
            forms = apply_rules(pos, &forms);
            let results = attested(forms.clone());
            if !results.is_empty() {
                return results;
            }
        }
        Vec::new()
    }
}

fn load_exc(path: PathBuf) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(&path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let surface = match parts.next() {
            Some(s) => normalize(s),
            None => continue,
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn apply_rules(pos: Pos, forms: &[String]) -> Vec<String> {
    let rules = substitutions(pos);
    forms
        .iter()
        .flat_map(|form| {
            rules.iter().filter_map(move |(suffix, replacement)| {
                form.strip_suffix(suffix)
                    .map(|stem| format!("{stem}{replacement}"))
            })
        })
        .collect()
}

fn substitutions(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        Pos::Adv => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_exists(targets: &[(&str, Pos)]) -> impl Fn(Pos, &str) -> bool {
        let set: HashSet<(Pos, String)> = targets
            .iter()
            .map(|(lemma, pos)| (*pos, normalize(lemma)))
            .collect();
        move |pos, lemma| set.contains(&(pos, normalize(lemma)))
    }

    #[test]
    fn exceptions_take_precedence_over_rules() {
        let morph = Morphy::with_exceptions([(
            Pos::Noun,
            "children".to_string(),
            vec!["child".to_string()],
        )]);
        let forms = morph.base_forms(
            Pos::Noun,
            "children",
            fake_exists(&[("child", Pos::Noun), ("childre", Pos::Noun)]),
        );
        assert_eq!(forms, vec!["child"]);
    }

    #[test]
    fn surface_form_comes_first_when_attested() {
        let morph = Morphy::default();
        let forms = morph.base_forms(
            Pos::Noun,
            "Glasses",
            fake_exists(&[("glasses", Pos::Noun), ("glass", Pos::Noun)]),
        );
        assert_eq!(forms, vec!["glasses", "glass"]);
    }

    #[test]
    fn verb_rules_find_base_form() {
        let morph = Morphy::default();
        let forms = morph.base_forms(Pos::Verb, "deposited", fake_exists(&[("deposit", Pos::Verb)]));
        assert_eq!(forms, vec!["deposit"]);
    }

    #[test]
    fn rules_are_reapplied_until_something_is_attested() {
        let morph = Morphy::default();
        // busses -> busse, buss (unattested) -> bus
        let forms = morph.base_forms(Pos::Noun, "busses", fake_exists(&[("bus", Pos::Noun)]));
        assert_eq!(forms, vec!["bus"]);
        assert!(morph.base_forms(Pos::Noun, "busses", fake_exists(&[])).is_empty());
    }

    #[test]
    fn adverbs_have_no_rules() {
        let morph = Morphy::default();
        assert!(
            morph
                .base_forms(Pos::Adv, "quickly", fake_exists(&[("quick", Pos::Adv)]))
                .is_empty()
        );
    }
}
