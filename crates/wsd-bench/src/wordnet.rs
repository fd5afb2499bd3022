//! WordNet as the sense inventory for the dictionary-based strategies.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

use crate::lesk::{SenseDictionary, SenseGloss};

/// WordNet-backed sense inventory.
///
/// Senses of a word are gathered per POS (noun, verb, adjective, adverb), for
/// every morphological base form of the lower-cased word, in sense order.
pub struct WordNetDictionary {
    wordnet: WordNet,
    morphy: Morphy,
}

impl WordNetDictionary {
    pub fn load(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let start = Instant::now();
        let wordnet = WordNet::load_with_mode(dir, mode)
            .with_context(|| format!("load WordNet from {}", dir.display()))?;
        let morphy = Morphy::load(dir)?;
        info!(
            "wordnet loaded in {} ms: {} lemmas, {} synsets",
            start.elapsed().as_millis(),
            wordnet.lemma_count(),
            wordnet.synset_count()
        );
        Ok(Self::new(wordnet, morphy))
    }

    pub fn new(wordnet: WordNet, morphy: Morphy) -> Self {
        Self { wordnet, morphy }
    }

    pub fn wordnet(&self) -> &WordNet {
        &self.wordnet
    }
}

impl SenseDictionary for WordNetDictionary {
    fn senses(&self, word: &str) -> Vec<SenseGloss> {
        let word = word.to_lowercase();
        let exists = |pos: Pos, lemma: &str| self.wordnet.lemma_exists(pos, lemma);

        let mut senses = Vec::new();
        for pos in Pos::ALL {
            for form in self.morphy.base_forms(pos, &word, exists) {
                for id in self.wordnet.synsets_for_lemma(pos, &form) {
                    let Some(synset) = self.wordnet.get_synset(*id) else {
                        continue;
                    };
                    let Some(key) = synset.first_sense_key() else {
                        continue;
                    };
                    senses.push(SenseGloss {
                        key: key.to_string(),
                        definition: synset.gloss.definition.to_string(),
                        examples: synset.gloss.examples.iter().map(|e| e.to_string()).collect(),
                    });
                }
            }
        }
        senses
    }
}
