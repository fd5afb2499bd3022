use std::env;
use std::path::PathBuf;

use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

fn dict_dir() -> Option<PathBuf> {
    env::var("WORDNET_DIR").ok().map(PathBuf::from)
}

#[test]
fn reduces_inflections_against_open_english_wordnet() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: WORDNET_DIR not set");
        return;
    };
    let wn = WordNet::load_with_mode(&dir, LoadMode::Mmap).expect("load wordnet");
    let morph = Morphy::load(&dir).expect("load morph");
    let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);

    assert!(morph.base_forms(Pos::Verb, "running", exists).contains(&"run".to_string()));
    assert!(morph.base_forms(Pos::Noun, "children", exists).contains(&"child".to_string()));
    assert!(morph.base_forms(Pos::Noun, "banks", exists).contains(&"bank".to_string()));
}
