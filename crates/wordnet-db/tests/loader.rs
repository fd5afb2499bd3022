use std::fs;
use std::path::Path;

use tempfile::TempDir;
use wordnet_db::{LoadMode, WordNet};
use wordnet_types::{Pos, SynsetId, SynsetType};

const LICENSE: &str = "  1 This software and database is being provided to you, the LICENSEE\n";

fn write_dict(dir: &Path) {
    let files = [
        (
            "index.noun",
            "bank n 2 1 @ 2 2 00000100 00000200 \ndog n 1 1 @ 1 1 00000300 \n",
        ),
        (
            "data.noun",
            concat!(
                "00000100 17 n 01 bank 0 000 | sloping land beside a body of water; \"they pulled the canoe up on the bank\"\n",
                "00000200 14 n 02 bank 0 depository_financial_institution 0 000 | a financial institution that accepts deposits; \"he cashed a check at the bank\"; \"that bank holds the mortgage\"\n",
                "00000300 05 n 01 dog 0 000 | a domesticated carnivorous mammal\n",
            ),
        ),
        ("index.verb", "bank v 1 0 1 1 00000400 \n"),
        (
            "data.verb",
            "00000400 40 v 01 bank 0 000 01 + 02 00 | do business with a bank; \"Where do you bank?\"\n",
        ),
        (
            "index.adj",
            "large a 1 0 1 1 00000500 \ngigantic a 1 0 1 1 00000600 \n",
        ),
        (
            "data.adj",
            concat!(
                "00000500 00 a 01 large 0 001 & 00000600 a 0000 | above average in size\n",
                "00000600 00 s 01 gigantic(a) 0 001 & 00000500 a 0000 | so exceedingly large\n",
            ),
        ),
        ("index.adv", ""),
        ("data.adv", ""),
    ];
    for (name, body) in files {
        fs::write(dir.join(name), format!("{LICENSE}{body}")).expect("write fixture");
    }
}

fn fixture() -> (TempDir, WordNet) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_dict(dir.path());
    let wn = WordNet::load(dir.path()).expect("load fixtures");
    (dir, wn)
}

#[test]
fn lists_synsets_in_sense_order() {
    let (_dir, wn) = fixture();
    let ids = wn.synsets_for_lemma(Pos::Noun, "Bank");
    assert_eq!(
        ids,
        &[
            SynsetId {
                pos: Pos::Noun,
                offset: 100
            },
            SynsetId {
                pos: Pos::Noun,
                offset: 200
            },
        ]
    );
    assert!(wn.lemma_exists(Pos::Verb, "bank"));
    assert!(!wn.lemma_exists(Pos::Adv, "bank"));
    assert!(wn.synsets_for_lemma(Pos::Adv, "bank").is_empty());
    assert_eq!(wn.synset_count(), 6);
    assert_eq!(wn.lemma_count(), 5);
}

#[test]
fn parses_gloss_and_sense_key() {
    let (_dir, wn) = fixture();
    let synset = wn
        .get_synset(SynsetId {
            pos: Pos::Noun,
            offset: 200,
        })
        .expect("synset present");

    assert_eq!(synset.lex_filenum, 14);
    assert_eq!(synset.synset_type, SynsetType::Noun);
    assert_eq!(synset.words.len(), 2);
    assert_eq!(synset.words[1].text, "depository_financial_institution");
    assert_eq!(
        synset.gloss.definition,
        "a financial institution that accepts deposits"
    );
    assert_eq!(
        synset.gloss.examples,
        vec!["he cashed a check at the bank", "that bank holds the mortgage"]
    );
    assert_eq!(
        synset.first_sense_key().unwrap().to_string(),
        "bank%1:14:00::"
    );
}

#[test]
fn satellites_carry_their_head_word() {
    let (_dir, wn) = fixture();
    let satellite = wn
        .get_synset(SynsetId {
            pos: Pos::Adj,
            offset: 600,
        })
        .expect("satellite present");
    assert_eq!(satellite.synset_type, SynsetType::AdjSatellite);
    assert_eq!(
        satellite.first_sense_key().unwrap().to_string(),
        "gigantic%5:00:00:large:00"
    );

    let head = wn
        .get_synset(SynsetId {
            pos: Pos::Adj,
            offset: 500,
        })
        .expect("head present");
    assert!(head.head.is_none());
    assert_eq!(head.first_sense_key().unwrap().to_string(), "large%3:00:00::");
}

#[test]
fn owned_mode_matches_mmap() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_dict(dir.path());
    let wn = WordNet::load_with_mode(dir.path(), LoadMode::Owned).expect("owned load");
    let verb = wn
        .get_synset(SynsetId {
            pos: Pos::Verb,
            offset: 400,
        })
        .expect("verb synset");
    assert_eq!(verb.gloss.definition, "do business with a bank");
    assert_eq!(verb.gloss.examples, vec!["Where do you bank?"]);
}

#[test]
fn reports_missing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = match WordNet::load(dir.path()) {
        Ok(_) => panic!("empty directory must not load"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("index.noun"));
}
