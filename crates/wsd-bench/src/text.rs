//! Tokenization and signature cleanup used by the gloss-overlap strategy.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Words (hyphen- or dot-joined runs stay whole), apostrophe-led clitics
/// such as `'s` and `'t`, and single punctuation marks. `don't` splits into
/// `don` and `'t`.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:[-.]\w+)*|'\w+|[^\w\s]").expect("valid token pattern")
});

const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

const FORBIDDEN: [&str; 6] = ["&apos;", "``", "''", "'", "`", "'s"];

/// English stopwords removed from gloss signatures.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Split text into word and punctuation tokens, preserving case.
pub fn word_tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Lower-case, tokenize and drop tokens that carry no sense evidence:
/// stopwords, punctuation, quote artefacts and numbers. Duplicates collapse.
pub fn signature_tokens(text: &str) -> HashSet<String> {
    word_tokenize(&text.to_lowercase())
        .into_iter()
        .filter(|token| !is_noise(token))
        .collect()
}

fn is_noise(token: &str) -> bool {
    STOPWORD_SET.contains(token)
        || PUNCTUATION.contains(token)
        || FORBIDDEN.contains(&token)
        || token.chars().all(char::is_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_words_and_punctuation() {
        assert_eq!(
            word_tokenize("He cashed a check; the bank's vault."),
            vec!["He", "cashed", "a", "check", ";", "the", "bank", "'s", "vault", "."]
        );
        assert_eq!(word_tokenize("  "), Vec::<String>::new());
    }

    #[test]
    fn apostrophe_clitics_split_off() {
        assert_eq!(word_tokenize("don't"), vec!["don", "'t"]);
        assert_eq!(word_tokenize("river's"), vec!["river", "'s"]);
    }

    #[test]
    fn keeps_hyphenated_and_dotted_words() {
        assert_eq!(word_tokenize("well-known u.s"), vec!["well-known", "u.s"]);
    }

    #[test]
    fn signature_drops_noise() {
        let sig = signature_tokens("A financial institution that accepts 2 deposits; \"he cashed it\"");
        let mut tokens: Vec<&str> = sig.iter().map(String::as_str).collect();
        tokens.sort();
        assert_eq!(
            tokens,
            vec!["accepts", "cashed", "deposits", "financial", "institution"]
        );
    }

    #[test]
    fn forbidden_and_quote_tokens_are_noise() {
        assert!(is_noise("'s"));
        assert!(is_noise("``"));
        assert!(is_noise("()"));
        assert!(is_noise("1990"));
        assert!(!is_noise("river"));
    }
}
