//! Text cleansing for data dictionary descriptions and column headers.

pub mod stem;
mod stopwords;

use once_cell::sync::Lazy;
use regex::Regex;

pub use stem::{Lancaster, Snowball, Stem, StemAlgorithm, Unstemmed};
pub use stopwords::is_stop_word;

/// One or more non-word characters.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static regex"));

/// Characters deleted outright rather than turned into a separator,
/// so "don't" becomes "dont".
const ELIDED: [char; 2] = ['\'', '"'];

/// Lower-case `text`, drop quotes, turn remaining ASCII punctuation into
/// spaces, split on non-word runs and discard empty tokens and stop words.
///
/// Order of the surviving tokens follows the source text; duplicates are kept.
pub fn cleanse(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let spaced: String = lowered
        .chars()
        .filter(|c| !ELIDED.contains(c))
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();

    NON_WORD
        .split(&spaced)
        .filter(|tok| !tok.is_empty() && !is_stop_word(tok))
        .map(str::to_string)
        .collect()
}

/// Cleanse `text` and reduce every surviving token with `stemmer`.
pub fn cleanse_and_stem(text: &str, stemmer: &dyn Stem) -> Vec<String> {
    cleanse(text).iter().map(|tok| stemmer.stem(tok)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_are_elided() {
        let expected = vec!["dogs", "kennels", "paint"];
        assert_eq!(cleanse("Dog's kennel's paint"), expected);
        assert_eq!(cleanse(r#"Dogs "kennels" paint"#), expected);
    }

    #[test]
    fn test_other_punctuation_becomes_a_separator() {
        let expected = vec!["dogs", "kennel", "dog", "house"];
        for text in [
            "Dog's kennel dog-house",
            "dog's kennel=dog house",
            "Dog's kennel=dog****house&&&",
        ] {
            assert_eq!(cleanse(text), expected, "input: {text}");
        }
    }

    #[test]
    fn test_only_punctuation_and_stop_words_is_empty() {
        for text in ["", "   ", "!!!", "the", "The, is... a?", "'\"-_=+"] {
            assert!(cleanse(text).is_empty(), "input: {text:?}");
        }
    }

    #[test]
    fn test_stop_words_removed_order_preserved() {
        assert_eq!(
            cleanse("The Institution's Balance"),
            vec!["institutions", "balance"]
        );
        assert_eq!(
            cleanse("amount of the amount"),
            vec!["amount", "amount"]
        );
    }

    #[test]
    fn test_underscore_splits_tokens() {
        assert_eq!(cleanse("balance_amt"), vec!["balance", "amt"]);
    }

    #[test]
    fn test_cleanse_and_stem_headers() {
        let lancaster = Lancaster;
        assert_eq!(
            cleanse_and_stem("Field Description", &lancaster),
            vec!["field", "describ"]
        );
    }
}
