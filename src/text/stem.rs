//! Stemming strategies.
//!
//! Stemmers are stateless values passed to whoever needs them; nothing here
//! is shared through globals.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};

/// Reduces a single lower-case word to an approximate root.
pub trait Stem: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Selectable stemming algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemAlgorithm {
    /// Paice/Husk (Lancaster): aggressive, used for header matching.
    #[default]
    Lancaster,
    /// English Snowball (Porter2).
    Snowball,
    /// No stemming.
    #[value(name = "none")]
    #[serde(rename = "none")]
    Identity,
}

impl StemAlgorithm {
    pub fn build(self) -> Box<dyn Stem> {
        match self {
            StemAlgorithm::Lancaster => Box::new(Lancaster),
            StemAlgorithm::Snowball => Box::new(Snowball::english()),
            StemAlgorithm::Identity => Box::new(Unstemmed),
        }
    }
}

/// Identity stemmer: the path used for final token output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unstemmed;

impl Stem for Unstemmed {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }
}

/// English Snowball stemmer backed by `rust-stemmers`.
pub struct Snowball {
    stemmer: Stemmer,
}

impl Snowball {
    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl std::fmt::Debug for Snowball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snowball").finish_non_exhaustive()
    }
}

impl Stem for Snowball {
    fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }
}

// ─── Lancaster ───────────────────────────────────────────────────────

/// Paice/Husk rule table. Each rule reads: reversed ending, optional `*`
/// (only if the word is still intact), number of chars to remove, optional
/// replacement, then `>` to keep going or `.` to stop.
const LANCASTER_RULES: &[&str] = &[
    "ai*2.", "a*1.", "bb1.", "city3s.", "ci2>", "cn1t>", "dd1.", "dei3y>", "deec2ss.", "dee1.",
    "de2>", "dooh4>", "e1>", "feil1v.", "fi2>", "gni3>", "gai3y.", "ga2>", "gg1.", "ht*2.",
    "hsiug5ct.", "hsi3>", "i*1.", "i1y>", "ji1d.", "juf1s.", "ju1d.", "jo1d.", "jeh1r.",
    "jrev1t.", "jsim2t.", "jn1d.", "j1s.", "lbaifi6.", "lbai4y.", "lba3>", "lbi3.", "lib2l>",
    "lc1.", "lufi4y.", "luf3>", "lu2.", "lai3>", "lau3>", "la2>", "ll1.", "mui3.", "mu*2.",
    "msi3>", "mm1.", "nois4j>", "noix4ct.", "noi3>", "nai3>", "na2>", "nee0.", "ne2>", "nn1.",
    "pihs4>", "pp1.", "re2>", "rae0.", "ra2.", "ro2>", "ru2>", "rr1.", "rt1>", "rei3y>",
    "sei3y>", "sis2.", "si2>", "ssen4>", "ss0.", "suo3>", "su*2.", "s*1>", "s0.", "tacilp4y.",
    "ta2>", "tnem4>", "tne3>", "tna3>", "tpir2b.", "tpro2b.", "tcud1.", "tpmus2.", "tpec2iv.",
    "tulo2v.", "tsis0.", "tsi3>", "tt1.", "uqi3.", "ugo1.", "vis3j>", "vie0.", "vi2>", "ylb1>",
    "yli3y>", "ylp0.", "yl2>", "ygo1.", "yhp1.", "ymo1.", "ypo1.", "yti3>", "yte3>", "ytl2.",
    "yrtsi5.", "yra3>", "yro3>", "yfi3.", "ycn2t>", "yca3>", "zi2>", "zy1s.",
];

#[derive(Debug)]
struct Rule {
    ending: String,
    intact_only: bool,
    remove: usize,
    append: String,
    stop: bool,
}

impl Rule {
    fn parse(raw: &str) -> Option<Rule> {
        let digit_at = raw.find(|c: char| c.is_ascii_digit())?;
        let (head, tail) = raw.split_at(digit_at);
        let (reversed, intact_only) = match head.strip_suffix('*') {
            Some(h) => (h, true),
            None => (head, false),
        };
        if reversed.is_empty() || !reversed.chars().all(|c| c.is_ascii_lowercase()) {
            return None;
        }

        let mut tail = tail.chars();
        let remove = tail.next()?.to_digit(10)? as usize;
        let rest: String = tail.collect();
        let (append, stop) = match rest.chars().last() {
            Some('.') => (&rest[..rest.len() - 1], true),
            Some('>') => (&rest[..rest.len() - 1], false),
            _ => (rest.as_str(), false),
        };
        if !append.chars().all(|c| c.is_ascii_lowercase()) {
            return None;
        }

        Some(Rule {
            ending: reversed.chars().rev().collect(),
            intact_only,
            remove,
            append: append.to_string(),
            stop,
        })
    }

    fn key(&self) -> Option<char> {
        self.ending.chars().last()
    }
}

static PARSED_RULES: Lazy<Vec<Rule>> =
    Lazy::new(|| LANCASTER_RULES.iter().filter_map(|r| Rule::parse(r)).collect());

/// The Paice/Husk stemmer. Lossy; suited to fuzzy matching of headers rather
/// than to producing readable tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lancaster;

impl Stem for Lancaster {
    fn stem(&self, word: &str) -> String {
        let intact: Vec<char> = word.to_lowercase().chars().collect();
        let mut word = intact.clone();

        loop {
            let Some(last) = last_letter(&word) else {
                break;
            };

            let mut applied = false;
            let mut stop = false;
            for rule in PARSED_RULES.iter().filter(|r| r.key() == Some(last)) {
                if !ends_with(&word, &rule.ending) {
                    continue;
                }
                if rule.intact_only && word != intact {
                    continue;
                }
                if !acceptable(&word, rule.remove) {
                    continue;
                }
                word.truncate(word.len() - rule.remove);
                word.extend(rule.append.chars());
                applied = true;
                stop = rule.stop;
                break;
            }

            if !applied || stop {
                break;
            }
        }

        word.into_iter().collect()
    }
}

/// The last character of the leading alphabetic run, if any.
fn last_letter(word: &[char]) -> Option<char> {
    word.iter().take_while(|c| c.is_alphabetic()).last().copied()
}

fn ends_with(word: &[char], ending: &str) -> bool {
    let ending: Vec<char> = ending.chars().collect();
    word.len() >= ending.len() && word[word.len() - ending.len()..] == ending[..]
}

/// A stem must keep two letters when it starts with a vowel, otherwise three
/// letters with a vowel in the second or third position.
fn acceptable(word: &[char], remove: usize) -> bool {
    const VOWELS: &str = "aeiouy";
    let Some(first) = word.first() else {
        return false;
    };
    let remaining = word.len().saturating_sub(remove);
    if VOWELS.contains(*first) {
        remaining >= 2
    } else {
        remaining >= 3 && (VOWELS.contains(word[1]) || VOWELS.contains(word[2]))
    }
}
