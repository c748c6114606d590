//! Polarity scoring and the three-way sentiment label derived from it.
//!
//! The service only depends on [`SentimentScorer`]; [`LexiconScorer`] is the built-in
//! implementation. It averages word polarities from a small lexicon, scaling a word by a
//! preceding intensifier ("very good") and damping and flipping it after a negator
//! ("not good").
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scores text polarity in `[-1.0, 1.0]`.
///
/// Implementations must be total: every string, including the empty string and input with no
/// recognisable words, yields a finite score. `0.0` means neutral.
pub trait SentimentScorer: std::fmt::Debug + Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Strict sign comparison; only an exact zero is neutral.
    pub fn from_polarity(score: f64) -> Self {
        if score > 0.0 {
            Sentiment::Positive
        } else if score < 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

const NEGATION_FACTOR: f64 = -0.5;
const NEGATION_WINDOW: usize = 2;

const NEGATORS: &[&str] = &["not", "no", "never", "nor", "neither", "without", "hardly"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("quite", 1.1),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.4),
    ("slightly", 0.7),
    ("somewhat", 0.8),
];

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("calm", 0.3),
    ("cheerful", 0.6),
    ("clean", 0.37),
    ("cool", 0.35),
    ("delightful", 1.0),
    ("easy", 0.43),
    ("enjoy", 0.4),
    ("excellent", 1.0),
    ("exciting", 0.3),
    ("fantastic", 0.4),
    ("fine", 0.42),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("interesting", 0.5),
    ("like", 0.2),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("pleasant", 0.73),
    ("positive", 0.23),
    ("success", 0.3),
    ("successful", 0.75),
    ("superb", 1.0),
    ("thank", 0.3),
    ("thanks", 0.2),
    ("useful", 0.3),
    ("well", 0.2),
    ("win", 0.8),
    ("wonderful", 1.0),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("dangerous", -0.6),
    ("difficult", -0.5),
    ("dirty", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disgusting", -1.0),
    ("dull", -0.31),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.32),
    ("hard", -0.29),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("hurt", -0.4),
    ("loss", -0.3),
    ("negative", -0.3),
    ("pain", -0.5),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scary", -0.5),
    ("sick", -0.71),
    ("slow", -0.3),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("unhappy", -0.6),
    ("useless", -0.5),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

/// Lexicon-based [`SentimentScorer`].
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    /// Sentence-ending punctuation; clears any pending intensifier or negation.
    Boundary,
}

fn is_boundary(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() || c == '\'' || c == '\u{2019}' {
            word.push(if c == '\u{2019}' { '\'' } else { c });
            continue;
        }
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(&mut word).to_lowercase()));
        }
        if is_boundary(c) && tokens.last().is_some_and(|t| *t != Token::Boundary) {
            tokens.push(Token::Boundary);
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word.to_lowercase()));
    }
    tokens
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut matched = 0usize;

        // Intensifiers bind to the next word only; a negator to the next lexicon word within
        // NEGATION_WINDOW words.
        let mut intensifier: Option<f64> = None;
        let mut negated_at: Option<usize> = None;
        let mut position = 0usize;

        for token in tokenize(text) {
            let word = match token {
                Token::Boundary => {
                    intensifier = None;
                    negated_at = None;
                    continue;
                }
                Token::Word(word) => word,
            };
            position += 1;

            if let Some(&base) = self.lexicon.get(word.as_str()) {
                let mut score = base;
                if let Some(factor) = intensifier.take() {
                    score = (score * factor).clamp(-1.0, 1.0);
                }
                if negated_at
                    .take()
                    .is_some_and(|at| position - at <= NEGATION_WINDOW)
                {
                    score *= NEGATION_FACTOR;
                }

                total += score;
                matched += 1;
                continue;
            }

            intensifier = self.intensifiers.get(word.as_str()).copied();
            if is_negator(&word) {
                negated_at = Some(position);
            }
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}
