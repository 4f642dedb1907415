//! Text tokenization, normalization and sentence splitting

use crate::processing::catalog::StopwordSet;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Turns raw resume text into the token stream the matcher works on.
pub struct TextProcessor {
    stopwords: StopwordSet,
    symbol_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(StopwordSet::english())
    }
}

impl TextProcessor {
    pub fn new(stopwords: StopwordSet) -> Self {
        // `+` and `#` survive so that c++ and c# stay intact
        let symbol_regex = Regex::new(r"[^a-z0-9+#\s]").expect("Invalid symbol regex");

        Self {
            stopwords,
            symbol_regex,
        }
    }

    /// Lowercase and blank out every character that cannot be part of a token.
    pub fn clean_text(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        self.symbol_regex.replace_all(&lowered, " ").into_owned()
    }

    /// Tokenize text into words, dropping stopwords and single-character tokens.
    ///
    /// Tokens keep their order of appearance and duplicates are kept, since
    /// keyword ranking depends on frequency.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.clean_text(text)
            .split_whitespace()
            .filter(|token| token.chars().count() > 1 && !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }
}

/// Sentence boundary detection used for the readability metric.
pub trait SentenceSplitter: Send + Sync {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;

    fn count(&self, text: &str) -> usize {
        self.split(text).len()
    }
}

/// Splits on Unicode sentence boundaries (UAX #29).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSentenceSplitter;

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
