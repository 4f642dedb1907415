//! Skill detection and keyword frequency ranking
//!
//! Detection runs in two stages:
//!
//! 1. Direct matching over the token stream: multi-word catalog skills are
//!    found as phrases in the re-joined tokens, and single-word skills are
//!    the normalized tokens that are themselves tokens of the document.
//! 2. Keyword fallback: the normalized form of every top keyword is added to
//!    the skill set used for scoring.
//!
//! The stages stay separate so each can be inspected on its own.

use crate::error::{Result, ResumeScannerError};
use crate::processing::catalog::{SkillCatalog, SynonymTable};
use aho_corasick::AhoCorasick;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

pub const DEFAULT_KEYWORD_LIMIT: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub count: usize,
}

/// Skills found directly in one document, plus its most frequent tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedSkills {
    pub skills: BTreeSet<String>,
    /// Most frequent first; equal counts keep first-appearance order.
    pub top_keywords: Vec<KeywordFrequency>,
}

impl DetectedSkills {
    pub fn top_keyword_names(&self) -> impl Iterator<Item = &str> {
        self.top_keywords.iter().map(|k| k.keyword.as_str())
    }
}

pub struct SkillMatcher {
    phrase_matcher: AhoCorasick,
    multi_word_skills: Vec<String>,
    synonyms: SynonymTable,
    keyword_limit: usize,
}

impl SkillMatcher {
    pub fn new(catalog: &SkillCatalog) -> Result<Self> {
        let multi_word_skills: Vec<String> = catalog.profiles.multi_word_skills().into_iter().collect();

        let phrase_matcher = AhoCorasick::new(&multi_word_skills).map_err(|e| {
            ResumeScannerError::Processing(format!("Failed to build skill phrase matcher: {}", e))
        })?;

        Ok(Self {
            phrase_matcher,
            multi_word_skills,
            synonyms: catalog.synonyms.clone(),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
        })
    }

    pub fn with_keyword_limit(mut self, limit: usize) -> Self {
        self.keyword_limit = limit;
        self
    }

    /// Stage 1: direct skill matching plus keyword ranking.
    pub fn find_skills(&self, tokens: &[String]) -> DetectedSkills {
        let mut skills = self.match_phrases(tokens);
        skills.extend(self.match_single_words(tokens));
        let top_keywords = self.rank_keywords(tokens);

        debug!(
            "Detected {} skills directly, ranked {} keywords",
            skills.len(),
            top_keywords.len()
        );

        DetectedSkills {
            skills,
            top_keywords,
        }
    }

    /// Stage 2: the skill set profiles are scored against.
    pub fn scoring_skills(&self, detected: &DetectedSkills) -> BTreeSet<String> {
        let mut skills = detected.skills.clone();
        skills.extend(
            detected
                .top_keyword_names()
                .map(|keyword| self.synonyms.normalize_skill(keyword)),
        );
        skills
    }

    /// Multi-word skills contained in the space-joined token stream.
    ///
    /// Containment is plain substring matching, so "deep learning" is also
    /// found inside "deep learnings".
    pub fn match_phrases(&self, tokens: &[String]) -> BTreeSet<String> {
        let joined = tokens.join(" ");
        self.phrase_matcher
            .find_overlapping_iter(&joined)
            .map(|m| self.multi_word_skills[m.pattern().as_usize()].clone())
            .collect()
    }

    /// Normalized tokens that also occur verbatim among the document's tokens.
    ///
    /// A token with no synonym normalizes to itself and is always kept; a
    /// synonym key is kept only when its canonical form appears too.
    pub fn match_single_words(&self, tokens: &[String]) -> BTreeSet<String> {
        let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        tokens
            .iter()
            .map(|token| self.synonyms.normalize_skill(token))
            .filter(|canonical| token_set.contains(canonical.as_str()))
            .collect()
    }

    /// Count every token and keep the `keyword_limit` most frequent.
    pub fn rank_keywords(&self, tokens: &[String]) -> Vec<KeywordFrequency> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for token in tokens {
            let count = counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(token.as_str());
            }
            *count += 1;
        }

        let mut ranked: Vec<KeywordFrequency> = first_seen
            .into_iter()
            .map(|keyword| KeywordFrequency {
                keyword: keyword.to_string(),
                count: counts[keyword],
            })
            .collect();

        // sort_by is stable, so ties stay in first-appearance order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(self.keyword_limit);
        ranked
    }
}
