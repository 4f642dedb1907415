//! Report composition: readability, suggestions and the final analysis record

use crate::processing::scorer::ProfileScore;
use crate::processing::skill_matcher::DetectedSkills;
use crate::processing::text_processor::{SentenceSplitter, UnicodeSentenceSplitter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const DEFAULT_PREVIEW_CHARS: usize = 5000;
pub const DEFAULT_DISPLAYED_KEYWORDS: usize = 30;

/// Everything learned about one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Keyed by profile id.
    pub profile_scores: BTreeMap<String, ProfileScore>,
    pub best_match: ProfileScore,
    pub top_keywords: Vec<String>,
    pub text_preview: String,
    pub avg_words_per_sentence: f64,
    pub suggestions: Vec<String>,
    pub token_count: usize,
    pub sentence_count: usize,
    /// The skill set profiles were scored against, sorted.
    pub detected_skills: Vec<String>,
}

impl AnalysisReport {
    /// Profile scores from best to worst, ties broken by profile id.
    pub fn ranked_profiles(&self) -> Vec<&ProfileScore> {
        let mut ranked: Vec<&ProfileScore> = self.profile_scores.values().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.profile_id.cmp(&b.profile_id)));
        ranked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suggestion {
    AddRoleKeywords,
    ShortenSentences,
    AddProjectDetails,
}

impl Suggestion {
    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::AddRoleKeywords => {
                "Include more role-specific keywords (e.g., tools, libraries, languages)."
            }
            Suggestion::ShortenSentences => {
                "Shorten long sentences; keep bullet points for accomplishments."
            }
            Suggestion::AddProjectDetails => {
                "Add more concrete project details and metrics (e.g., reduced latency by 30%)."
            }
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Thresholds for the improvement suggestions. Each rule fires independently.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRules {
    pub min_best_score: u8,
    pub max_avg_sentence_words: f64,
    pub min_token_count: usize,
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            min_best_score: 60,
            max_avg_sentence_words: 25.0,
            min_token_count: 200,
        }
    }
}

impl SuggestionRules {
    pub fn evaluate(&self, best_score: u8, avg_words_per_sentence: f64, token_count: usize) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();
        if best_score < self.min_best_score {
            suggestions.push(Suggestion::AddRoleKeywords);
        }
        if avg_words_per_sentence > self.max_avg_sentence_words {
            suggestions.push(Suggestion::ShortenSentences);
        }
        if token_count < self.min_token_count {
            suggestions.push(Suggestion::AddProjectDetails);
        }
        suggestions
    }
}

pub struct ReportComposer {
    rules: SuggestionRules,
    preview_chars: usize,
    displayed_keywords: usize,
    splitter: Box<dyn SentenceSplitter>,
}

impl Default for ReportComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportComposer {
    pub fn new() -> Self {
        Self {
            rules: SuggestionRules::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            displayed_keywords: DEFAULT_DISPLAYED_KEYWORDS,
            splitter: Box::new(UnicodeSentenceSplitter),
        }
    }

    pub fn with_rules(mut self, rules: SuggestionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn with_displayed_keywords(mut self, displayed_keywords: usize) -> Self {
        self.displayed_keywords = displayed_keywords;
        self
    }

    pub fn with_sentence_splitter(mut self, splitter: impl SentenceSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Assemble the report. Pure: reads its inputs and nothing else.
    pub fn compose(
        &self,
        text: &str,
        tokens: &[String],
        detected: &DetectedSkills,
        scoring_skills: &BTreeSet<String>,
        profile_scores: Vec<ProfileScore>,
        best_match: ProfileScore,
    ) -> AnalysisReport {
        let sentence_count = self.splitter.count(text);
        let avg_words_per_sentence = average_words_per_sentence(tokens.len(), sentence_count);

        let suggestions = self
            .rules
            .evaluate(best_match.score, avg_words_per_sentence, tokens.len())
            .into_iter()
            .map(|s| s.message().to_string())
            .collect();

        AnalysisReport {
            profile_scores: profile_scores
                .into_iter()
                .map(|score| (score.profile_id.clone(), score))
                .collect(),
            best_match,
            top_keywords: detected
                .top_keyword_names()
                .take(self.displayed_keywords)
                .map(str::to_string)
                .collect(),
            text_preview: self.preview(text),
            avg_words_per_sentence,
            suggestions,
            token_count: tokens.len(),
            sentence_count,
            detected_skills: scoring_skills.iter().cloned().collect(),
        }
    }

    /// The first `preview_chars` characters of the raw text.
    pub fn preview(&self, text: &str) -> String {
        text.chars().take(self.preview_chars).collect()
    }
}

/// Tokens per sentence, rounded half to even at one decimal. Zero sentences count as one.
pub fn average_words_per_sentence(token_count: usize, sentence_count: usize) -> f64 {
    let average = token_count as f64 / sentence_count.max(1) as f64;
    (average * 10.0).round_ties_even() / 10.0
}
