//! Resume analysis pipeline
//!
//! text -> tokens -> detected skills -> profile scores -> best match -> report.
//! A `ResumeAnalyzer` holds only immutable tables, so one instance can serve
//! any number of documents, including concurrently from several threads.

use crate::config::AnalysisConfig;
use crate::error::{Result, ResumeScannerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::extract_text;
use crate::processing::catalog::{ProfileCatalog, SkillCatalog};
use crate::processing::composer::{AnalysisReport, ReportComposer};
use crate::processing::scorer::ProfileScorer;
use crate::processing::skill_matcher::SkillMatcher;
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};

pub struct ResumeAnalyzer {
    profiles: ProfileCatalog,
    processor: TextProcessor,
    matcher: SkillMatcher,
    scorer: ProfileScorer,
    composer: ReportComposer,
}

impl ResumeAnalyzer {
    pub fn new(catalog: SkillCatalog) -> Result<Self> {
        let matcher = SkillMatcher::new(&catalog)?;
        let SkillCatalog {
            profiles,
            stopwords,
            ..
        } = catalog;

        Ok(Self {
            profiles,
            processor: TextProcessor::new(stopwords),
            matcher,
            scorer: ProfileScorer,
            composer: ReportComposer::new(),
        })
    }

    pub fn from_config(catalog: SkillCatalog, config: &AnalysisConfig) -> Result<Self> {
        let mut analyzer = Self::new(catalog)?;
        analyzer.matcher = analyzer.matcher.with_keyword_limit(config.keyword_limit);
        analyzer.composer = ReportComposer::new()
            .with_rules(config.suggestion_rules())
            .with_preview_chars(config.preview_chars)
            .with_displayed_keywords(config.displayed_keywords);
        Ok(analyzer)
    }

    pub fn with_composer(mut self, composer: ReportComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn profiles(&self) -> &ProfileCatalog {
        &self.profiles
    }

    /// Extract and analyse a document; the format follows the file name suffix.
    pub fn analyze_document(&self, file_name: &str, bytes: &[u8]) -> Result<AnalysisReport> {
        let file_type = FileType::from_path(std::path::Path::new(file_name));
        let text = extract_text(bytes, file_type)?;
        info!("Extracted {} characters from {}", text.chars().count(), file_name);
        self.analyze_text(&text)
    }

    pub fn analyze_text(&self, text: &str) -> Result<AnalysisReport> {
        let tokens = self.processor.tokenize(text);
        debug!("Tokenized into {} tokens", tokens.len());

        let detected = self.matcher.find_skills(&tokens);
        let scoring_skills = self.matcher.scoring_skills(&detected);

        let profile_scores = self.scorer.score_all(&scoring_skills, &self.profiles);
        let best_match = ProfileScorer::best_match(&profile_scores)
            .cloned()
            .ok_or_else(|| ResumeScannerError::Catalog("Catalog has no profiles".to_string()))?;

        info!(
            "Best match: {} ({}%) from {} detected skills",
            best_match.profile_title,
            best_match.score,
            scoring_skills.len()
        );

        Ok(self.composer.compose(
            text,
            &tokens,
            &detected,
            &scoring_skills,
            profile_scores,
            best_match,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ResumeAnalyzer {
        ResumeAnalyzer::new(SkillCatalog::embedded().unwrap()).unwrap()
    }

    #[test]
    fn test_software_engineer_scenario() {
        let text = "I have 5 years of experience with Python, Docker, and AWS. \
                    I built REST APIs using Python and deployed with Docker on AWS.";
        let report = analyzer().analyze_text(text).unwrap();

        let se = &report.profile_scores["software_engineer"];
        let ds = &report.profile_scores["data_scientist"];
        assert!(se.score > ds.score);
        assert_eq!(se.matched_skills, vec!["aws", "docker", "python", "rest"]);
        assert_eq!(se.score, 26);
        assert_eq!(report.best_match.profile_title, "Software Engineer");

        assert_eq!(report.token_count, 13);
        assert_eq!(report.sentence_count, 2);
        assert_eq!(report.avg_words_per_sentence, 6.5);
        assert_eq!(report.top_keywords[0], "python");
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn test_empty_document_report() {
        let report = analyzer().analyze_document("resume.pdf", &[]).unwrap();

        assert!(report.profile_scores.values().all(|s| s.score == 0));
        assert_eq!(report.avg_words_per_sentence, 0.0);
        assert_eq!(report.suggestions.len(), 2);
        assert!(report.suggestions[0].starts_with("Include more role-specific keywords"));
        assert!(report.suggestions[1].starts_with("Add more concrete project details"));
        assert!(report.top_keywords.is_empty());
        assert_eq!(report.best_match.profile_id, "software_engineer");
    }

    #[test]
    fn test_synonyms_reach_scoring_through_keywords() {
        let report = analyzer()
            .analyze_text("Worked on ML and DL research with TF and py.")
            .unwrap();
        let ds = &report.profile_scores["data_scientist"];
        for skill in ["machine learning", "deep learning", "tensorflow", "python"] {
            assert!(ds.matched_skills.contains(&skill.to_string()), "missing {}", skill);
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let analyzer = analyzer();
        let text = "React and Vue with TypeScript. HTML, CSS, Sass, webpack. Responsive layouts.";
        let first = analyzer.analyze_text(text).unwrap();
        let second = analyzer.analyze_text(text).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.best_match.profile_id, "frontend_engineer");
    }

    #[test]
    fn test_configured_limits() {
        let config = AnalysisConfig {
            displayed_keywords: 2,
            preview_chars: 10,
            min_token_count: 1,
            ..AnalysisConfig::default()
        };
        let analyzer = ResumeAnalyzer::from_config(SkillCatalog::embedded().unwrap(), &config).unwrap();
        let report = analyzer
            .analyze_text("Kubernetes Kubernetes Terraform Ansible Prometheus monitoring")
            .unwrap();

        assert_eq!(report.top_keywords, vec!["kubernetes", "terraform"]);
        assert_eq!(report.text_preview, "Kubernetes");
        assert_eq!(report.best_match.profile_id, "devops_engineer");
        assert!(!report
            .suggestions
            .iter()
            .any(|s| s.starts_with("Add more concrete project details")));
    }

    #[test]
    fn test_replaced_composer_drives_readability() {
        use crate::processing::text_processor::SentenceSplitter;

        struct LineSplitter;
        impl SentenceSplitter for LineSplitter {
            fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
                text.lines().filter(|l| !l.trim().is_empty()).collect()
            }
        }

        let text = "Python developer\nDocker deployments\nKubernetes clusters";
        let default_report = analyzer().analyze_text(text).unwrap();

        let analyzer =
            analyzer().with_composer(ReportComposer::new().with_sentence_splitter(LineSplitter));
        let report = analyzer.analyze_text(text).unwrap();

        assert_eq!(report.sentence_count, 3);
        assert_eq!(report.avg_words_per_sentence, 2.0);
        assert_eq!(report.profile_scores, default_report.profile_scores);
    }

    #[test]
    fn test_unreadable_docx_is_an_error() {
        let result = analyzer().analyze_document("resume.docx", b"not a zip archive");
        assert!(matches!(result, Err(ResumeScannerError::DocxExtraction(_))));
    }
}
