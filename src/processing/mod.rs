//! Text processing and analysis module

pub mod catalog;
pub mod text_processor;
pub mod skill_matcher;
pub mod scorer;
pub mod composer;
pub mod analyzer;

pub use analyzer::ResumeAnalyzer;
pub use catalog::{JobProfile, ProfileCatalog, SkillCatalog};
pub use composer::{AnalysisReport, ReportComposer, Suggestion, SuggestionRules};
pub use scorer::{ProfileScore, ProfileScorer};
pub use skill_matcher::{DetectedSkills, SkillMatcher};
