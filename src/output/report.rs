//! Report structures handed to the output formatters

use crate::input::file_detector::FileType;
use crate::input::manager::LoadedDocument;
use crate::processing::composer::AnalysisReport;
use crate::processing::scorer::ProfileScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One analysed resume together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub metadata: ReportMetadata,
    pub analysis: AnalysisReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,

    /// Version of the scanner that produced the report
    pub scanner_version: String,

    pub resume_file: String,
    pub file_type: FileType,

    /// Copy kept in the uploads directory, if staging is enabled
    pub staged_path: Option<String>,

    pub processing_time_ms: u64,
}

/// Coarse label for a profile score, shared by every formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Good,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=100 => ScoreBand::Strong,
            60..=79 => ScoreBand::Good,
            30..=59 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::Weak => "WEAK",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "score-strong",
            ScoreBand::Good => "score-good",
            ScoreBand::Fair => "score-fair",
            ScoreBand::Weak => "score-weak",
        }
    }
}

impl ScanReport {
    pub fn new(document: &LoadedDocument, analysis: AnalysisReport, processing_time_ms: u64) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                scanner_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: document.source_path.display().to_string(),
                file_type: document.file_type,
                staged_path: document
                    .staged_path
                    .as_ref()
                    .map(|path| path.display().to_string()),
                processing_time_ms,
            },
            analysis,
        }
    }

    pub fn best_match(&self) -> &ProfileScore {
        &self.analysis.best_match
    }

    /// File name of the resume without its directory.
    pub fn resume_name(&self) -> String {
        std::path::Path::new(&self.metadata.resume_file)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.metadata.resume_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::ResumeAnalyzer;
    use crate::processing::catalog::SkillCatalog;
    use std::path::PathBuf;

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Weak);
    }

    #[test]
    fn test_report_from_document() {
        let document = LoadedDocument {
            file_name: "cv.txt".to_string(),
            source_path: PathBuf::from("/tmp/resumes/cv.txt"),
            staged_path: None,
            file_type: FileType::Text,
            bytes: b"Python and SQL.".to_vec(),
        };
        let analyzer = ResumeAnalyzer::new(SkillCatalog::embedded().unwrap()).unwrap();
        let analysis = analyzer.analyze_document(&document.file_name, &document.bytes).unwrap();

        let report = ScanReport::new(&document, analysis, 12);
        assert_eq!(report.resume_name(), "cv.txt");
        assert_eq!(report.metadata.file_type, FileType::Text);
        assert_eq!(report.metadata.processing_time_ms, 12);
        assert_eq!(report.best_match().profile_id, "data_scientist");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metadata"]["file_type"], "text");
        assert!(json["analysis"]["profile_scores"]["data_scientist"].is_object());
    }
}
