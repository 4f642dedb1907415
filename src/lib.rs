//! Resume scanner library
//!
//! Extracts text from resumes, detects skills and keywords, and scores the
//! resume against a catalog of job profiles.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{Result, ResumeScannerError};
pub use processing::{AnalysisReport, ResumeAnalyzer, SkillCatalog};
