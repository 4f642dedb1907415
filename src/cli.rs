//! CLI interface for the resume scanner

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-scanner")]
#[command(about = "Score resumes against curated job profiles")]
#[command(long_about = "Extract text from PDF, DOCX or plain-text resumes, detect skills and \
keywords, and score the resume against each job profile in the skill catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one or more resumes
    Analyze {
        /// Resume files (PDF, DOCX, or anything else read as text)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file (single resume) or directory (several resumes)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show matched and missing skills for every profile
        #[arg(short, long)]
        detailed: bool,

        /// Skill catalog to use instead of the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Do not copy inputs into the uploads directory
        #[arg(long)]
        no_stage: bool,
    },

    /// List job profiles in the skill catalog
    Profiles {
        /// Show the required skills of a single profile
        #[arg(long)]
        id: Option<String>,

        /// Skill catalog to use instead of the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::parse_from([
            "resume-scanner",
            "analyze",
            "a.pdf",
            "b.docx",
            "--output",
            "html",
            "--no-stage",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { files, output, no_stage, detailed, .. } => {
                assert_eq!(files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.docx")]);
                assert_eq!(output.as_deref(), Some("html"));
                assert!(no_stage);
                assert!(!detailed);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_a_file() {
        assert!(Cli::try_parse_from(["resume-scanner", "analyze"]).is_err());
    }
}
