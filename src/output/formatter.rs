//! Output formatters: console, JSON, Markdown and HTML renderings of a scan report

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScannerError};
use crate::output::report::{ScanReport, ScoreBand};
use askama::Template;
use colored::{Color, Colorize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Number of missing skills listed per profile in the short console view.
const MISSING_SKILLS_SHORT: usize = 5;

pub trait OutputFormatter {
    fn format_report(&self, report: &ScanReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output, optionally colored
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Standalone HTML page
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Scan: {{ resume_name }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; border-bottom: 3px solid #007acc; padding-bottom: 20px; }
        .score-badge { display: inline-block; padding: 4px 12px; border-radius: 14px; font-weight: bold; color: white; }
        .score-strong { background: #28a745; }
        .score-good { background: #17a2b8; }
        .score-fair { background: #ffc107; color: #000; }
        .score-weak { background: #dc3545; }
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e9ecef; vertical-align: top; }
        .section h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }
        .keyword { display: inline-block; background: #e7f1ff; border-radius: 4px; padding: 2px 8px; margin: 2px; }
        .preview { white-space: pre-wrap; background: #f8f9fa; padding: 15px; border-radius: 6px; font-size: 0.9em; }
        .footer { margin-top: 30px; font-size: 0.85em; color: #6c757d; text-align: center; }
    </style>
    {% endif %}
</head>
<body>
<div class="container">
    <div class="header">
        <h1>Resume Scan Report</h1>
        <p>Best match: <strong>{{ best_title }}</strong>
            <span class="score-badge {{ best_class }}">{{ best_score }}%</span></p>
    </div>

    <div class="section">
        <h2>Profile Scores</h2>
        <table>
            <tr><th>Profile</th><th>Score</th><th>Matched</th><th>Missing</th></tr>
            {% for profile in profiles %}
            <tr>
                <td>{{ profile.title }}</td>
                <td><span class="score-badge {{ profile.css_class }}">{{ profile.score }}%</span></td>
                <td>{{ profile.matched }}</td>
                <td>{{ profile.missing }}</td>
            </tr>
            {% endfor %}
        </table>
    </div>

    <div class="section">
        <h2>Readability</h2>
        <p>{{ token_count }} words across {{ sentence_count }} sentences, {{ avg_words }} words per sentence.</p>
    </div>

    {% if has_suggestions %}
    <div class="section">
        <h2>Suggestions</h2>
        <ul>
            {% for suggestion in suggestions %}
            <li>{{ suggestion }}</li>
            {% endfor %}
        </ul>
    </div>
    {% endif %}

    <div class="section">
        <h2>Top Keywords</h2>
        <p>{% for keyword in keywords %}<span class="keyword">{{ keyword }}</span>{% endfor %}</p>
    </div>

    <div class="section">
        <h2>Text Preview</h2>
        <div class="preview">{{ preview }}</div>
    </div>

    <div class="footer">
        {{ resume_name }} ({{ file_type }}) scanned {{ generated_at }} in {{ processing_time }}ms by resume-scanner {{ version }}
    </div>
</div>
</body>
</html>"#
)]
struct HtmlTemplate {
    include_styles: bool,
    resume_name: String,
    file_type: String,
    generated_at: String,
    processing_time: u64,
    version: String,
    best_title: String,
    best_score: u8,
    best_class: String,
    profiles: Vec<HtmlProfile>,
    token_count: usize,
    sentence_count: usize,
    avg_words: String,
    has_suggestions: bool,
    suggestions: Vec<String>,
    keywords: Vec<String>,
    preview: String,
}

struct HtmlProfile {
    title: String,
    score: u8,
    css_class: String,
    matched: String,
    missing: String,
}

fn format_timestamp(report: &ScanReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let band = ScoreBand::from_score(score);
        let color = match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Good => Color::BrightGreen,
            ScoreBand::Fair => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScanReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("RESUME SCAN: {}", report.resume_name()), 1));
        output.push_str(&format!(
            "Generated: {} | Type: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.file_type,
            report.metadata.processing_time_ms
        ));

        let best = &analysis.best_match;
        output.push_str(&self.format_header("Best Match", 2));
        output.push_str(&format!(
            "{} {}% {}\n",
            self.colorize(&best.profile_title, Color::Cyan),
            best.score,
            self.format_score_badge(best.score)
        ));

        output.push_str(&self.format_header("Profile Scores", 2));
        for profile in analysis.ranked_profiles() {
            output.push_str(&format!(
                "  {:<22} {:>3}% {}\n",
                profile.profile_title,
                profile.score,
                self.format_score_badge(profile.score)
            ));
            if self.detailed {
                output.push_str(&format!(
                    "      matched: {}\n",
                    self.colorize(&join_or_dash(&profile.matched_skills), Color::Green)
                ));
                output.push_str(&format!(
                    "      missing: {}\n",
                    self.colorize(&join_or_dash(&profile.missing_skills), Color::Red)
                ));
            }
        }

        if !self.detailed && !best.missing_skills.is_empty() {
            let shown: Vec<String> = best.missing_skills.iter().take(MISSING_SKILLS_SHORT).cloned().collect();
            let more = best.missing_skills.len().saturating_sub(shown.len());
            output.push_str(&format!("\nMissing for {}: {}", best.profile_title, shown.join(", ")));
            if more > 0 {
                output.push_str(&format!(" (+{} more)", more));
            }
            output.push('\n');
        }

        output.push_str(&self.format_header("Readability", 3));
        output.push_str(&format!(
            "Words: {} | Sentences: {} | Avg words/sentence: {:.1}\n",
            analysis.token_count, analysis.sentence_count, analysis.avg_words_per_sentence
        ));

        if !analysis.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 3));
            for (i, suggestion) in analysis.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output.push_str(&self.format_header("Top Keywords", 3));
        output.push_str(&format!("{}\n", join_or_dash(&analysis.top_keywords)));

        if self.detailed {
            output.push_str(&self.format_header("Detected Skills", 3));
            output.push_str(&format!("{}\n", join_or_dash(&analysis.detected_skills)));

            output.push_str(&self.format_header("Text Preview", 3));
            output.push_str(&analysis.text_preview);
            output.push('\n');

            if let Some(staged) = &report.metadata.staged_path {
                output.push_str(&format!("\nStaged copy: {}\n", staged));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScanReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScanReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("# Resume Scan Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` ({})\n\n",
                report.resume_name(),
                report.metadata.file_type
            ));
        }

        output.push_str("## Best Match\n\n");
        output.push_str(&format!(
            "**{}** with {}% ({})\n\n",
            analysis.best_match.profile_title,
            analysis.best_match.score,
            ScoreBand::from_score(analysis.best_match.score).label()
        ));

        output.push_str("## Profile Scores\n\n");
        output.push_str("| Profile | Score | Matched | Missing |\n");
        output.push_str("|---------|-------|---------|---------|\n");
        for profile in analysis.ranked_profiles() {
            output.push_str(&format!(
                "| {} | {}% | {} | {} |\n",
                profile.profile_title,
                profile.score,
                join_or_dash(&profile.matched_skills),
                join_or_dash(&profile.missing_skills)
            ));
        }
        output.push('\n');

        output.push_str("## Readability\n\n");
        output.push_str(&format!(
            "- Words: {}\n- Sentences: {}\n- Average words per sentence: {:.1}\n\n",
            analysis.token_count, analysis.sentence_count, analysis.avg_words_per_sentence
        ));

        if !analysis.suggestions.is_empty() {
            output.push_str("## Suggestions\n\n");
            for suggestion in &analysis.suggestions {
                output.push_str(&format!("- {}\n", suggestion));
            }
            output.push('\n');
        }

        output.push_str("## Top Keywords\n\n");
        let keywords: Vec<String> = analysis.top_keywords.iter().map(|k| format!("`{}`", k)).collect();
        output.push_str(&format!("{}\n\n", join_or_dash(&keywords)));

        output.push_str("## Text Preview\n\n```text\n");
        output.push_str(&analysis.text_preview);
        output.push_str("\n```\n");

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &ScanReport) -> HtmlTemplate {
        let analysis = &report.analysis;
        let best = &analysis.best_match;

        let profiles = analysis
            .ranked_profiles()
            .into_iter()
            .map(|profile| HtmlProfile {
                title: profile.profile_title.clone(),
                score: profile.score,
                css_class: ScoreBand::from_score(profile.score).css_class().to_string(),
                matched: join_or_dash(&profile.matched_skills),
                missing: join_or_dash(&profile.missing_skills),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            resume_name: report.resume_name(),
            file_type: report.metadata.file_type.to_string(),
            generated_at: format_timestamp(report),
            processing_time: report.metadata.processing_time_ms,
            version: report.metadata.scanner_version.clone(),
            best_title: best.profile_title.clone(),
            best_score: best.score,
            best_class: ScoreBand::from_score(best.score).css_class().to_string(),
            profiles,
            token_count: analysis.token_count,
            sentence_count: analysis.sentence_count,
            avg_words: format!("{:.1}", analysis.avg_words_per_sentence),
            has_suggestions: !analysis.suggestions.is_empty(),
            suggestions: analysis.suggestions.clone(),
            keywords: analysis.top_keywords.clone(),
            preview: analysis.text_preview.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ScanReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeScannerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &ScanReport, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), *format);
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// `<resume stem>_analysis[_<timestamp>].<ext>`
pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!("{}_analysis{}.{}", base_name, timestamp_suffix, format.extension())
}

/// Chooses where each report of one run is saved.
///
/// A single resume saves to the target itself unless it is a directory. Otherwise
/// reports land in the target directory under [`suggest_filename`] names, and a name
/// already taken in this run gets a `_2`, `_3`, ... suffix.
#[derive(Debug)]
pub struct ReportPaths {
    target: PathBuf,
    batch: bool,
    used: HashSet<PathBuf>,
}

impl ReportPaths {
    pub fn new(target: impl Into<PathBuf>, file_count: usize) -> Self {
        let target = target.into();
        let batch = file_count > 1 || target.is_dir();
        Self {
            target,
            batch,
            used: HashSet::new(),
        }
    }

    pub fn path_for(&mut self, format: &OutputFormat, resume_name: &str) -> PathBuf {
        if !self.batch {
            return self.target.clone();
        }

        let file_name = suggest_filename(format, resume_name, false);
        let extension = format!(".{}", format.extension());
        let stem = file_name.strip_suffix(extension.as_str()).unwrap_or(&file_name);

        let mut path = self.target.join(&file_name);
        let mut n = 2;
        while self.used.contains(&path) {
            path = self.target.join(format!("{}_{}{}", stem, n, extension));
            n += 1;
        }
        self.used.insert(path.clone());
        path
    }
}
