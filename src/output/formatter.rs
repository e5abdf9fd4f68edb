//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::AtsReport;
use crate::processing::ats_matcher::{MatchResult, MatchStatus};
use crate::processing::jd_parser::{JobDescriptionProfile, Requirement};
use crate::processing::recommendations::{Recommendation, Severity};
use crate::processing::resume_index::SectionType;
use crate::processing::scoring::SectionCoverage;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String>;
}

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

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRITICAL",
        Severity::Warning => "WARNING",
        Severity::Info => "INFO",
    }
}

/// Human label for a fragment location, e.g. `experience:1` -> `Experience #2`.
pub fn location_label(location: &str) -> String {
    let mut parts = location.split(':');
    let section = parts
        .next()
        .and_then(SectionType::from_key)
        .map(|s| s.to_string())
        .unwrap_or_else(|| location.to_string());
    let indices: Vec<String> = parts
        .filter_map(|p| p.parse::<usize>().ok())
        .map(|i| format!("#{}", i + 1))
        .collect();

    if indices.is_empty() {
        section
    } else {
        format!("{} {}", section, indices.join("."))
    }
}

fn coverage_line(coverage: &SectionCoverage) -> String {
    format!("{}/{} ({}%)", coverage.covered, coverage.total, coverage.percentage)
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
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            75..=89 => ("STRONG", Color::BrightGreen),
            60..=74 => ("FAIR", Color::Yellow),
            40..=59 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_severity(&self, severity: Severity) -> String {
        let color = match severity {
            Severity::Critical => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
        };
        self.colorize(&format!("[{}]", severity_label(severity)), color)
    }

    fn format_keywords(&self, label: &str, keywords: &[String], color: Color) -> String {
        if keywords.is_empty() {
            return String::new();
        }
        format!("{} {}\n", label, self.colorize(&keywords.join(", "), color))
    }

    fn format_match(&self, result: &MatchResult) -> String {
        let status = match result.status {
            MatchStatus::Matched => self.colorize("matched", Color::Green),
            MatchStatus::Partial => self.colorize("partial", Color::Yellow),
            MatchStatus::Missing => self.colorize("missing", Color::Red),
        };
        let mut line = format!(
            "  {:<24} {} (weight {:.1})",
            result.keyword.text, status, result.weight
        );
        if !result.locations.is_empty() {
            let places: Vec<String> = result.locations.iter().map(|l| location_label(l)).collect();
            line.push_str(&format!(" in {}", places.join(", ")));
        }
        if !result.variants.is_empty() {
            line.push_str(&format!(" as \"{}\"", result.variants.join("\", \"")));
        }
        line.push('\n');
        line
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String> {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS KEYWORD ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Score", 2));
        if summary.has_job_description {
            output.push_str(&format!(
                "Overall: {}% {}\n",
                summary.overall_score,
                self.format_score_badge(summary.overall_score)
            ));
        } else {
            output.push_str("Overall: n/a\n");
        }
        output.push_str(&format!("Verdict: {}\n", self.colorize(&summary.verdict, Color::Cyan)));

        if summary.has_job_description {
            output.push_str(&self.format_header("Keywords", 2));
            output.push_str(&self.format_keywords("Matched:", &summary.matched, Color::Green));
            output.push_str(&self.format_keywords("Partial:", &summary.partial, Color::Yellow));
            output.push_str(&self.format_keywords("Missing:", &summary.missing, Color::Red));

            let by_category = &report.analysis.score.by_category;
            if !by_category.is_empty() {
                let parts: Vec<String> = by_category
                    .iter()
                    .map(|(category, score)| format!("{} {}%", category, score))
                    .collect();
                output.push_str(&format!("By category: {}\n", parts.join(" | ")));
            }
        }

        output.push_str(&self.format_header("Recommendations", 2));
        if report.analysis.recommendations.is_empty() {
            output.push_str(&self.colorize("  Nothing to fix.\n", Color::Green));
        }
        for rec in &report.analysis.recommendations {
            output.push_str(&format!(
                "{} {} {}\n",
                self.format_severity(rec.severity),
                rec.message,
                self.colorize(&format!("({})", location_label(&rec.location)), Color::BrightBlack)
            ));
        }

        if self.detailed && summary.has_job_description {
            output.push_str(&self.format_header("Match Details", 3));
            for result in &report.analysis.match_results {
                output.push_str(&self.format_match(result));
            }

            output.push_str(&self.format_header("Coverage by Location", 3));
            for (location, coverage) in &report.analysis.score.by_section {
                output.push_str(&format!(
                    "  {:<24} {}\n",
                    location_label(location),
                    coverage_line(coverage)
                ));
            }
        }

        output.push_str(&format!(
            "\nGenerated by resume-ats v{} | Resume: {} | Job: {}\n",
            report.metadata.tool_version, report.metadata.resume_file, report.metadata.job_file
        ));

        Ok(output)
    }

}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn format_recommendation(rec: &Recommendation) -> String {
        format!(
            "- **{}** {} _({})_\n",
            severity_label(rec.severity),
            rec.message,
            location_label(&rec.location)
        )
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String> {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str("# ATS Keyword Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_name(&report.metadata.resume_file),
                file_name(&report.metadata.job_file)
            ));
        }

        output.push_str("## Score\n\n");
        if summary.has_job_description {
            output.push_str(&format!("**Overall:** {}%\n\n", summary.overall_score));
        }
        output.push_str(&format!("**Verdict:** {}\n\n", summary.verdict));

        if summary.has_job_description {
            output.push_str("## Keywords\n\n");
            output.push_str("| Keyword | Status | Requirement | Found in |\n");
            output.push_str("|---------|--------|-------------|----------|\n");
            for result in &report.analysis.match_results {
                let requirement = match result.requirement {
                    Requirement::Required => "required",
                    Requirement::Preferred => "preferred",
                };
                let places: Vec<String> = result.locations.iter().map(|l| location_label(l)).collect();
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    result.keyword.text,
                    result.status,
                    requirement,
                    places.join(", ")
                ));
            }
            output.push('\n');

            if !report.analysis.score.by_section.is_empty() {
                output.push_str("### Coverage by Location\n\n");
                output.push_str("| Location | Covered |\n");
                output.push_str("|----------|---------|\n");
                for (location, coverage) in &report.analysis.score.by_section {
                    output.push_str(&format!(
                        "| {} | {} |\n",
                        location_label(location),
                        coverage_line(coverage)
                    ));
                }
                output.push('\n');
            }
        }

        output.push_str("## Recommendations\n\n");
        for severity in [Severity::Critical, Severity::Warning, Severity::Info] {
            for rec in report.analysis.recommendations.iter().filter(|r| r.severity == severity) {
                output.push_str(&Self::format_recommendation(rec));
            }
        }
        if report.analysis.recommendations.is_empty() {
            output.push_str("Nothing to fix.\n");
        }

        if self.include_metadata {
            output.push_str("\n---\n\n");
            output.push_str(&format!("*Generated by resume-ats v{}*\n", report.metadata.tool_version));
        }

        Ok(output)
    }

}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AtsReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyword listing for the `keywords` command.
pub fn format_profile(profile: &JobDescriptionProfile, use_colors: bool) -> String {
    let console = ConsoleFormatter::new(use_colors, false);
    let mut output = console.format_header("JOB DESCRIPTION KEYWORDS", 1);

    if !profile.has_job_description() {
        output.push_str("No known keywords found.\n");
        return output;
    }

    for (title, requirement, color) in [
        ("Required", Requirement::Required, Color::Red),
        ("Preferred", Requirement::Preferred, Color::Yellow),
    ] {
        let keywords: Vec<_> = profile
            .keywords
            .iter()
            .filter(|k| profile.requirement_of(k) == requirement)
            .collect();
        if keywords.is_empty() {
            continue;
        }
        output.push_str(&console.format_header(title, 2));
        for keyword in keywords {
            output.push_str(&format!(
                "  {} {}\n",
                console.colorize(&keyword.text, color),
                console.colorize(
                    &format!(
                        "({}, weight {:.1}, mentioned {}x)",
                        keyword.category,
                        profile.weight_of(keyword),
                        profile.frequency_of(keyword)
                    ),
                    Color::BrightBlack
                )
            ));
        }
    }

    output
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Default report file name for a resume, e.g. `jane.json` -> `jane_ats.md`.
pub fn suggest_filename(format: OutputFormat, resume_path: &Path) -> String {
    let stem = resume_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "resume".into());
    format!("{}_ats.{}", stem, format.extension())
}

/// Where `--save` writes: the path itself, or a suggested file name inside
/// it when it names an existing directory.
pub fn report_path(save: &Path, format: OutputFormat, resume_path: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, resume_path))
    } else {
        save.to_path_buf()
    }
}
