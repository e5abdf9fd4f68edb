//! Report structure wrapping one analysis run for presentation

use crate::processing::ats_matcher::MatchStatus;
use crate::processing::jd_parser::Requirement;
use crate::processing::recommendations::Severity;
use crate::processing::session::AnalysisResults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub summary: ReportSummary,
    /// Full analysis output, for detailed and JSON output
    pub analysis: AnalysisResults,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// 0-100
    pub overall_score: u8,
    pub verdict: String,
    pub has_job_description: bool,
    pub keyword_count: usize,
    pub matched: Vec<String>,
    pub partial: Vec<String>,
    pub missing: Vec<String>,
    /// Subset of `missing` the job description requires
    pub missing_required: Vec<String>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub fragment_count: usize,
    pub processing_time_ms: u64,
}

/// One-line verdict for an overall score.
pub fn verdict(score: u8, has_job_description: bool) -> &'static str {
    if !has_job_description {
        return "No job description keywords found; nothing to score against";
    }
    match score {
        90..=100 => "Excellent keyword coverage",
        75..=89 => "Strong match with a few gaps",
        60..=74 => "Fair match; add the missing keywords",
        40..=59 => "Weak match; significant keyword gaps",
        _ => "Poor match for this job description",
    }
}

impl AtsReport {
    pub fn new(
        analysis: AnalysisResults,
        resume_file: &str,
        job_file: &str,
        fragment_count: usize,
        processing_time_ms: u64,
    ) -> Self {
        let summary = ReportSummary::from_results(&analysis);
        Self {
            summary,
            analysis,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.to_string(),
                job_file: job_file.to_string(),
                fragment_count,
                processing_time_ms,
            },
        }
    }
}

impl ReportSummary {
    pub fn from_results(results: &AnalysisResults) -> Self {
        let names = |status: MatchStatus| -> Vec<String> {
            results
                .keywords_by_status(status)
                .into_iter()
                .map(|r| r.keyword.text.clone())
                .collect()
        };
        let count = |severity: Severity| {
            results
                .recommendations
                .iter()
                .filter(|r| r.severity == severity)
                .count()
        };

        let missing_required = results
            .keywords_by_status(MatchStatus::Missing)
            .into_iter()
            .filter(|r| r.requirement == Requirement::Required)
            .map(|r| r.keyword.text.clone())
            .collect();

        Self {
            overall_score: results.score.overall,
            verdict: verdict(results.score.overall, results.has_job_description).to_string(),
            has_job_description: results.has_job_description,
            keyword_count: results.match_results.len(),
            matched: names(MatchStatus::Matched),
            partial: names(MatchStatus::Partial),
            missing: names(MatchStatus::Missing),
            missing_required,
            critical_count: count(Severity::Critical),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::jd_parser::parse_job_description;
    use crate::processing::session::analyze;
    use crate::resume::ResumeData;

    #[test]
    fn test_summary_from_results() {
        let profile = parse_job_description("Required: Python, AWS. Preferred: Docker.");
        let resume: ResumeData = serde_json::from_str(
            r#"{"skills": [{"category": "Core", "items": ["Python", "Git"]}],
                "experience": [{"title": "Engineer", "description": "Built services on AWS without containers"}]}"#,
        )
        .unwrap();

        let summary = ReportSummary::from_results(&analyze(&profile, &resume));
        assert_eq!(summary.overall_score, 80);
        assert_eq!(summary.matched, vec!["Python", "AWS"]);
        assert_eq!(summary.missing, vec!["Docker"]);
        assert!(summary.missing_required.is_empty());
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.verdict, "Strong match with a few gaps");
    }

    #[test]
    fn test_verdict_without_job_description() {
        assert!(verdict(0, false).starts_with("No job description"));
        assert_eq!(verdict(95, true), "Excellent keyword coverage");
    }
}
