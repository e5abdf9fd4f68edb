//! Weighted ATS coverage scores

use crate::processing::ats_matcher::{MatchResult, MatchStatus};
use crate::processing::dictionary::KeywordCategory;
use crate::processing::jd_parser::DEFAULT_REQUIRED_WEIGHT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCoverage {
    /// Distinct keywords found (exactly or partially) here
    pub covered: usize,
    /// Keywords checked against this location
    pub total: usize,
    /// 0-100
    pub percentage: u8,
}

impl SectionCoverage {
    pub fn new(covered: usize, total: usize) -> Self {
        Self {
            covered,
            total,
            percentage: percentage(covered, total),
        }
    }
}

/// Score breakdown for one analysis run. Always rebuilt from scratch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreBreakdown {
    /// Weighted coverage, 0-100
    pub overall: u8,
    /// Fragment location -> coverage
    pub by_section: BTreeMap<String, SectionCoverage>,
    /// Weighted coverage per keyword category, for categories present
    pub by_category: BTreeMap<KeywordCategory, u8>,
}

impl AtsScoreBreakdown {
    /// True for the "no job description" sentinel.
    pub fn is_empty(&self) -> bool {
        self.by_section.is_empty() && self.by_category.is_empty() && self.overall == 0
    }
}

fn percentage(covered: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        ((covered as f32 / total as f32) * 100.0).round() as u8
    }
}

fn weighted_score<'a>(
    results: impl Iterator<Item = &'a MatchResult>,
    weights: &BTreeMap<String, f32>,
) -> u8 {
    let (earned, possible) = results.fold((0.0f32, 0.0f32), |(earned, possible), result| {
        let weight = weights
            .get(&result.keyword.normalized)
            .copied()
            .unwrap_or(DEFAULT_REQUIRED_WEIGHT);
        (earned + weight * result.status.credit(), possible + weight)
    });

    if possible <= 0.0 {
        0
    } else {
        ((earned / possible) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Aggregate match results into overall, per-location and per-category scores.
///
/// Matched keywords earn their full weight, partial ones half. Every keyword
/// is checked against every fragment, so each location's total is the full
/// keyword count. No keywords yields the empty sentinel breakdown.
pub fn aggregate_score(results: &[MatchResult], weights: &BTreeMap<String, f32>) -> AtsScoreBreakdown {
    if results.is_empty() {
        return AtsScoreBreakdown::default();
    }

    let overall = weighted_score(results.iter(), weights);

    let total = results.len();
    let mut covered_at: BTreeMap<String, usize> = BTreeMap::new();
    for result in results.iter().filter(|r| r.status.is_covered()) {
        for location in &result.locations {
            *covered_at.entry(location.clone()).or_insert(0) += 1;
        }
    }
    let by_section = covered_at
        .into_iter()
        .map(|(location, covered)| (location, SectionCoverage::new(covered, total)))
        .collect();

    let mut by_category = BTreeMap::new();
    for category in results.iter().map(|r| r.keyword.category) {
        by_category.entry(category).or_insert_with(|| {
            weighted_score(results.iter().filter(|r| r.keyword.category == category), weights)
        });
    }

    AtsScoreBreakdown {
        overall,
        by_section,
        by_category,
    }
}

/// Coverage over every location of a section (`experience` covers
/// `experience:0`, `experience:1`, ...). Only exact matches count as covered;
/// the total is the number of keywords found anywhere in the section.
pub fn coverage_for_section(results: &[MatchResult], section: &str) -> SectionCoverage {
    let in_section = |location: &String| {
        location == section
            || location
                .strip_prefix(section)
                .map_or(false, |rest| rest.starts_with(':'))
    };

    let present: Vec<&MatchResult> = results
        .iter()
        .filter(|r| r.locations.iter().any(in_section))
        .collect();
    let covered = present
        .iter()
        .filter(|r| r.status == MatchStatus::Matched)
        .count();

    SectionCoverage::new(covered, present.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ats_matcher::match_keywords;
    use crate::processing::jd_parser::parse_job_description;
    use crate::processing::resume_index::ResumeFragment;

    fn scenario() -> (Vec<MatchResult>, BTreeMap<String, f32>) {
        let profile = parse_job_description("Required: Python, AWS. Preferred: Docker.");
        let fragments = vec![
            ResumeFragment::new("skills", "Python, Git"),
            ResumeFragment::new("experience:0", "Built services on AWS without containers"),
        ];
        (match_keywords(&profile, &fragments), profile.weights)
    }

    #[test]
    fn test_weighted_overall_score() {
        let (results, weights) = scenario();
        let score = aggregate_score(&results, &weights);
        // (1.0 + 1.0 + 0) / 2.5
        assert_eq!(score.overall, 80);
    }

    #[test]
    fn test_section_coverage() {
        let (results, weights) = scenario();
        let score = aggregate_score(&results, &weights);

        assert_eq!(score.by_section.len(), 2);
        assert_eq!(score.by_section["skills"], SectionCoverage::new(1, 3));
        assert_eq!(score.by_section["skills"].percentage, 33);
        assert_eq!(score.by_section["experience:0"].covered, 1);
    }

    #[test]
    fn test_partial_counts_half() {
        let profile = parse_job_description("Communication and Leadership");
        let fragments = vec![ResumeFragment::new("summary", "Communicated clearly")];
        let results = match_keywords(&profile, &fragments);

        let score = aggregate_score(&results, &profile.weights);
        // 0.5 / 2
        assert_eq!(score.overall, 25);
        assert_eq!(score.by_category[&KeywordCategory::SoftSkill], 25);
    }

    #[test]
    fn test_empty_keyword_set_is_sentinel() {
        let profile = parse_job_description("");
        let results = match_keywords(&profile, &[ResumeFragment::new("summary", "Rust")]);
        let score = aggregate_score(&results, &profile.weights);

        assert_eq!(score.overall, 0);
        assert!(score.by_section.is_empty());
        assert!(score.is_empty());
    }

    #[test]
    fn test_zero_total_percentage() {
        assert_eq!(SectionCoverage::new(0, 0).percentage, 0);
    }

    #[test]
    fn test_adding_missing_keyword_never_lowers_score() {
        let profile = parse_job_description("Required: Python, AWS. Preferred: Docker.");
        let mut fragments = vec![
            ResumeFragment::new("skills", "Python, Git"),
            ResumeFragment::new("experience:0", "Built services on AWS without containers"),
        ];
        let before = aggregate_score(&match_keywords(&profile, &fragments), &profile.weights).overall;

        fragments.push(ResumeFragment::new("projects:0", "Packaged the API with Docker"));
        let after = aggregate_score(&match_keywords(&profile, &fragments), &profile.weights).overall;

        assert!(after >= before);
        assert_eq!(after, 100);
    }

    #[test]
    fn test_coverage_for_section_groups_entries() {
        let profile = parse_job_description("Rust, Kafka, Docker");
        let fragments = vec![
            ResumeFragment::new("experience:0", "Rust services"),
            ResumeFragment::new("experience:1", "Kafka pipelines"),
            ResumeFragment::new("experiences_note", "Docker"),
        ];
        let results = match_keywords(&profile, &fragments);

        let coverage = coverage_for_section(&results, "experience");
        assert_eq!(coverage, SectionCoverage::new(2, 2));
        assert_eq!(coverage_for_section(&results, "skills"), SectionCoverage::new(0, 0));
    }
}
