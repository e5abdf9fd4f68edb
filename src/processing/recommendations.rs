//! Prioritized, location-tagged suggestions derived from match results

use crate::processing::ats_matcher::{MatchResult, MatchStatus};
use crate::processing::dictionary::KeywordCategory;
use crate::processing::jd_parser::Requirement;
use crate::processing::resume_index::{ResumeFragment, SectionType};
use crate::processing::text_processor::contains_digit;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_RECOMMENDATIONS_PER_LOCATION: usize = 5;

/// Summaries shorter than this are flagged.
pub const MIN_SUMMARY_CHARS: usize = 50;

/// Sections every resume is expected to fill, with the prompt shown when empty.
const EXPECTED_SECTIONS: &[(SectionType, &str)] = &[
    (SectionType::Summary, "Add a professional summary section"),
    (SectionType::Experience, "Add your work experience"),
    (SectionType::Skills, "Add a dedicated skills section"),
    (SectionType::Education, "Add relevant degrees or certifications"),
];

const ACTION_VERBS: &[&str] = &[
    "led", "managed", "developed", "created", "designed", "implemented", "built", "architected",
    "engineered", "orchestrated", "spearheaded", "launched", "delivered", "achieved", "increased",
    "reduced", "improved", "optimized", "streamlined", "automated", "collaborated", "mentored",
    "trained",
];

/// Ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Stable across runs for the same inputs, e.g. `missing:docker`
    pub id: String,
    pub location: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<KeywordCategory>,
}

fn slug(normalized: &str) -> String {
    normalized.split_whitespace().collect::<Vec<_>>().join("-")
}

fn section_label(location: &str) -> String {
    SectionType::of_location(location)
        .map(|s| s.to_string().to_lowercase())
        .unwrap_or_else(|| location.to_string())
}

fn has_action_verb(text: &str) -> bool {
    text.unicode_words()
        .any(|word| ACTION_VERBS.contains(&word.to_lowercase().as_str()))
}

/// Stateless generator. Every call starts from nothing, so repeated runs
/// never accumulate suggestions.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationGenerator {
    per_location_cap: usize,
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMMENDATIONS_PER_LOCATION)
    }
}

impl RecommendationGenerator {
    /// A cap of 0 disables capping.
    pub fn new(per_location_cap: usize) -> Self {
        Self { per_location_cap }
    }

    pub fn generate(&self, results: &[MatchResult], fragments: &[ResumeFragment]) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        let missing = results.iter().filter(|r| r.status == MatchStatus::Missing);
        let (required, preferred): (Vec<&MatchResult>, Vec<&MatchResult>) =
            missing.partition(|r| r.requirement == Requirement::Required);
        for result in required.into_iter().chain(preferred) {
            recommendations.push(missing_keyword(result));
        }

        for result in results.iter().filter(|r| r.status == MatchStatus::Partial) {
            recommendations.push(partial_keyword(result));
        }

        for fragment in fragments {
            recommendations.extend(structural_checks(fragment));
        }
        recommendations.extend(missing_sections(fragments));

        // stable: keeps required-before-preferred and fragment order
        recommendations.sort_by_key(|r| r.severity);
        let recommendations = self.cap_per_location(recommendations);

        debug!(
            "Generated {} recommendations from {} match results",
            recommendations.len(),
            results.len()
        );
        recommendations
    }

    fn cap_per_location(&self, recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        if self.per_location_cap == 0 {
            return recommendations;
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        recommendations
            .into_iter()
            .filter(|r| {
                let count = seen.entry(r.location.clone()).or_insert(0);
                *count += 1;
                *count <= self.per_location_cap
            })
            .collect()
    }
}

fn missing_keyword(result: &MatchResult) -> Recommendation {
    let keyword = &result.keyword;
    let location = if keyword.is_technology() {
        SectionType::Skills.key()
    } else {
        SectionType::Summary.key()
    };
    let message = match result.requirement {
        Requirement::Required => format!(
            "Add \"{}\" to your {}; the job description requires it",
            keyword.text, location
        ),
        Requirement::Preferred => format!(
            "Add \"{}\" to your {}; the job description lists it as preferred",
            keyword.text, location
        ),
    };

    Recommendation {
        id: format!("missing:{}", slug(&keyword.normalized)),
        location: location.to_string(),
        severity: Severity::Critical,
        message,
        keyword: Some(keyword.text.clone()),
        category: Some(keyword.category),
    }
}

fn partial_keyword(result: &MatchResult) -> Recommendation {
    let keyword = &result.keyword;
    let location = result
        .locations
        .first()
        .cloned()
        .unwrap_or_else(|| SectionType::Summary.key().to_string());
    let message = match result.variants.first() {
        Some(variant) => format!(
            "Use the exact term \"{}\" instead of \"{}\" in your {}",
            keyword.text,
            variant,
            section_label(&location)
        ),
        None => format!(
            "Use the exact term \"{}\" in your {}",
            keyword.text,
            section_label(&location)
        ),
    };

    Recommendation {
        id: format!("partial:{}", slug(&keyword.normalized)),
        location,
        severity: Severity::Warning,
        message,
        keyword: Some(keyword.text.clone()),
        category: Some(keyword.category),
    }
}

fn structural_checks(fragment: &ResumeFragment) -> Vec<Recommendation> {
    let mut found = Vec::new();
    let info = |kind: &str, message: &str| Recommendation {
        id: format!("{}:{}", kind, fragment.location),
        location: fragment.location.clone(),
        severity: Severity::Info,
        message: message.to_string(),
        keyword: None,
        category: None,
    };

    match fragment.section() {
        Some(SectionType::Summary) => {
            let length = fragment.text.trim().chars().count();
            if length > 0 && length < MIN_SUMMARY_CHARS {
                found.push(info(
                    "summary-length",
                    "Expand your summary to at least 50 characters",
                ));
            }
        }
        Some(section) if section.is_work_section() => {
            if !contains_digit(&fragment.text) {
                found.push(info(
                    "metric",
                    "Quantify this entry with a concrete number or percentage",
                ));
            }
            if section == SectionType::Experience
                && !fragment.text.trim().is_empty()
                && !has_action_verb(&fragment.text)
            {
                found.push(info(
                    "action-verb",
                    "Open with a strong action verb such as Led, Built or Delivered",
                ));
            }
        }
        _ => {}
    }

    found
}

/// Sections with no text in any fragment. An empty index means no resume
/// was supplied, so nothing is reported for it.
fn missing_sections(fragments: &[ResumeFragment]) -> Vec<Recommendation> {
    if fragments.is_empty() {
        return Vec::new();
    }

    EXPECTED_SECTIONS
        .iter()
        .filter(|(section, _)| {
            !fragments
                .iter()
                .any(|f| f.section() == Some(*section) && !f.text.trim().is_empty())
        })
        .map(|(section, message)| Recommendation {
            id: format!("empty-section:{}", section.key()),
            location: section.key().to_string(),
            severity: Severity::Info,
            message: message.to_string(),
            keyword: None,
            category: None,
        })
        .collect()
}

/// Recommendations with the default per-location cap.
pub fn generate_recommendations(results: &[MatchResult], fragments: &[ResumeFragment]) -> Vec<Recommendation> {
    RecommendationGenerator::default().generate(results, fragments)
}

pub fn recommendations_for_location<'a>(
    recommendations: &'a [Recommendation],
    location: &str,
) -> Vec<&'a Recommendation> {
    recommendations.iter().filter(|r| r.location == location).collect()
}
