//! Explicit analysis session: one job description, the latest resume index
//! and the results derived from them

use crate::error::Result;
use crate::processing::ats_matcher::{
    keywords_by_status, KeywordMatcher, MatchResult, MatchStatus, DEFAULT_MIN_ROOT_LEN,
};
use crate::processing::dictionary::{Keyword, KeywordDictionary};
use crate::processing::jd_parser::{
    JobDescriptionParser, JobDescriptionProfile, DEFAULT_PREFERRED_WEIGHT, DEFAULT_REQUIRED_WEIGHT,
};
use crate::processing::recommendations::{
    recommendations_for_location, Recommendation, RecommendationGenerator,
    DEFAULT_RECOMMENDATIONS_PER_LOCATION,
};
use crate::processing::resume_index::{index_resume, ResumeFragment};
use crate::processing::scoring::{aggregate_score, coverage_for_section, AtsScoreBreakdown, SectionCoverage};
use crate::resume::ResumeData;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Tunables for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub required_weight: f32,
    pub preferred_weight: f32,
    pub recommendations_per_location: usize,
    pub min_root_len: usize,
    /// Extra dictionary terms; empty means the built-in dictionary is used as is
    pub custom_keywords: Vec<Keyword>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            required_weight: DEFAULT_REQUIRED_WEIGHT,
            preferred_weight: DEFAULT_PREFERRED_WEIGHT,
            recommendations_per_location: DEFAULT_RECOMMENDATIONS_PER_LOCATION,
            min_root_len: DEFAULT_MIN_ROOT_LEN,
            custom_keywords: Vec::new(),
        }
    }
}

/// Everything one analysis run produces. Replaced wholesale on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    /// False means no keywords could be extracted and the score is the
    /// zero sentinel, not a real 0%
    pub has_job_description: bool,
    pub match_results: Vec<MatchResult>,
    pub score: AtsScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisResults {
    pub fn keywords_by_status(&self, status: MatchStatus) -> Vec<&MatchResult> {
        keywords_by_status(&self.match_results, status)
    }

    pub fn recommendations_for_location(&self, location: &str) -> Vec<&Recommendation> {
        recommendations_for_location(&self.recommendations, location)
    }

    pub fn coverage_for_section(&self, section: &str) -> SectionCoverage {
        coverage_for_section(&self.match_results, section)
    }
}

/// Match, score and recommend for an already-indexed resume.
pub fn analyze_fragments(
    profile: &JobDescriptionProfile,
    fragments: &[ResumeFragment],
    matcher: KeywordMatcher,
    generator: RecommendationGenerator,
) -> AnalysisResults {
    let match_results = matcher.match_keywords(profile, fragments);
    let score = aggregate_score(&match_results, &profile.weights);
    let recommendations = generator.generate(&match_results, fragments);

    AnalysisResults {
        has_job_description: profile.has_job_description(),
        match_results,
        score,
        recommendations,
    }
}

/// One-shot analysis with default tunables.
pub fn analyze(profile: &JobDescriptionProfile, resume: &ResumeData) -> AnalysisResults {
    let fragments = index_resume(resume);
    analyze_fragments(
        profile,
        &fragments,
        KeywordMatcher::default(),
        RecommendationGenerator::default(),
    )
}

/// Holds the current job description profile, the fragment index of the
/// last analyzed resume and the latest results.
#[derive(Debug)]
pub struct AnalysisSession {
    /// `None` uses the built-in dictionary
    dictionary: Option<KeywordDictionary>,
    options: AnalysisOptions,
    profile: JobDescriptionProfile,
    fragments: Vec<ResumeFragment>,
    results: Option<AnalysisResults>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    /// Session over the built-in dictionary with default tunables.
    pub fn new() -> Self {
        Self {
            dictionary: None,
            options: AnalysisOptions::default(),
            profile: JobDescriptionProfile::empty(""),
            fragments: Vec::new(),
            results: None,
        }
    }

    /// Fails only if the custom keywords cannot be compiled into a dictionary.
    pub fn with_options(options: AnalysisOptions) -> Result<Self> {
        let dictionary = if options.custom_keywords.is_empty() {
            None
        } else {
            Some(KeywordDictionary::with_custom_keywords(
                options.custom_keywords.clone(),
            )?)
        };

        Ok(Self {
            dictionary,
            options,
            ..Self::new()
        })
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        self.dictionary
            .as_ref()
            .unwrap_or_else(|| KeywordDictionary::builtin())
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Parse `raw_text` into the session profile. Any previous profile and
    /// results are discarded.
    pub fn set_job_description(&mut self, raw_text: &str) -> &JobDescriptionProfile {
        let profile = JobDescriptionParser::new(self.dictionary())
            .with_weights(self.options.required_weight, self.options.preferred_weight)
            .parse(raw_text);

        info!(
            "Job description set: {} keywords ({} required)",
            profile.keywords.len(),
            profile.required_keywords().count()
        );

        self.profile = profile;
        self.results = None;
        &self.profile
    }

    pub fn clear_job_description(&mut self) {
        self.profile = JobDescriptionProfile::empty("");
        self.results = None;
    }

    /// Re-index `resume` and recompute all results against the current profile.
    pub fn analyze(&mut self, resume: &ResumeData) -> &AnalysisResults {
        self.fragments = index_resume(resume);

        let results = analyze_fragments(
            &self.profile,
            &self.fragments,
            KeywordMatcher::new(self.options.min_root_len),
            RecommendationGenerator::new(self.options.recommendations_per_location),
        );
        debug!(
            "Analysis complete: overall {}%, {} recommendations",
            results.score.overall,
            results.recommendations.len()
        );

        self.results.insert(results)
    }

    pub fn has_job_description(&self) -> bool {
        self.profile.has_job_description()
    }

    pub fn profile(&self) -> &JobDescriptionProfile {
        &self.profile
    }

    pub fn fragments(&self) -> &[ResumeFragment] {
        &self.fragments
    }

    /// Latest results, if the current profile has been analyzed.
    pub fn results(&self) -> Option<&AnalysisResults> {
        self.results.as_ref()
    }

    pub fn keywords_by_status(&self, status: MatchStatus) -> Vec<&MatchResult> {
        self.results
            .as_ref()
            .map(|r| r.keywords_by_status(status))
            .unwrap_or_default()
    }

    pub fn recommendations_for_location(&self, location: &str) -> Vec<&Recommendation> {
        self.results
            .as_ref()
            .map(|r| r.recommendations_for_location(location))
            .unwrap_or_default()
    }

    pub fn coverage_for_section(&self, section: &str) -> SectionCoverage {
        self.results
            .as_ref()
            .map(|r| r.coverage_for_section(section))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::dictionary::KeywordCategory;
    use crate::processing::recommendations::Severity;
    use crate::resume::{Experience, SkillCategory, Skills};

    fn resume() -> ResumeData {
        ResumeData {
            skills: Skills::Categorized(vec![SkillCategory {
                category: "Languages".to_string(),
                items: vec!["Python".to_string(), "Git".to_string()],
            }]),
            experience: vec![Experience {
                title: "Engineer".to_string(),
                description: "Built services on AWS without containers".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_session_end_to_end() {
        let mut session = AnalysisSession::new();
        session.set_job_description("Required: Python, AWS. Preferred: Docker.");
        assert!(session.has_job_description());

        let results = session.analyze(&resume());
        assert!(results.has_job_description);
        assert_eq!(results.score.overall, 80);
        assert_eq!(
            results
                .recommendations
                .iter()
                .filter(|r| r.severity == Severity::Critical)
                .count(),
            1
        );

        let missing = session.keywords_by_status(MatchStatus::Missing);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].keyword.text, "Docker");
        assert_eq!(session.recommendations_for_location("skills").len(), 1);
        assert_eq!(session.coverage_for_section("experience"), SectionCoverage::new(1, 1));
    }

    #[test]
    fn test_new_job_description_clears_results() {
        let mut session = AnalysisSession::new();
        session.set_job_description("Python required");
        session.analyze(&resume());
        assert!(session.results().is_some());

        session.set_job_description("Kubernetes required");
        assert!(session.results().is_none());
        assert_eq!(session.profile().keywords[0].text, "Kubernetes");

        let results = session.analyze(&resume());
        assert_eq!(results.score.overall, 0);
    }

    #[test]
    fn test_no_job_description_sentinel() {
        let mut session = AnalysisSession::new();
        session.set_job_description("   ");
        let results = session.analyze(&resume());

        assert!(!results.has_job_description);
        assert!(results.match_results.is_empty());
        assert!(results.score.is_empty());
        assert!(results
            .recommendations
            .iter()
            .all(|r| r.severity == Severity::Info));
    }

    #[test]
    fn test_custom_keywords_and_weights() {
        let options = AnalysisOptions {
            required_weight: 2.0,
            preferred_weight: 1.0,
            custom_keywords: vec![Keyword::new("Temporal", KeywordCategory::Technology, None)],
            ..Default::default()
        };
        let mut session = AnalysisSession::with_options(options).unwrap();
        let profile = session.set_job_description("Temporal is required. Python preferred.");

        assert_eq!(profile.weights["temporal"], 2.0);
        assert_eq!(profile.weights["python"], 1.0);

        // 0 * 2.0 + 1 * 1.0 over 3.0
        assert_eq!(session.analyze(&resume()).score.overall, 33);
    }

    #[test]
    fn test_free_analyze_matches_session() {
        let profile = JobDescriptionParser::default().parse("Required: Python, AWS. Preferred: Docker.");
        let one_shot = analyze(&profile, &resume());

        let mut session = AnalysisSession::new();
        session.set_job_description("Required: Python, AWS. Preferred: Docker.");
        assert_eq!(session.analyze(&resume()), &one_shot);
    }
}
