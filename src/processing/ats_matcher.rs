//! ATS (Applicant Tracking System) keyword matching against resume fragments

use crate::processing::dictionary::Keyword;
use crate::processing::jd_parser::{JobDescriptionProfile, Requirement};
use crate::processing::resume_index::ResumeFragment;
use crate::processing::text_processor::{
    contains_whole_word, fold_case_with_offsets, is_word_char, word_prefix_positions, word_starting_at,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roots shorter than this never produce partial hits.
pub const DEFAULT_MIN_ROOT_LEN: usize = 4;

/// Suffixes stripped to find a keyword's root, longest first.
const ROOT_SUFFIXES: &[&str] = &[
    "ations", "ation", "ments", "ment", "ings", "ing", "ies", "ers", "ed", "er", "es", "s",
];

/// Longest word tail after a root that still reads as an inflection.
const MAX_INFLECTION_TAIL: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Whole-word hit in at least one fragment
    Matched,
    /// Only the root or a longer variant was found
    Partial,
    Missing,
}

impl MatchStatus {
    /// Share of the keyword's weight credited towards coverage.
    pub fn credit(self) -> f32 {
        match self {
            MatchStatus::Matched => 1.0,
            MatchStatus::Partial => 0.5,
            MatchStatus::Missing => 0.0,
        }
    }

    pub fn is_covered(self) -> bool {
        !matches!(self, MatchStatus::Missing)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "matched"),
            MatchStatus::Partial => write!(f, "partial"),
            MatchStatus::Missing => write!(f, "missing"),
        }
    }
}

/// Outcome for one job-description keyword.
///
/// `locations` is empty exactly when `status` is `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub keyword: Keyword,
    pub status: MatchStatus,
    /// Fragment locations with an exact or root hit, in fragment order
    pub locations: Vec<String>,
    pub weight: f32,
    pub requirement: Requirement,
    /// Surface forms behind root-only hits, e.g. "Managed" for "Management"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
}

impl MatchResult {
    pub fn found_at(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }
}

/// Crude stem: the normalized form with one common suffix removed from its
/// last word. Words that are not purely alphabetic, or that would shrink
/// below three letters, are kept whole.
pub fn keyword_root(normalized: &str) -> &str {
    let last_start = normalized.rfind(' ').map(|i| i + 1).unwrap_or(0);
    let last_word = &normalized[last_start..];

    if last_word.is_empty() || !last_word.chars().all(|c| c.is_ascii_alphabetic()) {
        return normalized;
    }

    ROOT_SUFFIXES
        .iter()
        .find_map(|suffix| last_word.strip_suffix(suffix).filter(|stem| stem.len() >= 3))
        .map(|stem| &normalized[..last_start + stem.len()])
        .unwrap_or(normalized)
}

/// True when `tail`, the rest of a word after `root`, is an inflection such
/// as "ed" or "ated" rather than an unrelated word ("Script" after "Java",
/// "rects" after "redi").
fn is_inflection_tail(root: &str, tail: &str) -> bool {
    if tail.is_empty() {
        return true;
    }
    if tail.chars().count() > MAX_INFLECTION_TAIL || !tail.chars().all(|c| c.is_alphabetic()) {
        return false;
    }

    // "manage" + "d" reads as "managed"
    let tail = if root.ends_with('e') {
        format!("e{}", tail)
    } else {
        tail.to_string()
    };
    ROOT_SUFFIXES.iter().any(|suffix| tail.ends_with(suffix))
}

struct FoldedFragment<'a> {
    fragment: &'a ResumeFragment,
    folded: String,
    /// folded byte offset -> original byte offset
    offsets: Vec<usize>,
}

impl<'a> FoldedFragment<'a> {
    fn new(fragment: &'a ResumeFragment) -> Self {
        let (folded, offsets) = fold_case_with_offsets(&fragment.text);
        Self {
            fragment,
            folded,
            offsets,
        }
    }

    /// Start offsets of words that begin with `root` followed by an
    /// inflection tail.
    fn root_hits(&self, root: &str) -> Vec<usize> {
        word_prefix_positions(&self.folded, root)
            .into_iter()
            .filter(|&pos| {
                let rest = &self.folded[pos + root.len()..];
                let tail_end = rest
                    .char_indices()
                    .find(|(_, c)| !is_word_char(*c))
                    .map(|(idx, _)| idx)
                    .unwrap_or(rest.len());
                is_inflection_tail(root, &rest[..tail_end])
            })
            .collect()
    }

    /// The token at folded offset `pos`, in its original spelling.
    fn surface_word(&self, pos: usize) -> String {
        word_starting_at(&self.fragment.text, self.offsets[pos]).to_string()
    }
}

/// Stateless keyword matcher; identical inputs give identical outputs.
#[derive(Debug, Clone, Copy)]
pub struct KeywordMatcher {
    min_root_len: usize,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ROOT_LEN)
    }
}

impl KeywordMatcher {
    pub fn new(min_root_len: usize) -> Self {
        Self { min_root_len }
    }

    /// One result per profile keyword, in profile order.
    pub fn match_keywords(
        &self,
        profile: &JobDescriptionProfile,
        fragments: &[ResumeFragment],
    ) -> Vec<MatchResult> {
        let folded: Vec<FoldedFragment> = fragments.iter().map(FoldedFragment::new).collect();

        let results: Vec<MatchResult> = profile
            .keywords
            .iter()
            .map(|keyword| self.match_one(keyword, profile, &folded))
            .collect();

        debug!(
            "Matched {} keywords against {} fragments",
            results.len(),
            fragments.len()
        );
        results
    }

    fn match_one(
        &self,
        keyword: &Keyword,
        profile: &JobDescriptionProfile,
        fragments: &[FoldedFragment],
    ) -> MatchResult {
        let root = keyword_root(&keyword.normalized);
        let root_allowed = root.chars().count() >= self.min_root_len;

        let mut exact = false;
        let mut locations: Vec<String> = Vec::new();
        let mut variants: Vec<String> = Vec::new();

        for entry in fragments {
            let exact_here = contains_whole_word(&entry.folded, &keyword.normalized);
            let root_hits = if root_allowed && !exact_here {
                entry.root_hits(root)
            } else {
                Vec::new()
            };

            if !exact_here && root_hits.is_empty() {
                continue;
            }

            exact |= exact_here;
            if !locations.contains(&entry.fragment.location) {
                locations.push(entry.fragment.location.clone());
            }
            for pos in root_hits {
                let variant = entry.surface_word(pos);
                if !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
        }

        let status = if exact {
            MatchStatus::Matched
        } else if !locations.is_empty() {
            MatchStatus::Partial
        } else {
            MatchStatus::Missing
        };

        MatchResult {
            keyword: keyword.clone(),
            status,
            locations,
            weight: profile.weight_of(keyword),
            requirement: profile.requirement_of(keyword),
            variants,
        }
    }
}

/// Match with the default root length.
pub fn match_keywords(profile: &JobDescriptionProfile, fragments: &[ResumeFragment]) -> Vec<MatchResult> {
    KeywordMatcher::default().match_keywords(profile, fragments)
}

pub fn keywords_by_status(results: &[MatchResult], status: MatchStatus) -> Vec<&MatchResult> {
    results.iter().filter(|r| r.status == status).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::dictionary::{KeywordCategory, KeywordDictionary};
    use crate::processing::jd_parser::{parse_job_description, JobDescriptionParser};

    fn profile_for(terms: &[&str]) -> JobDescriptionProfile {
        let dict = KeywordDictionary::from_keywords(
            terms
                .iter()
                .map(|t| Keyword::new(t, KeywordCategory::SoftSkill, None))
                .collect(),
        )
        .unwrap();
        JobDescriptionParser::new(&dict).parse(&terms.join(", "))
    }

    #[test]
    fn test_keyword_root() {
        assert_eq!(keyword_root("management"), "manage");
        assert_eq!(keyword_root("project management"), "project manage");
        assert_eq!(keyword_root("communication"), "communic");
        assert_eq!(keyword_root("node.js"), "node.js");
        assert_eq!(keyword_root("c++"), "c++");
        assert_eq!(keyword_root("python"), "python");
        assert_eq!(keyword_root("aws"), "aws");
    }

    #[test]
    fn test_end_to_end_statuses() {
        let profile = parse_job_description("Required: Python, AWS. Preferred: Docker.");
        let fragments = vec![
            ResumeFragment::new("skills", "Python, Git"),
            ResumeFragment::new("experience:0", "Built services on AWS without containers"),
        ];

        let results = match_keywords(&profile, &fragments);
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].keyword.text, "Python");
        assert_eq!(results[0].status, MatchStatus::Matched);
        assert_eq!(results[0].locations, vec!["skills"]);

        assert_eq!(results[1].keyword.text, "AWS");
        assert_eq!(results[1].status, MatchStatus::Matched);
        assert_eq!(results[1].locations, vec!["experience:0"]);

        assert_eq!(results[2].keyword.text, "Docker");
        assert_eq!(results[2].status, MatchStatus::Missing);
        assert!(results[2].locations.is_empty());
        assert_eq!(results[2].weight, 0.5);
    }

    #[test]
    fn test_partial_match_on_variant() {
        let profile = profile_for(&["Management"]);
        let fragments = vec![ResumeFragment::new("experience:0", "Managed a team of 5")];

        let results = match_keywords(&profile, &fragments);
        assert_eq!(results[0].status, MatchStatus::Partial);
        assert_eq!(results[0].locations, vec!["experience:0"]);
        assert_eq!(results[0].variants, vec!["Managed"]);
    }

    #[test]
    fn test_unrelated_longer_words_are_not_variants() {
        let profile = parse_job_description("Java and Redis required");
        let fragments = vec![ResumeFragment::new("experience:0", "JavaScript, redirects")];

        let results = match_keywords(&profile, &fragments);
        assert!(results.iter().all(|r| r.status == MatchStatus::Missing));
        assert!(results.iter().all(|r| r.variants.is_empty()));
    }

    #[test]
    fn test_inflection_tails() {
        assert!(is_inflection_tail("manage", "d"));
        assert!(is_inflection_tail("communic", "ated"));
        assert!(is_inflection_tail("manage", ""));
        assert!(!is_inflection_tail("java", "script"));
        assert!(!is_inflection_tail("redi", "rects"));
        assert!(!is_inflection_tail("kube", "123"));
    }

    #[test]
    fn test_variant_keeps_non_ascii_spelling() {
        let profile = profile_for(&["\u{00DC}berweisung"]);
        let fragments = vec![ResumeFragment::new("summary", "Gro\u{00DF}e \u{00DC}berweisungs team")];

        let results = match_keywords(&profile, &fragments);
        assert_eq!(results[0].status, MatchStatus::Partial);
        assert_eq!(results[0].variants, vec!["\u{00DC}berweisungs"]);
    }

    #[test]
    fn test_locations_deduplicated_in_fragment_order() {
        let profile = parse_job_description("Rust");
        let fragments = vec![
            ResumeFragment::new("projects:0", "Rust CLI in Rust"),
            ResumeFragment::new("skills", "Go"),
            ResumeFragment::new("experience:1", "rust services"),
        ];

        let results = match_keywords(&profile, &fragments);
        assert_eq!(results[0].locations, vec!["projects:0", "experience:1"]);
    }

    #[test]
    fn test_short_roots_never_partial() {
        let profile = parse_job_description("AWS and Go");
        let fragments = vec![ResumeFragment::new("summary", "awsome gopher")];

        let results = match_keywords(&profile, &fragments);
        assert!(results.iter().all(|r| r.status == MatchStatus::Missing));
    }

    #[test]
    fn test_matching_is_idempotent() {
        let profile = parse_job_description("Leadership, Kubernetes and Communication required");
        let fragments = vec![
            ResumeFragment::new("summary", "Communicated across teams"),
            ResumeFragment::new("skills", "Kubernetes"),
        ];

        let first = match_keywords(&profile, &fragments);
        let second = match_keywords(&profile, &fragments);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_every_keyword_has_one_result() {
        let profile = parse_job_description("Python, Rust, Go, Kafka");
        let results = match_keywords(&profile, &[]);
        assert_eq!(results.len(), profile.keywords.len());
        for result in &results {
            assert_eq!(result.locations.is_empty(), result.status == MatchStatus::Missing);
        }
        assert_eq!(keywords_by_status(&results, MatchStatus::Missing).len(), 4);
    }
}
