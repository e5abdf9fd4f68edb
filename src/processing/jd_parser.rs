//! Job description parsing: keyword extraction plus required/preferred weighting

use crate::processing::dictionary::{Keyword, KeywordDictionary, KeywordOccurrence};
use crate::processing::text_processor::normalize_unicode;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_REQUIRED_WEIGHT: f32 = 1.0;
pub const DEFAULT_PREFERRED_WEIGHT: f32 = 0.5;

static REQUIRED_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:required|requirements?|must[- ]haves?|must|mandatory|essential|minimum qualifications)\b")
        .expect("Invalid required cue regex")
});

static PREFERRED_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:preferred|nice[- ]to[- ]haves?|bonus|desirable|desired|ideally|a plus|advantageous)\b")
        .expect("Invalid preferred cue regex")
});

static CLAUSE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?;](?:\s|$)").expect("Invalid clause break regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    Preferred,
}

/// Keywords of one job description with their scoring weights.
///
/// Built once per job description text and never mutated; a new text
/// produces a new profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptionProfile {
    pub raw_text: String,
    /// Unique by normalized form, ordered by first appearance
    pub keywords: Vec<Keyword>,
    /// normalized form -> weight
    pub weights: BTreeMap<String, f32>,
    /// normalized form -> requirement level
    pub requirements: BTreeMap<String, Requirement>,
    /// normalized form -> number of whole-word mentions in the text
    #[serde(default)]
    pub frequencies: BTreeMap<String, usize>,
}

impl JobDescriptionProfile {
    /// Profile of "no job description supplied".
    pub fn empty(raw_text: &str) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            keywords: Vec::new(),
            weights: BTreeMap::new(),
            requirements: BTreeMap::new(),
            frequencies: BTreeMap::new(),
        }
    }

    /// False when analysis should be treated as disabled rather than scored.
    pub fn has_job_description(&self) -> bool {
        !self.keywords.is_empty()
    }

    pub fn weight_of(&self, keyword: &Keyword) -> f32 {
        self.weights
            .get(&keyword.normalized)
            .copied()
            .unwrap_or(DEFAULT_REQUIRED_WEIGHT)
    }

    pub fn requirement_of(&self, keyword: &Keyword) -> Requirement {
        self.requirements
            .get(&keyword.normalized)
            .copied()
            .unwrap_or(Requirement::Required)
    }

    /// Mentions of `keyword` in the job description; 0 when absent.
    pub fn frequency_of(&self, keyword: &Keyword) -> usize {
        self.frequencies.get(&keyword.normalized).copied().unwrap_or(0)
    }

    pub fn required_keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords
            .iter()
            .filter(|k| self.requirement_of(k) == Requirement::Required)
    }

    pub fn preferred_keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords
            .iter()
            .filter(|k| self.requirement_of(k) == Requirement::Preferred)
    }
}

#[derive(Debug, Clone, Copy)]
struct Cue {
    requirement: Requirement,
    start: usize,
    end: usize,
}

impl Cue {
    fn distance_to(&self, occurrence: &KeywordOccurrence) -> usize {
        if self.end <= occurrence.start {
            occurrence.start - self.end
        } else if occurrence.end <= self.start {
            self.start - occurrence.end
        } else {
            0
        }
    }
}

/// A stretch of text that cues can influence.
#[derive(Debug)]
struct Clause {
    start: usize,
    end: usize,
    cues: Vec<Cue>,
    /// Cue carried over from earlier in the sentence, else the heading block's
    inherited: Option<Requirement>,
}

pub struct JobDescriptionParser<'d> {
    dictionary: &'d KeywordDictionary,
    required_weight: f32,
    preferred_weight: f32,
}

impl Default for JobDescriptionParser<'static> {
    fn default() -> Self {
        Self::new(KeywordDictionary::builtin())
    }
}

impl<'d> JobDescriptionParser<'d> {
    pub fn new(dictionary: &'d KeywordDictionary) -> Self {
        Self {
            dictionary,
            required_weight: DEFAULT_REQUIRED_WEIGHT,
            preferred_weight: DEFAULT_PREFERRED_WEIGHT,
        }
    }

    pub fn with_weights(mut self, required: f32, preferred: f32) -> Self {
        self.required_weight = required.max(0.0);
        self.preferred_weight = preferred.max(0.0);
        self
    }

    pub fn parse(&self, raw_text: &str) -> JobDescriptionProfile {
        if raw_text.trim().is_empty() {
            debug!("Empty job description, analysis disabled");
            return JobDescriptionProfile::empty(raw_text);
        }

        let text = normalize_unicode(raw_text);
        let occurrences = self.dictionary.find_occurrences(&text);
        let clauses = split_clauses(&text);

        // keyword index -> (seen required cue, seen preferred cue)
        let mut cue_flags: HashMap<usize, (bool, bool)> = HashMap::new();
        let mut counts: HashMap<usize, usize> = HashMap::new();
        let mut order: Vec<usize> = Vec::new();

        for occurrence in &occurrences {
            *counts.entry(occurrence.keyword).or_insert(0) += 1;
            let flags = cue_flags.entry(occurrence.keyword).or_insert_with(|| {
                order.push(occurrence.keyword);
                (false, false)
            });

            match requirement_for(occurrence, &clauses) {
                Some(Requirement::Required) => flags.0 = true,
                Some(Requirement::Preferred) => flags.1 = true,
                None => {}
            }
        }

        let mut profile = JobDescriptionProfile::empty(raw_text);
        for index in order {
            let Some(keyword) = self.dictionary.get(index) else {
                continue;
            };
            let (required, preferred) = cue_flags.get(&index).copied().unwrap_or_default();
            let (requirement, weight) = if preferred && !required {
                (Requirement::Preferred, self.preferred_weight)
            } else {
                (Requirement::Required, self.required_weight)
            };

            profile.weights.insert(keyword.normalized.clone(), weight);
            profile.requirements.insert(keyword.normalized.clone(), requirement);
            profile
                .frequencies
                .insert(keyword.normalized.clone(), counts.get(&index).copied().unwrap_or(1));
            profile.keywords.push(keyword.clone());
        }

        debug!(
            "Parsed job description: {} keywords ({} preferred)",
            profile.keywords.len(),
            profile.preferred_keywords().count()
        );

        profile
    }
}

/// Parse with the built-in dictionary and default weights.
pub fn parse_job_description(raw_text: &str) -> JobDescriptionProfile {
    JobDescriptionParser::default().parse(raw_text)
}

fn requirement_for(occurrence: &KeywordOccurrence, clauses: &[Clause]) -> Option<Requirement> {
    let clause = clauses
        .iter()
        .find(|c| occurrence.start >= c.start && occurrence.start < c.end)?;

    clause
        .cues
        .iter()
        .min_by_key(|cue| (cue.distance_to(occurrence), cue.start))
        .map(|cue| cue.requirement)
        .or(clause.inherited)
}

fn find_cues(text: &str, offset: usize) -> Vec<Cue> {
    let required = REQUIRED_CUE.find_iter(text).map(|m| Cue {
        requirement: Requirement::Required,
        start: offset + m.start(),
        end: offset + m.end(),
    });
    let preferred = PREFERRED_CUE.find_iter(text).map(|m| Cue {
        requirement: Requirement::Preferred,
        start: offset + m.start(),
        end: offset + m.end(),
    });

    let mut cues: Vec<Cue> = required.chain(preferred).collect();
    cues.sort_by_key(|c| c.start);
    cues
}

/// Split into clauses at line ends, sentence punctuation and commas, tracking
/// heading blocks such as "Nice to have:" that govern the lines below them.
///
/// A comma-separated segment without a cue of its own carries the last cue
/// seen earlier in the same sentence, so "Required: Python, AWS" weights both.
fn split_clauses(text: &str) -> Vec<Clause> {
    let mut clauses = Vec::new();
    let mut block: Option<Requirement> = None;
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let offset = line_start;
        line_start += line.len();

        let content = line.trim_end();
        if content.trim().is_empty() {
            block = None;
            continue;
        }

        for (start, end) in sentence_spans(content) {
            let mut carried: Option<Requirement> = None;
            let mut segment_start = start;

            for segment_end in content[start..end]
                .match_indices(',')
                .map(|(idx, _)| start + idx)
                .chain(std::iter::once(end))
            {
                let cues = find_cues(&content[segment_start..segment_end], offset + segment_start);
                let last_cue = cues.last().map(|c| c.requirement);

                clauses.push(Clause {
                    start: offset + segment_start,
                    end: offset + segment_end,
                    cues,
                    inherited: carried.or(block),
                });

                carried = last_cue.or(carried);
                segment_start = segment_end;
            }
        }

        if content.ends_with(':') {
            block = find_cues(content, offset).last().map(|c| c.requirement);
        }
    }

    clauses
}

fn sentence_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;

    for brk in CLAUSE_BREAK.find_iter(line) {
        spans.push((start, brk.start() + 1));
        start = brk.end();
    }
    if start < line.len() {
        spans.push((start, line.len()));
    }

    spans
}
