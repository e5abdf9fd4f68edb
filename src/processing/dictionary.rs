//! Curated ATS keyword dictionary and whole-word keyword extraction

use crate::error::Result;
use crate::processing::text_processor::{fold_case, fold_case_with_offsets, is_whole_word_at};
use aho_corasick::AhoCorasick;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Broad family a keyword belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Technology,
    Industry,
    SoftSkill,
}

/// Finer grouping for technology terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechArea {
    Language,
    Frontend,
    Backend,
    Cloud,
    DevOps,
    Database,
    DataScience,
    Architecture,
    Mobile,
    Testing,
    Process,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    /// Canonical spelling from the dictionary
    pub text: String,
    pub category: KeywordCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_area: Option<TechArea>,
    /// Case-folded form; the identity of a keyword
    pub normalized: String,
}

impl Keyword {
    pub fn new(text: &str, category: KeywordCategory, tech_area: Option<TechArea>) -> Self {
        Self {
            text: text.trim().to_string(),
            category,
            tech_area,
            normalized: fold_case(text.trim()),
        }
    }

    pub fn is_technology(&self) -> bool {
        matches!(self.category, KeywordCategory::Technology)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordCategory::Technology => write!(f, "Technology"),
            KeywordCategory::Industry => write!(f, "Industry"),
            KeywordCategory::SoftSkill => write!(f, "Soft skill"),
        }
    }
}

/// A single accepted dictionary hit inside a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOccurrence {
    /// Index into [`KeywordDictionary::keywords`]
    pub keyword: usize,
    pub start: usize,
    pub end: usize,
}

const TECH_TERMS: &[(TechArea, &[&str])] = &[
    (TechArea::Language, &[
        "Python", "JavaScript", "TypeScript", "Java", "C++", "C#", "Ruby", "Go", "Rust", "Swift",
        "Kotlin", "PHP", "SQL", "R", "Scala", "Cobol", "Fortran", "Dart", "Assembly", "MATLAB",
        "Shell", "Bash", "PowerShell",
    ]),
    (TechArea::Frontend, &[
        "React", "Angular", "Vue", "Next.js", "Nuxt.js", "Svelte", "SolidJS", "Remix", "Tailwind",
        "Sass", "Less", "Redux", "Zustand", "Framer Motion", "Web Components", "HTML5", "CSS3",
        "Bootstrap", "Material UI", "Shadcn",
    ]),
    (TechArea::Backend, &[
        "Node.js", "Express", "Deno", "Bun", "Django", "Flask", "FastAPI", "Spring Boot", "Rails",
        "Laravel", "ASP.NET", "NestJS", "Koa", "Hapi", "Phoenix", "Gorilla Mux", "Fiber",
    ]),
    (TechArea::Cloud, &[
        "AWS", "Azure", "GCP", "Google Cloud", "DigitalOcean", "Heroku", "Netlify", "Vercel",
        "CloudFront", "Lambda", "S3", "EC2", "RDS", "Redshift", "CloudFormation", "Route53", "IAM",
    ]),
    (TechArea::DevOps, &[
        "Docker", "Kubernetes", "Terraform", "Ansible", "Pulumi", "Jenkins", "Git",
        "GitHub Actions", "GitLab CI", "CircleCI", "CI/CD", "DevOps", "SRE", "Helm", "ArgoCD",
        "Prometheus", "Grafana", "ELK Stack", "DataDog", "New Relic", "Datadog",
    ]),
    (TechArea::Database, &[
        "PostgreSQL", "MySQL", "MariaDB", "MongoDB", "Redis", "Cassandra", "Elasticsearch",
        "Kafka", "RabbitMQ", "Supabase", "Firebase", "Prisma", "Drizzle", "DynamoDB",
        "Snowflake", "BigQuery", "Oracle", "SQLite",
    ]),
    (TechArea::DataScience, &[
        "TensorFlow", "PyTorch", "Scikit-learn", "Pandas", "NumPy", "SciPy", "Matplotlib",
        "Seaborn", "OpenCV", "HuggingFace", "Transformers", "LLM", "LangChain", "OpenAI",
        "Computer Vision", "NLP", "Neural Networks", "Deep Learning", "Machine Learning",
        "Data Engineering",
    ]),
    (TechArea::Architecture, &[
        "REST", "GraphQL", "gRPC", "SOAP", "API", "Microservices", "Serverless", "WebSockets",
        "TRPC", "Event-driven", "SOA", "DDD", "TDD", "BDD", "Monolith",
    ]),
    (TechArea::Mobile, &[
        "iOS", "Android", "Flutter", "React Native", "Ionic", "Capacitor", "SwiftUI",
        "Jetpack Compose",
    ]),
    (TechArea::Testing, &[
        "Jest", "Cypress", "Playwright", "Vitest", "Testing Library", "Mocha", "Chai", "Selenium",
        "Postman",
    ]),
    (TechArea::Process, &[
        "Agile", "Scrum", "Kanban", "Jira", "Confluence", "Lean", "Six Sigma",
        "Product Management", "Project Management", "SDLC", "Waterfall",
    ]),
];

const INDUSTRY_TERMS: &[&str] = &[
    "Fintech", "Healthcare", "E-commerce", "SaaS", "Edtech", "Adtech", "Cybersecurity",
    "Logistics", "Real Estate", "Gaming", "Web3", "Blockchain", "Crypto", "Biotech",
    "Automotive", "Renewable Energy",
];

const SOFT_SKILL_TERMS: &[&str] = &[
    "Leadership", "Teamwork", "Communication", "Problem Solving", "Critical Thinking",
    "Adaptability", "Time Management", "Conflict Resolution", "Mentorship", "Creativity",
    "Empathy", "Public Speaking",
];

static BUILTIN: Lazy<KeywordDictionary> = Lazy::new(|| {
    KeywordDictionary::from_keywords(KeywordDictionary::builtin_keywords())
        .expect("Invalid built-in keyword dictionary")
});

/// Immutable keyword list plus a combined matcher over every entry.
///
/// One Aho-Corasick automaton over the case-folded entries covers the whole
/// list and runs over the case-folded text. Overlapping search reports every
/// entry at every position, so each entry is checked independently; a hit
/// only counts when it occupies whole tokens.
#[derive(Debug)]
pub struct KeywordDictionary {
    keywords: Vec<Keyword>,
    matcher: AhoCorasick,
}

impl KeywordDictionary {
    /// The process-wide built-in dictionary.
    pub fn builtin() -> &'static KeywordDictionary {
        &BUILTIN
    }

    /// Built-in dictionary extended with additional terms.
    pub fn with_custom_keywords(additional: Vec<Keyword>) -> Result<Self> {
        let mut keywords = Self::builtin_keywords();
        keywords.extend(additional);
        Self::from_keywords(keywords)
    }

    /// Build a dictionary from an arbitrary list. Entries are de-duplicated by
    /// normalized form, keeping the first spelling.
    pub fn from_keywords(keywords: Vec<Keyword>) -> Result<Self> {
        let mut seen = HashSet::new();
        let keywords: Vec<Keyword> = keywords
            .into_iter()
            .filter(|k| !k.normalized.is_empty())
            .filter(|k| seen.insert(k.normalized.clone()))
            .collect();

        let patterns: Vec<&str> = keywords.iter().map(|k| k.normalized.as_str()).collect();
        let matcher = AhoCorasick::new(&patterns)?;

        debug!("Keyword dictionary built with {} entries", keywords.len());

        Ok(Self { keywords, matcher })
    }

    fn builtin_keywords() -> Vec<Keyword> {
        let mut keywords = Vec::new();

        for (area, terms) in TECH_TERMS {
            keywords.extend(
                terms
                    .iter()
                    .map(|t| Keyword::new(t, KeywordCategory::Technology, Some(*area))),
            );
        }
        keywords.extend(
            INDUSTRY_TERMS
                .iter()
                .map(|t| Keyword::new(t, KeywordCategory::Industry, None)),
        );
        keywords.extend(
            SOFT_SKILL_TERMS
                .iter()
                .map(|t| Keyword::new(t, KeywordCategory::SoftSkill, None)),
        );

        keywords
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Keyword> {
        self.keywords.get(index)
    }

    pub fn lookup(&self, term: &str) -> Option<&Keyword> {
        let normalized = fold_case(term.trim());
        self.keywords.iter().find(|k| k.normalized == normalized)
    }

    /// Every whole-word dictionary hit in `text`, ordered by position.
    /// Offsets are byte offsets into `text` itself, not its folded form.
    pub fn find_occurrences(&self, text: &str) -> Vec<KeywordOccurrence> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let (folded, offsets) = fold_case_with_offsets(text);
        let mut occurrences: Vec<KeywordOccurrence> = self
            .matcher
            .find_overlapping_iter(&folded)
            .filter(|m| is_whole_word_at(&folded, m.start(), m.end()))
            .map(|m| KeywordOccurrence {
                keyword: m.pattern().as_usize(),
                start: offsets[m.start()],
                end: offsets[m.end()],
            })
            .filter(|o| o.end > o.start)
            .collect();

        occurrences.sort_by_key(|o| (o.start, o.keyword));
        occurrences
    }

    /// Distinct keywords present in `text`, in order of first appearance.
    pub fn extract_keywords(&self, text: &str) -> Vec<Keyword> {
        let mut seen = HashSet::new();
        self.find_occurrences(text)
            .into_iter()
            .filter(|o| seen.insert(o.keyword))
            .map(|o| self.keywords[o.keyword].clone())
            .collect()
    }
}

/// Extract keywords with the built-in dictionary.
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    KeywordDictionary::builtin().extract_keywords(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(keywords: &[Keyword]) -> Vec<&str> {
        keywords.iter().map(|k| k.text.as_str()).collect()
    }

    #[test]
    fn test_case_variants_count_once() {
        let keywords = extract_keywords("Docker and DOCKER and docker");
        assert_eq!(texts(&keywords), vec!["Docker"]);
    }

    #[test]
    fn test_whole_word_boundaries() {
        let keywords = extract_keywords("JavaScript is great, unlike Java");
        assert_eq!(texts(&keywords), vec!["JavaScript", "Java"]);
    }

    #[test]
    fn test_special_characters_are_literal() {
        let keywords = extract_keywords("Strong C++ and Node.js skills, some C# too.");
        let found = texts(&keywords);
        assert!(found.contains(&"C++"));
        assert!(found.contains(&"Node.js"));
        assert!(found.contains(&"C#"));

        assert!(extract_keywords("Nodexjs").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n").is_empty());
    }

    #[test]
    fn test_builtin_dedupes_spelling_variants() {
        let dict = KeywordDictionary::builtin();
        let datadog = dict
            .keywords()
            .iter()
            .filter(|k| k.normalized == "datadog")
            .count();
        assert_eq!(datadog, 1);
        assert_eq!(dict.lookup("datadog").map(|k| k.text.as_str()), Some("DataDog"));
    }

    #[test]
    fn test_categories() {
        let keywords = extract_keywords("Fintech leadership with Kubernetes");
        let kube = keywords.iter().find(|k| k.text == "Kubernetes").unwrap();
        assert_eq!(kube.category, KeywordCategory::Technology);
        assert_eq!(kube.tech_area, Some(TechArea::DevOps));

        let fintech = keywords.iter().find(|k| k.text == "Fintech").unwrap();
        assert_eq!(fintech.category, KeywordCategory::Industry);

        let leadership = keywords.iter().find(|k| k.text == "Leadership").unwrap();
        assert_eq!(leadership.category, KeywordCategory::SoftSkill);
    }

    #[test]
    fn test_custom_keywords() {
        let dict = KeywordDictionary::with_custom_keywords(vec![Keyword::new(
            "Actix",
            KeywordCategory::Technology,
            Some(TechArea::Backend),
        )])
        .unwrap();

        assert_eq!(dict.len(), KeywordDictionary::builtin().len() + 1);
        assert_eq!(texts(&dict.extract_keywords("Services in Actix")), vec!["Actix"]);
    }

    #[test]
    fn test_non_ascii_custom_keyword_ignores_case() {
        let dict = KeywordDictionary::with_custom_keywords(vec![Keyword::new(
            "\u{00DC}berweisung",
            KeywordCategory::Industry,
            None,
        )])
        .unwrap();

        for text in ["erfahrung mit \u{00FC}berweisung", "Erfahrung mit \u{00DC}berweisung", "\u{00DC}BERWEISUNG"] {
            assert_eq!(texts(&dict.extract_keywords(text)), vec!["\u{00DC}berweisung"], "{}", text);
        }

        let text = "Erfahrung mit \u{00DC}berweisung";
        let occurrences = dict.find_occurrences(text);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(&text[occurrences[0].start..occurrences[0].end], "\u{00DC}berweisung");
    }

    #[test]
    fn test_overlapping_entries_checked_independently() {
        let keywords = extract_keywords("Shipped apps with React Native");
        let found = texts(&keywords);
        assert!(found.contains(&"React"));
        assert!(found.contains(&"React Native"));
    }
}
