//! ATS keyword matching and scoring for structured resumes

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod resume;

pub use config::Config;
pub use error::{AtsError, Result};
pub use processing::ats_matcher::{match_keywords, MatchResult, MatchStatus};
pub use processing::dictionary::{extract_keywords, Keyword, KeywordCategory, KeywordDictionary};
pub use processing::jd_parser::{parse_job_description, JobDescriptionProfile, Requirement};
pub use processing::recommendations::{generate_recommendations, Recommendation, Severity};
pub use processing::resume_index::{index_resume, ResumeFragment};
pub use processing::scoring::{aggregate_score, AtsScoreBreakdown};
pub use processing::session::{analyze, AnalysisOptions, AnalysisResults, AnalysisSession};
pub use resume::ResumeData;
