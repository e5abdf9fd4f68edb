//! Integration tests for the ATS analyzer

use resume_ats::config::{Config, CustomKeywordConfig, OutputFormat};
use resume_ats::error::AtsError;
use resume_ats::input::InputManager;
use resume_ats::output::formatter::ReportGenerator;
use resume_ats::output::AtsReport;
use resume_ats::processing::recommendations::Severity;
use resume_ats::{AnalysisSession, KeywordCategory, MatchStatus, Requirement};
use std::path::Path;

const JOB_TXT: &str = "tests/fixtures/sample_job.txt";
const JOB_MD: &str = "tests/fixtures/sample_job.md";
const RESUME_JSON: &str = "tests/fixtures/sample_resume.json";

fn names(results: &[&resume_ats::MatchResult]) -> Vec<String> {
    results.iter().map(|r| r.keyword.text.clone()).collect()
}

#[tokio::test]
async fn test_job_description_from_txt() {
    let manager = InputManager::new();
    let text = manager.load_job_description(Path::new(JOB_TXT)).await.unwrap();

    assert!(text.contains("Requirements:"));
    assert!(text.contains("Kubernetes"));
}

#[tokio::test]
async fn test_job_description_from_markdown() {
    let manager = InputManager::new();
    let text = manager.load_job_description(Path::new(JOB_MD)).await.unwrap();

    assert!(text.contains("Requirements:"));
    assert!(text.contains("Nice to have:"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let manager = InputManager::new();
    let result = manager
        .load_job_description(Path::new("tests/fixtures/unsupported.xyz"))
        .await;

    assert!(matches!(result, Err(AtsError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let manager = InputManager::new();
    let result = manager
        .load_job_description(Path::new("tests/fixtures/nonexistent.txt"))
        .await;

    assert!(matches!(result, Err(AtsError::InvalidInput(_))));
}

#[tokio::test]
async fn test_resume_from_json() {
    let manager = InputManager::new();
    let resume = manager.load_resume(Path::new(RESUME_JSON)).await.unwrap();

    assert_eq!(resume.personal.name, "Jordan Lee");
    assert_eq!(resume.experience.len(), 2);
    assert_eq!(resume.skills.items().len(), 6);
    assert_eq!(resume.education[0].school_name(), "TU Berlin");

    let not_json = manager.load_resume(Path::new(JOB_TXT)).await;
    assert!(matches!(not_json, Err(AtsError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_end_to_end_analysis() {
    let manager = InputManager::new();
    let job = manager.load_job_description(Path::new(JOB_TXT)).await.unwrap();
    let resume = manager.load_resume(Path::new(RESUME_JSON)).await.unwrap();

    let mut session = AnalysisSession::new();
    let profile = session.set_job_description(&job);
    let required: Vec<&str> = profile.required_keywords().map(|k| k.text.as_str()).collect();
    let preferred: Vec<&str> = profile.preferred_keywords().map(|k| k.text.as_str()).collect();
    assert_eq!(required, vec!["Python", "PostgreSQL", "AWS", "Kubernetes", "Communication"]);
    assert_eq!(preferred, vec!["Docker", "Terraform", "Kafka"]);

    let results = session.analyze(&resume);
    // 4 required matches out of 5 * 1.0 + 3 * 0.5
    assert_eq!(results.score.overall, 62);
    assert_eq!(
        names(&results.keywords_by_status(MatchStatus::Missing)),
        vec!["Communication", "Docker", "Terraform", "Kafka"]
    );

    let python = &results.match_results[0];
    assert_eq!(python.locations, vec!["summary", "experience:0", "skills", "projects:0"]);

    let critical: Vec<_> = results
        .recommendations
        .iter()
        .filter(|r| r.severity == Severity::Critical)
        .collect();
    assert_eq!(critical.len(), 4);
    assert_eq!(critical[0].keyword.as_deref(), Some("Communication"));
    assert_eq!(critical[0].location, "summary");
    assert!(critical[1..].iter().all(|r| r.location == "skills"));

    let junior = session.recommendations_for_location("experience:1");
    let ids: Vec<&str> = junior.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["metric:experience:1", "action-verb:experience:1"]);

    assert_eq!(session.coverage_for_section("experience").covered, 3);
}

#[tokio::test]
async fn test_txt_and_markdown_agree() {
    let manager = InputManager::new();
    let txt = manager.load_job_description(Path::new(JOB_TXT)).await.unwrap();
    let md = manager.load_job_description(Path::new(JOB_MD)).await.unwrap();

    let mut session = AnalysisSession::new();
    let from_txt = session.set_job_description(&txt).clone();
    let from_md = session.set_job_description(&md).clone();

    assert_eq!(from_txt.keywords, from_md.keywords);
    assert_eq!(from_txt.weights, from_md.weights);
}

#[tokio::test]
async fn test_custom_keywords_from_config() {
    let mut config = Config::default();
    config.analysis.custom_keywords.push(CustomKeywordConfig {
        text: "Payments".to_string(),
        category: KeywordCategory::Industry,
    });

    let manager = InputManager::new();
    let job = manager.load_job_description(Path::new(JOB_TXT)).await.unwrap();

    let mut session = AnalysisSession::with_options(config.analysis_options()).unwrap();
    let profile = session.set_job_description(&job);
    let payments = profile.keywords.iter().find(|k| k.text == "Payments").unwrap();
    assert_eq!(payments.category, KeywordCategory::Industry);
    assert_eq!(profile.requirement_of(payments), Requirement::Required);
}

#[tokio::test]
async fn test_empty_job_description() {
    let manager = InputManager::new();
    let resume = manager.load_resume(Path::new(RESUME_JSON)).await.unwrap();

    let mut session = AnalysisSession::new();
    session.set_job_description("");
    let results = session.analyze(&resume);

    assert!(!results.has_job_description);
    assert_eq!(results.score.overall, 0);
    assert!(results.score.by_section.is_empty());
    assert!(results.recommendations.iter().all(|r| r.severity == Severity::Info));
}

#[tokio::test]
async fn test_report_formats() {
    let manager = InputManager::new();
    let job = manager.load_job_description(Path::new(JOB_TXT)).await.unwrap();
    let resume = manager.load_resume(Path::new(RESUME_JSON)).await.unwrap();

    let mut session = AnalysisSession::new();
    session.set_job_description(&job);
    let results = session.analyze(&resume).clone();
    let report = AtsReport::new(results, RESUME_JSON, JOB_TXT, session.fragments().len(), 0);

    let generator = ReportGenerator::with_options(false, true);

    let json = generator.generate_report(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["overall_score"], 62);
    assert_eq!(value["analysis"]["hasJobDescription"], true);

    let markdown = generator.generate_report(&report, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("| Communication | missing | required |  |"));

    let console = generator.generate_report(&report, OutputFormat::Console).unwrap();
    assert!(console.contains("Overall: 62% [FAIR]"));
}
