//! Flattening a structured resume into location-tagged text fragments

use crate::processing::text_processor::normalize_whitespace;
use crate::resume::ResumeData;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level resume sections, in their default display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Summary,
    Experience,
    Projects,
    Skills,
    Education,
    Certifications,
    Achievements,
    Custom,
}

impl SectionType {
    pub const DEFAULT_ORDER: [SectionType; 8] = [
        SectionType::Summary,
        SectionType::Experience,
        SectionType::Projects,
        SectionType::Skills,
        SectionType::Education,
        SectionType::Certifications,
        SectionType::Achievements,
        SectionType::Custom,
    ];

    /// Location prefix used in fragment locations.
    pub fn key(self) -> &'static str {
        match self {
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Projects => "projects",
            SectionType::Skills => "skills",
            SectionType::Education => "education",
            SectionType::Certifications => "certifications",
            SectionType::Achievements => "achievements",
            SectionType::Custom => "custom",
        }
    }

    /// Accepts the ids used in the editor's `sectionOrder`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "summary" => Some(SectionType::Summary),
            "experience" => Some(SectionType::Experience),
            "projects" => Some(SectionType::Projects),
            "skills" => Some(SectionType::Skills),
            "education" => Some(SectionType::Education),
            "certifications" => Some(SectionType::Certifications),
            "achievements" => Some(SectionType::Achievements),
            k if k == "custom" || k == "customsections" || k.starts_with("custom:") || k.starts_with("custom-") => {
                Some(SectionType::Custom)
            }
            _ => None,
        }
    }

    /// Section of a fragment location such as `experience:2`.
    pub fn of_location(location: &str) -> Option<Self> {
        Self::from_key(location.split(':').next().unwrap_or(location))
    }

    /// Sections whose entries describe delivered work.
    pub fn is_work_section(self) -> bool {
        matches!(self, SectionType::Experience | SectionType::Projects)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionType::Summary => write!(f, "Summary"),
            SectionType::Experience => write!(f, "Experience"),
            SectionType::Projects => write!(f, "Projects"),
            SectionType::Skills => write!(f, "Skills"),
            SectionType::Education => write!(f, "Education"),
            SectionType::Certifications => write!(f, "Certifications"),
            SectionType::Achievements => write!(f, "Achievements"),
            SectionType::Custom => write!(f, "Custom"),
        }
    }
}

/// One addressable unit of resume text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeFragment {
    /// e.g. `summary`, `skills`, `experience:0`, `custom:1:3`
    pub location: String,
    pub text: String,
}

impl ResumeFragment {
    pub fn new(location: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            text: text.into(),
        }
    }

    pub fn section(&self) -> Option<SectionType> {
        SectionType::of_location(&self.location)
    }
}

/// Join free-text parts with single spaces, skipping blanks.
fn join_text<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_whitespace(&joined)
}

/// Sections in the order the resume presents them.
pub fn section_order(resume: &ResumeData) -> Vec<SectionType> {
    let mut order = Vec::with_capacity(SectionType::DEFAULT_ORDER.len());

    if let Some(metadata) = &resume.metadata {
        for section in metadata.section_order.iter().filter_map(|k| SectionType::from_key(k)) {
            if !order.contains(&section) {
                order.push(section);
            }
        }
    }
    for section in SectionType::DEFAULT_ORDER {
        if !order.contains(&section) {
            order.push(section);
        }
    }

    order
}

/// Rebuild the full fragment index for `resume`.
///
/// Fragments come out in section order, then by entry index. Dates, links,
/// ids and contact details never reach fragment text.
pub fn index_resume(resume: &ResumeData) -> Vec<ResumeFragment> {
    let mut fragments = Vec::new();

    for section in section_order(resume) {
        match section {
            SectionType::Summary => {
                let title = resume.personal.title.as_deref().unwrap_or_default();
                fragments.push(ResumeFragment::new(
                    section.key(),
                    join_text([title, resume.summary.as_str()]),
                ));
            }
            SectionType::Experience => {
                for (i, exp) in resume.experience.iter().enumerate() {
                    let parts = [exp.title.as_str(), exp.description.as_str()]
                        .into_iter()
                        .chain(exp.bullets.iter().map(String::as_str));
                    fragments.push(ResumeFragment::new(format!("experience:{}", i), join_text(parts)));
                }
            }
            SectionType::Projects => {
                for (i, project) in resume.projects.iter().enumerate() {
                    let parts = [
                        project.name.as_str(),
                        project.role.as_deref().unwrap_or_default(),
                        project.description.as_str(),
                    ]
                    .into_iter()
                    .chain(project.technology_list().iter().map(String::as_str))
                    .chain(project.bullets.iter().map(String::as_str));
                    fragments.push(ResumeFragment::new(format!("projects:{}", i), join_text(parts)));
                }
            }
            SectionType::Skills => {
                let items: Vec<&str> = resume
                    .skills
                    .items()
                    .into_iter()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                // comma-joined so neighbouring items never read as one phrase
                fragments.push(ResumeFragment::new(section.key(), items.join(", ")));
            }
            SectionType::Education => {
                for (i, edu) in resume.education.iter().enumerate() {
                    let parts = [
                        edu.degree.as_str(),
                        edu.school_name(),
                        edu.field_name(),
                        edu.description.as_deref().unwrap_or_default(),
                    ];
                    fragments.push(ResumeFragment::new(format!("education:{}", i), join_text(parts)));
                }
            }
            SectionType::Certifications => {
                for (i, cert) in resume.certifications.iter().enumerate() {
                    let parts = [
                        cert.name.as_str(),
                        cert.issuer.as_str(),
                        cert.description.as_deref().unwrap_or_default(),
                    ];
                    fragments.push(ResumeFragment::new(format!("certifications:{}", i), join_text(parts)));
                }
            }
            SectionType::Achievements => {
                for (i, ach) in resume.achievements.iter().enumerate() {
                    let parts = [
                        ach.title.as_str(),
                        ach.issuer.as_deref().unwrap_or_default(),
                        ach.description.as_str(),
                    ];
                    fragments.push(ResumeFragment::new(format!("achievements:{}", i), join_text(parts)));
                }
            }
            SectionType::Custom => {
                for (s, custom) in resume.custom_sections.iter().enumerate() {
                    for (e, entry) in custom.entries.iter().enumerate() {
                        let values: Vec<String> = entry
                            .values
                            .iter()
                            .filter(|(field_id, _)| custom.field_type(field_id).is_prose())
                            .map(|(_, value)| value.as_text())
                            .collect();
                        fragments.push(ResumeFragment::new(
                            format!("custom:{}:{}", s, e),
                            join_text(values.iter().map(String::as_str)),
                        ));
                    }
                }
            }
        }
    }

    debug!("Indexed resume into {} fragments", fragments.len());
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Experience, Project, ResumeMetadata, SkillCategory, Skills};

    fn sample() -> ResumeData {
        ResumeData {
            summary: "Backend engineer".to_string(),
            experience: vec![
                Experience {
                    title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    start_date: "2020-01".to_string(),
                    description: "Built APIs".to_string(),
                    bullets: vec!["Cut latency by 40%".to_string(), "  ".to_string()],
                    ..Default::default()
                },
                Experience::default(),
            ],
            projects: vec![Project {
                name: "Crawler".to_string(),
                url: Some("https://example.com".to_string()),
                technologies: vec!["Rust".to_string()],
                ..Default::default()
            }],
            skills: Skills::Categorized(vec![SkillCategory {
                category: "Core".to_string(),
                items: vec!["React".to_string(), "Native Apps".to_string()],
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_fragment_locations_and_text() {
        let fragments = index_resume(&sample());
        let locations: Vec<&str> = fragments.iter().map(|f| f.location.as_str()).collect();
        assert_eq!(
            locations,
            vec!["summary", "experience:0", "experience:1", "projects:0", "skills"]
        );

        assert_eq!(fragments[1].text, "Engineer Built APIs Cut latency by 40%");
        assert_eq!(fragments[2].text, "");
        assert_eq!(fragments[3].text, "Crawler Rust");
        assert_eq!(fragments[4].text, "React, Native Apps");
    }

    #[test]
    fn test_excludes_dates_and_urls() {
        let fragments = index_resume(&sample());
        assert!(fragments.iter().all(|f| !f.text.contains("2020")));
        assert!(fragments.iter().all(|f| !f.text.contains("https")));
    }

    #[test]
    fn test_section_order_from_metadata() {
        let mut resume = sample();
        resume.metadata = Some(ResumeMetadata {
            section_order: vec!["personal".into(), "skills".into(), "summary".into()],
            ..Default::default()
        });

        let order = section_order(&resume);
        assert_eq!(order[0], SectionType::Skills);
        assert_eq!(order[1], SectionType::Summary);
        assert_eq!(order.len(), SectionType::DEFAULT_ORDER.len());

        let fragments = index_resume(&resume);
        assert_eq!(fragments[0].location, "skills");
    }

    #[test]
    fn test_empty_resume() {
        let fragments = index_resume(&ResumeData::default());
        let locations: Vec<&str> = fragments.iter().map(|f| f.location.as_str()).collect();
        assert_eq!(locations, vec!["summary", "skills"]);
        assert!(fragments.iter().all(|f| f.text.is_empty()));
    }

    #[test]
    fn test_location_sections() {
        assert_eq!(SectionType::of_location("experience:3"), Some(SectionType::Experience));
        assert_eq!(SectionType::of_location("custom:0:1"), Some(SectionType::Custom));
        assert_eq!(SectionType::of_location("skills"), Some(SectionType::Skills));
        assert_eq!(SectionType::of_location("personal"), None);
    }
}
