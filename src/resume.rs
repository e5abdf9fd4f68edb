//! Structured resume data as produced by the resume editor
//!
//! Every field is optional on input: a half-filled wizard must still
//! deserialize and index cleanly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeData {
    pub personal: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Skills,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub certifications: Vec<Certification>,
    pub custom_sections: Vec<CustomSection>,
    pub metadata: Option<ResumeMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    /// Headline, e.g. "Senior Backend Engineer"
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub current: bool,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub field: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub gpa: Option<String>,
}

impl Education {
    pub fn school_name(&self) -> &str {
        if self.school.trim().is_empty() {
            self.institution.as_deref().unwrap_or_default()
        } else {
            &self.school
        }
    }

    pub fn field_name(&self) -> &str {
        self.field_of_study
            .as_deref()
            .or(self.field.as_deref())
            .unwrap_or_default()
    }
}

/// Skills come either as named categories or as the older fixed groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skills {
    Categorized(Vec<SkillCategory>),
    Grouped(SkillGroups),
}

impl Default for Skills {
    fn default() -> Self {
        Skills::Categorized(Vec::new())
    }
}

impl Skills {
    /// Every skill item, in display order.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Skills::Categorized(categories) => categories
                .iter()
                .flat_map(|c| c.items.iter().map(String::as_str))
                .collect(),
            Skills::Grouped(groups) => groups
                .languages
                .iter()
                .chain(&groups.frameworks)
                .chain(&groups.tools)
                .map(String::as_str)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().iter().all(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    #[serde(alias = "name")]
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroups {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub description: String,
    pub technologies: Vec<String>,
    pub tech: Option<Vec<String>>,
    pub bullets: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Project {
    pub fn technology_list(&self) -> &[String] {
        if self.technologies.is_empty() {
            self.tech.as_deref().unwrap_or_default()
        } else {
            &self.technologies
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    #[default]
    Text,
    Textarea,
    Date,
    Url,
    Tag,
}

impl CustomFieldType {
    /// Dates and links are structure, not prose.
    pub fn is_prose(self) -> bool {
        !matches!(self, CustomFieldType::Date | CustomFieldType::Url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Text(String),
    Tags(Vec<String>),
}

impl CustomValue {
    pub fn as_text(&self) -> String {
        match self {
            CustomValue::Text(text) => text.clone(),
            CustomValue::Tags(tags) => tags.join(", "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSectionEntry {
    pub id: String,
    /// field id -> value
    pub values: BTreeMap<String, CustomValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<CustomField>,
    pub entries: Vec<CustomSectionEntry>,
}

impl CustomSection {
    pub fn field_type(&self, field_id: &str) -> CustomFieldType {
        self.fields
            .iter()
            .find(|f| f.id == field_id)
            .map(|f| f.field_type)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeMetadata {
    pub section_order: Vec<String>,
    pub last_updated: Option<String>,
    pub template: Option<String>,
    pub version: Option<String>,
}
