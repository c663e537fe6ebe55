//! Profile Document: the single structured record a user edits, previews and exports.
//!
//! Field names serialize in camelCase so the stored JSON matches the record shape
//! clients already send (`startDate`, `studyType`, `additionalInformation`, ...).
//!
//! # Invariants
//! - `start_date` is a "YYYY-MM" string; an absent or blank `end_date` means "Present".
//! - Nested string lists (`highlights`, `keywords`, `courses`) never hold holes:
//!   removal is always a splice.
//! - Optional strings stored as `""` are treated as absent by every renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub basics: Basics,
    #[serde(default)]
    pub work: Vec<WorkEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    #[serde(default)]
    pub name: String,
    /// Headline / job title shown next to the name.
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default)]
    pub summary: String,
    /// Free-text footer rendered below the last section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub fluency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    /// Company name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub study_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ProfileDocument {
    /// The document a user starts from when nothing is stored for their id.
    /// Only the email is pre-filled, from the identity provider.
    pub fn blank_for(email: &str) -> Self {
        Self {
            basics: Basics {
                email: email.to_string(),
                image: Some(String::new()),
                url: Some(String::new()),
                twitter: Some(String::new()),
                linkedin: Some(String::new()),
                github: Some(String::new()),
                location: Location {
                    address: Some(String::new()),
                    postal_code: Some(String::new()),
                    city: String::new(),
                    region: Some(String::new()),
                },
                ..Basics::default()
            },
            projects: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Projects as a slice; an absent list reads as empty.
    pub fn projects(&self) -> &[ProjectEntry] {
        self.projects.as_deref().unwrap_or(&[])
    }
}

impl WorkEntry {
    /// Blank entry appended by "Add Work Experience": one empty highlight ready to type into.
    pub fn blank() -> Self {
        Self {
            url: Some(String::new()),
            end_date: Some(String::new()),
            highlights: vec![String::new()],
            ..Self::default()
        }
    }
}

impl EducationEntry {
    pub fn blank() -> Self {
        Self {
            url: Some(String::new()),
            end_date: Some(String::new()),
            score: Some(String::new()),
            courses: Some(Vec::new()),
            ..Self::default()
        }
    }
}

impl SkillEntry {
    pub fn blank() -> Self {
        Self::default()
    }
}

impl ProjectEntry {
    pub fn blank() -> Self {
        Self {
            highlights: vec![String::new()],
            url: Some(String::new()),
            ..Self::default()
        }
    }
}

impl LanguageEntry {
    pub fn blank() -> Self {
        Self::default()
    }
}

/// Returns the trimmed value of an optional field, treating `""` the same as absent.
pub fn filled(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_document_prefills_email_only() {
        let doc = ProfileDocument::blank_for("jane@example.com");
        assert_eq!(doc.basics.email, "jane@example.com");
        assert!(doc.basics.name.is_empty());
        assert!(doc.work.is_empty());
        assert!(doc.education.is_empty());
        assert!(doc.skills.is_empty());
        assert!(doc.projects().is_empty());
        assert!(doc.basics.languages.is_empty());
    }

    #[test]
    fn test_blank_work_has_one_empty_highlight() {
        assert_eq!(WorkEntry::blank().highlights, vec![String::new()]);
        assert_eq!(ProjectEntry::blank().highlights, vec![String::new()]);
        assert!(ProjectEntry::blank().keywords.is_empty());
        assert_eq!(EducationEntry::blank().courses, Some(vec![]));
    }

    #[test]
    fn test_deserializes_camel_case_record() {
        let json = serde_json::json!({
            "basics": {
                "name": "Jane Smith",
                "label": "Software Engineer",
                "email": "jane@example.com",
                "phone": "(123) 456-7890",
                "summary": "Builds things.",
                "additionalInformation": "References on request",
                "location": { "city": "New York", "postalCode": "10001" },
                "languages": [{ "language": "English", "fluency": "Native" }]
            },
            "work": [{
                "name": "ACME Corp",
                "position": "Engineer",
                "startDate": "2021-01",
                "summary": "Microservices.",
                "highlights": ["Cut latency by 40%"]
            }],
            "education": [{
                "institution": "MIT",
                "area": "Computer Science",
                "studyType": "B.Sc.",
                "startDate": "2013-09",
                "endDate": "2017-06"
            }],
            "skills": [{ "name": "Backend", "keywords": ["Rust", "Go"] }]
        });

        let doc: ProfileDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.basics.location.postal_code.as_deref(), Some("10001"));
        assert_eq!(
            doc.basics.additional_information.as_deref(),
            Some("References on request")
        );
        assert_eq!(doc.work[0].start_date, "2021-01");
        assert!(doc.work[0].end_date.is_none());
        assert_eq!(doc.education[0].study_type, "B.Sc.");
        assert!(doc.projects.is_none());
        assert!(doc.projects().is_empty());
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent_options() {
        let mut doc = ProfileDocument::default();
        doc.work.push(WorkEntry {
            start_date: "2020-02".to_string(),
            ..WorkEntry::default()
        });
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["work"][0]["startDate"], "2020-02");
        assert!(value["work"][0].get("endDate").is_none());
        assert!(value.get("projects").is_none());
    }

    #[test]
    fn test_filled_treats_blank_as_absent() {
        assert_eq!(filled(&None), None);
        assert_eq!(filled(&Some(String::new())), None);
        assert_eq!(filled(&Some("   ".to_string())), None);
        assert_eq!(filled(&Some(" x ".to_string())), Some("x"));
    }
}
