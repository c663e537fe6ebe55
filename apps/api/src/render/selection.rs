//! The one place that decides what a resume shows.
//!
//! `select` turns a `ProfileDocument` into a `ResumeView`: blank optional fields become
//! `None`, blank list items and entirely blank entries are dropped, dates are formatted,
//! and every URL carries both its href and its display form. Layouts only arrange what
//! the view contains, so all templates agree on which sections exist.

use serde::Serialize;

use super::format::{absolute_href, format_date_range, strip_scheme};
use crate::models::profile::{filled, EducationEntry, ProfileDocument, ProjectEntry, SkillEntry, WorkEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Profiles,
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
    Languages,
    AdditionalInformation,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Contact,
        SectionKind::Profiles,
        SectionKind::Summary,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Education,
        SectionKind::Languages,
        SectionKind::AdditionalInformation,
    ];

    /// Value of the `data-section` attribute.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Contact => "contact",
            SectionKind::Profiles => "profiles",
            SectionKind::Summary => "summary",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Education => "education",
            SectionKind::Languages => "languages",
            SectionKind::AdditionalInformation => "additional_information",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Contact => "Contact",
            SectionKind::Profiles => "Profiles",
            SectionKind::Summary => "Summary",
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Education => "Education",
            SectionKind::Languages => "Languages",
            SectionKind::AdditionalInformation => "Additional Information",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub display: String,
}

impl Link {
    fn from_url(url: &str) -> Self {
        Self {
            href: absolute_href(url),
            display: strip_scheme(url).to_string(),
        }
    }

    fn mailto(email: &str) -> Self {
        Self {
            href: format!("mailto:{email}"),
            display: email.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Network {
    LinkedIn,
    Twitter,
    Github,
}

impl Network {
    pub fn label(&self) -> &'static str {
        match self {
            Network::LinkedIn => "LinkedIn",
            Network::Twitter => "Twitter",
            Network::Github => "Github",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialProfile {
    pub network: Network,
    pub link: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub email: Option<Link>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub website: Option<Link>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.city.is_none() && self.website.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillView {
    pub name: Option<String>,
    pub level: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkView {
    pub position: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub dates: String,
    pub summary: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationView {
    pub institution: Option<String>,
    pub url: Option<String>,
    /// "{studyType} in {area}", or whichever half is present.
    pub degree: Option<String>,
    pub score: Option<String>,
    pub dates: String,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageView {
    pub language: String,
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeView {
    pub name: String,
    pub label: Option<String>,
    pub image: Option<String>,
    pub contact: Contact,
    pub profiles: Vec<SocialProfile>,
    pub summary: Option<String>,
    pub skills: Vec<SkillView>,
    pub experience: Vec<WorkView>,
    pub projects: Vec<ProjectView>,
    pub education: Vec<EducationView>,
    pub languages: Vec<LanguageView>,
    pub additional_information: Option<String>,
}

impl ResumeView {
    /// Sections with something to show, in canonical order.
    pub fn visible_sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|kind| self.has(*kind))
            .collect()
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Contact => !self.contact.is_empty(),
            SectionKind::Profiles => !self.profiles.is_empty(),
            SectionKind::Summary => self.summary.is_some(),
            SectionKind::Skills => !self.skills.is_empty(),
            SectionKind::Experience => !self.experience.is_empty(),
            SectionKind::Projects => !self.projects.is_empty(),
            SectionKind::Education => !self.education.is_empty(),
            SectionKind::Languages => !self.languages.is_empty(),
            SectionKind::AdditionalInformation => self.additional_information.is_some(),
        }
    }
}

fn text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn opt_text(value: &Option<String>) -> Option<String> {
    filled(value).map(str::to_string)
}

fn items(values: &[String]) -> Vec<String> {
    values.iter().filter_map(|v| text(v)).collect()
}

pub fn select(doc: &ProfileDocument) -> ResumeView {
    let basics = &doc.basics;

    let contact = Contact {
        email: text(&basics.email).map(|e| Link::mailto(&e)),
        phone: text(&basics.phone),
        city: text(&basics.location.city),
        website: filled(&basics.url).map(Link::from_url),
    };

    let profiles = [
        (Network::LinkedIn, &basics.linkedin),
        (Network::Twitter, &basics.twitter),
        (Network::Github, &basics.github),
    ]
    .into_iter()
    .filter_map(|(network, url)| {
        filled(url).map(|url| SocialProfile {
            network,
            link: Link::from_url(url),
        })
    })
    .collect();

    ResumeView {
        name: basics.name.trim().to_string(),
        label: text(&basics.label),
        image: opt_text(&basics.image),
        contact,
        profiles,
        summary: text(&basics.summary),
        skills: doc.skills.iter().filter_map(select_skill).collect(),
        experience: doc.work.iter().filter_map(select_work).collect(),
        projects: doc.projects().iter().filter_map(select_project).collect(),
        education: doc.education.iter().filter_map(select_education).collect(),
        languages: basics
            .languages
            .iter()
            .filter_map(|l| {
                text(&l.language).map(|language| LanguageView {
                    language,
                    fluency: text(&l.fluency),
                })
            })
            .collect(),
        additional_information: opt_text(&basics.additional_information),
    }
}

fn select_skill(skill: &SkillEntry) -> Option<SkillView> {
    let view = SkillView {
        name: text(&skill.name),
        level: opt_text(&skill.level),
        keywords: items(&skill.keywords),
    };
    (view.name.is_some() || !view.keywords.is_empty()).then_some(view)
}

fn select_work(work: &WorkEntry) -> Option<WorkView> {
    let position = text(&work.position);
    let company = text(&work.name);
    let summary = text(&work.summary);
    let highlights = items(&work.highlights);
    if position.is_none() && company.is_none() && summary.is_none() && highlights.is_empty() {
        return None;
    }
    Some(WorkView {
        position,
        company,
        company_url: filled(&work.url).map(absolute_href),
        dates: format_date_range(&work.start_date, work.end_date.as_deref()),
        summary,
        highlights,
    })
}

fn select_project(project: &ProjectEntry) -> Option<ProjectView> {
    let view = ProjectView {
        name: text(&project.name),
        url: filled(&project.url).map(absolute_href),
        description: text(&project.description),
        keywords: items(&project.keywords),
        highlights: items(&project.highlights),
    };
    let empty = view.name.is_none()
        && view.description.is_none()
        && view.keywords.is_empty()
        && view.highlights.is_empty();
    (!empty).then_some(view)
}

fn select_education(edu: &EducationEntry) -> Option<EducationView> {
    let institution = text(&edu.institution);
    let degree = match (text(&edu.study_type), text(&edu.area)) {
        (Some(study), Some(area)) => Some(format!("{study} in {area}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    };
    if institution.is_none() && degree.is_none() {
        return None;
    }
    Some(EducationView {
        institution,
        url: filled(&edu.url).map(absolute_href),
        degree,
        score: opt_text(&edu.score),
        dates: format_date_range(&edu.start_date, edu.end_date.as_deref()),
        courses: edu.courses.as_deref().map(items).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{LanguageEntry, ProjectEntry};

    #[test]
    fn test_blank_document_shows_only_contact_email() {
        let view = select(&ProfileDocument::blank_for("jane@example.com"));
        assert_eq!(view.visible_sections(), vec![SectionKind::Contact]);
        assert_eq!(
            view.contact.email.as_ref().unwrap().href,
            "mailto:jane@example.com"
        );
    }

    #[test]
    fn test_empty_projects_list_is_suppressed() {
        let mut doc = ProfileDocument::blank_for("");
        doc.projects = Some(vec![ProjectEntry::blank()]);
        let view = select(&doc);
        assert!(!view.has(SectionKind::Projects));
    }

    #[test]
    fn test_blank_highlights_and_keywords_are_dropped() {
        let mut doc = ProfileDocument::default();
        doc.work.push(WorkEntry {
            position: "Engineer".to_string(),
            start_date: "2021-01".to_string(),
            highlights: vec!["".to_string(), " Shipped ".to_string()],
            ..WorkEntry::default()
        });
        let view = select(&doc);
        assert_eq!(view.experience[0].highlights, vec!["Shipped"]);
        assert_eq!(view.experience[0].dates, "Jan 2021 - Present");
    }

    #[test]
    fn test_social_links_carry_href_and_display() {
        let mut doc = ProfileDocument::default();
        doc.basics.github = Some("https://www.github.com/jane".to_string());
        doc.basics.twitter = Some(String::new());
        let view = select(&doc);
        assert_eq!(view.profiles.len(), 1);
        assert_eq!(view.profiles[0].network, Network::Github);
        assert_eq!(view.profiles[0].link.display, "github.com/jane");
        assert_eq!(view.profiles[0].link.href, "https://www.github.com/jane");
    }

    #[test]
    fn test_degree_line_composition() {
        let edu = EducationEntry {
            institution: "MIT".to_string(),
            area: "CS".to_string(),
            ..EducationEntry::default()
        };
        assert_eq!(select_education(&edu).unwrap().degree.as_deref(), Some("CS"));

        let edu = EducationEntry {
            study_type: "B.Sc.".to_string(),
            ..edu
        };
        assert_eq!(
            select_education(&edu).unwrap().degree.as_deref(),
            Some("B.Sc. in CS")
        );
    }

    #[test]
    fn test_languages_without_name_are_dropped() {
        let mut doc = ProfileDocument::default();
        doc.basics.languages = vec![
            LanguageEntry::blank(),
            LanguageEntry {
                language: "German".to_string(),
                fluency: String::new(),
            },
        ];
        let view = select(&doc);
        assert_eq!(
            view.languages,
            vec![LanguageView {
                language: "German".to_string(),
                fluency: None
            }]
        );
    }
}
