//! Edit commands: every mutation a user can make to a profile document.
//!
//! Commands are applied immutably: `apply` clones the input document, changes exactly
//! what the command names, and returns the new document. The input is never touched,
//! so earlier snapshots stay valid (the editor session keeps one while a save is in flight).
//!
//! Scalar leaves are addressed through `ScalarField`, one variant per path, instead of
//! a free-form field name.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::{
    EducationEntry, LanguageEntry, ProfileDocument, ProjectEntry, SkillEntry, WorkEntry,
};

// ────────────────────────────────────────────────────────────────────────────
// Addressing
// ────────────────────────────────────────────────────────────────────────────

/// The ordered, repeated collections of a profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Work,
    Education,
    Skills,
    Projects,
    Languages,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Work => "work",
            Collection::Education => "education",
            Collection::Skills => "skills",
            Collection::Projects => "projects",
            Collection::Languages => "languages",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Every scalar leaf of the document that the editor can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarField {
    #[serde(rename = "basics.name")]
    Name,
    #[serde(rename = "basics.label")]
    Label,
    #[serde(rename = "basics.image")]
    Image,
    #[serde(rename = "basics.email")]
    Email,
    #[serde(rename = "basics.phone")]
    Phone,
    #[serde(rename = "basics.url")]
    Url,
    #[serde(rename = "basics.twitter")]
    Twitter,
    #[serde(rename = "basics.linkedin")]
    Linkedin,
    #[serde(rename = "basics.github")]
    Github,
    #[serde(rename = "basics.summary")]
    Summary,
    #[serde(rename = "basics.additionalInformation")]
    AdditionalInformation,
    #[serde(rename = "basics.location.address")]
    Address,
    #[serde(rename = "basics.location.postalCode")]
    PostalCode,
    #[serde(rename = "basics.location.city")]
    City,
    #[serde(rename = "basics.location.region")]
    Region,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry patches (shallow merge: `None` keeps the current value)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPatch {
    pub name: Option<String>,
    pub position: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub summary: Option<String>,
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub url: Option<String>,
    pub area: Option<String>,
    pub study_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub score: Option<String>,
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<String>,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguagePatch {
    pub language: Option<String>,
    pub fluency: Option<String>,
}

/// A typed patch; the variant decides which collection it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "snake_case")]
pub enum EntryPatch {
    Work(WorkPatch),
    Education(EducationPatch),
    Skills(SkillPatch),
    Projects(ProjectPatch),
    Languages(LanguagePatch),
}

impl EntryPatch {
    pub fn collection(&self) -> Collection {
        match self {
            EntryPatch::Work(_) => Collection::Work,
            EntryPatch::Education(_) => Collection::Education,
            EntryPatch::Skills(_) => Collection::Skills,
            EntryPatch::Projects(_) => Collection::Projects,
            EntryPatch::Languages(_) => Collection::Languages,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    SetField {
        field: ScalarField,
        value: String,
    },
    UpdateEntry {
        index: usize,
        patch: EntryPatch,
    },
    AppendEntry {
        collection: Collection,
    },
    RemoveEntry {
        collection: Collection,
        index: usize,
    },
    MoveEntry {
        collection: Collection,
        index: usize,
        direction: Direction,
    },
    AppendHighlight {
        collection: Collection,
        entry_index: usize,
    },
    RemoveHighlight {
        collection: Collection,
        entry_index: usize,
        highlight_index: usize,
    },
    SetHighlight {
        collection: Collection,
        entry_index: usize,
        highlight_index: usize,
        value: String,
    },
    /// Replaces `keywords` from comma-separated input (skills and projects).
    SetKeywords {
        collection: Collection,
        entry_index: usize,
        csv: String,
    },
    /// Replaces an education entry's `courses` from comma-separated input.
    SetCourses {
        entry_index: usize,
        csv: String,
    },
}

/// Precondition violations. A correctly rendered form never produces these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("{collection} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        collection: Collection,
        index: usize,
        len: usize,
    },

    #[error("{list} index {index} is out of range (len {len})")]
    ListIndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{collection} entries have no {list}")]
    UnsupportedList {
        collection: Collection,
        list: &'static str,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Application
// ────────────────────────────────────────────────────────────────────────────

/// Applies one command, returning the new document.
pub fn apply(doc: &ProfileDocument, command: &EditCommand) -> Result<ProfileDocument, EditError> {
    let mut next = doc.clone();
    apply_in_place(&mut next, command)?;
    Ok(next)
}

/// Applies a batch atomically: the first failing command aborts the whole batch.
pub fn apply_all(
    doc: &ProfileDocument,
    commands: &[EditCommand],
) -> Result<ProfileDocument, EditError> {
    let mut next = doc.clone();
    for command in commands {
        apply_in_place(&mut next, command)?;
    }
    Ok(next)
}

/// Splits comma-separated input into trimmed items, dropping empty ones.
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of `parse_csv` for display in a text input.
pub fn join_csv(items: &[String]) -> String {
    items.join(", ")
}

trait BlankEntry {
    fn blank_entry() -> Self;
}

impl BlankEntry for WorkEntry {
    fn blank_entry() -> Self {
        WorkEntry::blank()
    }
}

impl BlankEntry for EducationEntry {
    fn blank_entry() -> Self {
        EducationEntry::blank()
    }
}

impl BlankEntry for SkillEntry {
    fn blank_entry() -> Self {
        SkillEntry::blank()
    }
}

impl BlankEntry for ProjectEntry {
    fn blank_entry() -> Self {
        ProjectEntry::blank()
    }
}

impl BlankEntry for LanguageEntry {
    fn blank_entry() -> Self {
        LanguageEntry::blank()
    }
}

/// Runs `$body` with `$items` bound to the named collection's entries.
macro_rules! with_collection {
    ($doc:expr, $collection:expr, |$items:ident| $body:expr) => {
        match $collection {
            Collection::Work => {
                let $items = &mut $doc.work;
                $body
            }
            Collection::Education => {
                let $items = &mut $doc.education;
                $body
            }
            Collection::Skills => {
                let $items = &mut $doc.skills;
                $body
            }
            Collection::Projects => {
                let $items = $doc.projects.get_or_insert_with(Vec::new);
                $body
            }
            Collection::Languages => {
                let $items = &mut $doc.basics.languages;
                $body
            }
        }
    };
}

fn apply_in_place(doc: &mut ProfileDocument, command: &EditCommand) -> Result<(), EditError> {
    match command {
        EditCommand::SetField { field, value } => {
            set_field(doc, *field, value.clone());
            Ok(())
        }
        EditCommand::UpdateEntry { index, patch } => update_entry(doc, *index, patch),
        EditCommand::AppendEntry { collection } => {
            with_collection!(doc, collection, |items| append_blank(items));
            Ok(())
        }
        EditCommand::RemoveEntry { collection, index } => {
            with_collection!(doc, collection, |items| remove_at(items, *collection, *index))
        }
        EditCommand::MoveEntry {
            collection,
            index,
            direction,
        } => with_collection!(doc, collection, |items| move_within(
            items,
            *collection,
            *index,
            *direction
        )),
        EditCommand::AppendHighlight {
            collection,
            entry_index,
        } => {
            highlights_mut(doc, *collection, *entry_index)?.push(String::new());
            Ok(())
        }
        EditCommand::RemoveHighlight {
            collection,
            entry_index,
            highlight_index,
        } => {
            let highlights = highlights_mut(doc, *collection, *entry_index)?;
            check_list_index("highlights", *highlight_index, highlights.len())?;
            highlights.remove(*highlight_index);
            Ok(())
        }
        EditCommand::SetHighlight {
            collection,
            entry_index,
            highlight_index,
            value,
        } => {
            let highlights = highlights_mut(doc, *collection, *entry_index)?;
            check_list_index("highlights", *highlight_index, highlights.len())?;
            highlights[*highlight_index] = value.clone();
            Ok(())
        }
        EditCommand::SetKeywords {
            collection,
            entry_index,
            csv,
        } => {
            *keywords_mut(doc, *collection, *entry_index)? = parse_csv(csv);
            Ok(())
        }
        EditCommand::SetCourses { entry_index, csv } => {
            let entry = entry_mut(&mut doc.education, Collection::Education, *entry_index)?;
            entry.courses = Some(parse_csv(csv));
            Ok(())
        }
    }
}

fn set_field(doc: &mut ProfileDocument, field: ScalarField, value: String) {
    let basics = &mut doc.basics;
    match field {
        ScalarField::Name => basics.name = value,
        ScalarField::Label => basics.label = value,
        ScalarField::Image => basics.image = Some(value),
        ScalarField::Email => basics.email = value,
        ScalarField::Phone => basics.phone = value,
        ScalarField::Url => basics.url = Some(value),
        ScalarField::Twitter => basics.twitter = Some(value),
        ScalarField::Linkedin => basics.linkedin = Some(value),
        ScalarField::Github => basics.github = Some(value),
        ScalarField::Summary => basics.summary = value,
        ScalarField::AdditionalInformation => basics.additional_information = Some(value),
        ScalarField::Address => basics.location.address = Some(value),
        ScalarField::PostalCode => basics.location.postal_code = Some(value),
        ScalarField::City => basics.location.city = value,
        ScalarField::Region => basics.location.region = Some(value),
    }
}

fn update_entry(doc: &mut ProfileDocument, index: usize, patch: &EntryPatch) -> Result<(), EditError> {
    match patch {
        EntryPatch::Work(p) => {
            let entry = entry_mut(&mut doc.work, Collection::Work, index)?;
            merge(&mut entry.name, &p.name);
            merge(&mut entry.position, &p.position);
            merge_opt(&mut entry.url, &p.url);
            merge(&mut entry.start_date, &p.start_date);
            merge_opt(&mut entry.end_date, &p.end_date);
            merge(&mut entry.summary, &p.summary);
            merge(&mut entry.highlights, &p.highlights);
        }
        EntryPatch::Education(p) => {
            let entry = entry_mut(&mut doc.education, Collection::Education, index)?;
            merge(&mut entry.institution, &p.institution);
            merge_opt(&mut entry.url, &p.url);
            merge(&mut entry.area, &p.area);
            merge(&mut entry.study_type, &p.study_type);
            merge(&mut entry.start_date, &p.start_date);
            merge_opt(&mut entry.end_date, &p.end_date);
            merge_opt(&mut entry.score, &p.score);
            merge_opt(&mut entry.courses, &p.courses);
        }
        EntryPatch::Skills(p) => {
            let entry = entry_mut(&mut doc.skills, Collection::Skills, index)?;
            merge(&mut entry.name, &p.name);
            merge_opt(&mut entry.level, &p.level);
            merge(&mut entry.keywords, &p.keywords);
        }
        EntryPatch::Projects(p) => {
            let projects = doc.projects.get_or_insert_with(Vec::new);
            let entry = entry_mut(projects, Collection::Projects, index)?;
            merge(&mut entry.name, &p.name);
            merge(&mut entry.description, &p.description);
            merge(&mut entry.highlights, &p.highlights);
            merge(&mut entry.keywords, &p.keywords);
            merge_opt(&mut entry.url, &p.url);
        }
        EntryPatch::Languages(p) => {
            let entry = entry_mut(&mut doc.basics.languages, Collection::Languages, index)?;
            merge(&mut entry.language, &p.language);
            merge(&mut entry.fluency, &p.fluency);
        }
    }
    Ok(())
}

fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

fn merge_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

fn append_blank<T: BlankEntry>(items: &mut Vec<T>) {
    items.push(T::blank_entry());
}

fn entry_mut<T>(items: &mut [T], collection: Collection, index: usize) -> Result<&mut T, EditError> {
    let len = items.len();
    items.get_mut(index).ok_or(EditError::IndexOutOfRange {
        collection,
        index,
        len,
    })
}

fn remove_at<T>(items: &mut Vec<T>, collection: Collection, index: usize) -> Result<(), EditError> {
    if index >= items.len() {
        return Err(EditError::IndexOutOfRange {
            collection,
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(())
}

fn move_within<T>(
    items: &mut [T],
    collection: Collection,
    index: usize,
    direction: Direction,
) -> Result<(), EditError> {
    if index >= items.len() {
        return Err(EditError::IndexOutOfRange {
            collection,
            index,
            len: items.len(),
        });
    }
    let neighbour = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|n| *n < items.len()),
    };
    if let Some(n) = neighbour {
        items.swap(index, n);
    }
    Ok(())
}

fn check_list_index(list: &'static str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::ListIndexOutOfRange { list, index, len })
    }
}

fn highlights_mut(
    doc: &mut ProfileDocument,
    collection: Collection,
    entry_index: usize,
) -> Result<&mut Vec<String>, EditError> {
    match collection {
        Collection::Work => Ok(&mut entry_mut(&mut doc.work, collection, entry_index)?.highlights),
        Collection::Projects => {
            let projects = doc.projects.get_or_insert_with(Vec::new);
            Ok(&mut entry_mut(projects, collection, entry_index)?.highlights)
        }
        _ => Err(EditError::UnsupportedList {
            collection,
            list: "highlights",
        }),
    }
}

fn keywords_mut(
    doc: &mut ProfileDocument,
    collection: Collection,
    entry_index: usize,
) -> Result<&mut Vec<String>, EditError> {
    match collection {
        Collection::Skills => Ok(&mut entry_mut(&mut doc.skills, collection, entry_index)?.keywords),
        Collection::Projects => {
            let projects = doc.projects.get_or_insert_with(Vec::new);
            Ok(&mut entry_mut(projects, collection, entry_index)?.keywords)
        }
        _ => Err(EditError::UnsupportedList {
            collection,
            list: "keywords",
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn work(name: &str) -> WorkEntry {
        WorkEntry {
            name: name.to_string(),
            position: "Engineer".to_string(),
            start_date: "2020-01".to_string(),
            highlights: vec!["a".to_string(), "b".to_string()],
            ..WorkEntry::default()
        }
    }

    fn project(name: &str) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            ..ProjectEntry::default()
        }
    }

    fn doc_with_work(names: &[&str]) -> ProfileDocument {
        ProfileDocument {
            work: names.iter().map(|n| work(n)).collect(),
            ..ProfileDocument::default()
        }
    }

    fn work_names(doc: &ProfileDocument) -> Vec<&str> {
        doc.work.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn test_set_field_changes_only_that_leaf() {
        let doc = doc_with_work(&["ACME"]);
        let next = apply(
            &doc,
            &EditCommand::SetField {
                field: ScalarField::Name,
                value: "Jane".to_string(),
            },
        )
        .unwrap();

        assert_eq!(next.basics.name, "Jane");
        assert_eq!(doc.basics.name, "", "input document must not be mutated");
        assert_eq!(next.work, doc.work);
        assert_eq!(next.basics.location, doc.basics.location);
    }

    #[test]
    fn test_set_nested_location_field() {
        let next = apply(
            &ProfileDocument::default(),
            &EditCommand::SetField {
                field: ScalarField::PostalCode,
                value: "10001".to_string(),
            },
        )
        .unwrap();
        assert_eq!(next.basics.location.postal_code.as_deref(), Some("10001"));
    }

    #[test]
    fn test_append_work_adds_blank_entry_with_one_highlight() {
        let doc = doc_with_work(&["A", "B"]);
        let next = apply(
            &doc,
            &EditCommand::AppendEntry {
                collection: Collection::Work,
            },
        )
        .unwrap();

        assert_eq!(next.work.len(), 3);
        assert_eq!(next.work[2].highlights, vec![String::new()]);
        assert_eq!(next.work[2].name, "");
    }

    #[test]
    fn test_append_project_to_absent_list_creates_it() {
        let doc = ProfileDocument::default();
        assert!(doc.projects.is_none());
        let next = apply(
            &doc,
            &EditCommand::AppendEntry {
                collection: Collection::Projects,
            },
        )
        .unwrap();
        assert_eq!(next.projects().len(), 1);
    }

    #[test]
    fn test_remove_entry_shifts_later_entries_down() {
        let doc = doc_with_work(&["A", "B", "C", "D"]);
        let next = apply(
            &doc,
            &EditCommand::RemoveEntry {
                collection: Collection::Work,
                index: 1,
            },
        )
        .unwrap();

        assert_eq!(work_names(&next), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_remove_entry_out_of_range_is_rejected() {
        let doc = doc_with_work(&["A"]);
        let err = apply(
            &doc,
            &EditCommand::RemoveEntry {
                collection: Collection::Work,
                index: 1,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                collection: Collection::Work,
                index: 1,
                len: 1
            }
        );
    }

    #[test]
    fn test_update_entry_merges_only_given_fields() {
        let doc = doc_with_work(&["ACME"]);
        let next = apply(
            &doc,
            &EditCommand::UpdateEntry {
                index: 0,
                patch: EntryPatch::Work(WorkPatch {
                    position: Some("Staff Engineer".to_string()),
                    end_date: Some("2023-05".to_string()),
                    ..WorkPatch::default()
                }),
            },
        )
        .unwrap();

        assert_eq!(next.work[0].position, "Staff Engineer");
        assert_eq!(next.work[0].end_date.as_deref(), Some("2023-05"));
        assert_eq!(next.work[0].name, "ACME");
        assert_eq!(next.work[0].highlights, doc.work[0].highlights);
    }

    #[test]
    fn test_update_entry_out_of_range_is_rejected() {
        let err = apply(
            &ProfileDocument::default(),
            &EditCommand::UpdateEntry {
                index: 0,
                patch: EntryPatch::Languages(LanguagePatch::default()),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EditError::IndexOutOfRange {
                collection: Collection::Languages,
                ..
            }
        ));
    }

    #[test]
    fn test_move_up_swaps_with_previous() {
        let doc = ProfileDocument {
            projects: Some(vec![project("p0"), project("p1"), project("p2")]),
            ..ProfileDocument::default()
        };
        let next = apply(
            &doc,
            &EditCommand::MoveEntry {
                collection: Collection::Projects,
                index: 2,
                direction: Direction::Up,
            },
        )
        .unwrap();
        let names: Vec<_> = next.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p0", "p2", "p1"]);
    }

    #[test]
    fn test_move_at_boundaries_is_noop() {
        let doc = doc_with_work(&["A", "B", "C"]);
        let first_up = apply(
            &doc,
            &EditCommand::MoveEntry {
                collection: Collection::Work,
                index: 0,
                direction: Direction::Up,
            },
        )
        .unwrap();
        let last_down = apply(
            &doc,
            &EditCommand::MoveEntry {
                collection: Collection::Work,
                index: 2,
                direction: Direction::Down,
            },
        )
        .unwrap();
        assert_eq!(first_up, doc);
        assert_eq!(last_down, doc);
    }

    #[test]
    fn test_highlight_append_set_remove() {
        let doc = doc_with_work(&["A"]);
        let next = apply_all(
            &doc,
            &[
                EditCommand::AppendHighlight {
                    collection: Collection::Work,
                    entry_index: 0,
                },
                EditCommand::SetHighlight {
                    collection: Collection::Work,
                    entry_index: 0,
                    highlight_index: 2,
                    value: "c".to_string(),
                },
                EditCommand::RemoveHighlight {
                    collection: Collection::Work,
                    entry_index: 0,
                    highlight_index: 0,
                },
            ],
        )
        .unwrap();
        assert_eq!(next.work[0].highlights, vec!["b", "c"]);
    }

    #[test]
    fn test_highlights_unsupported_on_skills() {
        let doc = ProfileDocument {
            skills: vec![SkillEntry::default()],
            ..ProfileDocument::default()
        };
        let err = apply(
            &doc,
            &EditCommand::AppendHighlight {
                collection: Collection::Skills,
                entry_index: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, EditError::UnsupportedList { .. }));
    }

    #[test]
    fn test_remove_highlight_out_of_range() {
        let doc = doc_with_work(&["A"]);
        let err = apply(
            &doc,
            &EditCommand::RemoveHighlight {
                collection: Collection::Work,
                entry_index: 0,
                highlight_index: 5,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            EditError::ListIndexOutOfRange {
                list: "highlights",
                index: 5,
                len: 2
            }
        );
    }

    #[test]
    fn test_set_keywords_parses_csv() {
        let doc = ProfileDocument {
            skills: vec![SkillEntry::default()],
            ..ProfileDocument::default()
        };
        let next = apply(
            &doc,
            &EditCommand::SetKeywords {
                collection: Collection::Skills,
                entry_index: 0,
                csv: " Rust,  Go , ,TypeScript,".to_string(),
            },
        )
        .unwrap();
        assert_eq!(next.skills[0].keywords, vec!["Rust", "Go", "TypeScript"]);
        assert_eq!(join_csv(&next.skills[0].keywords), "Rust, Go, TypeScript");
    }

    #[test]
    fn test_set_courses_on_education() {
        let doc = ProfileDocument {
            education: vec![EducationEntry::blank()],
            ..ProfileDocument::default()
        };
        let next = apply(
            &doc,
            &EditCommand::SetCourses {
                entry_index: 0,
                csv: "Compilers, Databases".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            next.education[0].courses,
            Some(vec!["Compilers".to_string(), "Databases".to_string()])
        );
    }

    #[test]
    fn test_apply_all_is_atomic() {
        let doc = doc_with_work(&["A"]);
        let result = apply_all(
            &doc,
            &[
                EditCommand::SetField {
                    field: ScalarField::Name,
                    value: "Jane".to_string(),
                },
                EditCommand::RemoveEntry {
                    collection: Collection::Work,
                    index: 9,
                },
            ],
        );
        assert!(result.is_err());
        assert_eq!(doc.basics.name, "");
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::json!([
            { "op": "set_field", "field": "basics.location.city", "value": "Berlin" },
            { "op": "append_entry", "collection": "languages" },
            {
                "op": "update_entry",
                "index": 0,
                "patch": { "collection": "languages", "language": "German", "fluency": "Native" }
            },
            { "op": "move_entry", "collection": "work", "index": 0, "direction": "down" }
        ]);
        let commands: Vec<EditCommand> = serde_json::from_value(json).unwrap();
        assert_eq!(commands.len(), 4);

        let doc = doc_with_work(&["A", "B"]);
        let next = apply_all(&doc, &commands).unwrap();
        assert_eq!(next.basics.location.city, "Berlin");
        assert_eq!(next.basics.languages[0].language, "German");
        assert_eq!(work_names(&next), vec!["B", "A"]);
    }
}
