//! Tab-sequenced section navigation for the editor forms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Personal => "Personal Info",
            Section::Summary => "Summary",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
        }
    }
}

/// Section order of the resume editor.
pub const RESUME_SECTIONS: &[Section] = &[
    Section::Personal,
    Section::Summary,
    Section::Experience,
    Section::Education,
    Section::Skills,
    Section::Projects,
];

/// Section order of the profile editor (no summary tab).
pub const PROFILE_SECTIONS: &[Section] = &[
    Section::Personal,
    Section::Experience,
    Section::Education,
    Section::Skills,
    Section::Projects,
];

/// Which editor layout a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    #[default]
    Resume,
    Profile,
}

impl EditorKind {
    pub fn sections(&self) -> &'static [Section] {
        match self {
            EditorKind::Resume => RESUME_SECTIONS,
            EditorKind::Profile => PROFILE_SECTIONS,
        }
    }
}

/// Position within a fixed, non-empty section order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCursor {
    order: &'static [Section],
    position: usize,
}

impl SectionCursor {
    /// `order` must not be empty; both built-in orders satisfy this.
    pub fn new(order: &'static [Section]) -> Self {
        debug_assert!(!order.is_empty(), "section order must not be empty");
        Self { order, position: 0 }
    }

    pub fn current(&self) -> Section {
        self.order[self.position]
    }

    pub fn order(&self) -> &'static [Section] {
        self.order
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.order.len()
    }

    /// Section the "Next" button would open, if any.
    pub fn upcoming(&self) -> Option<Section> {
        self.order.get(self.position + 1).copied()
    }

    /// Advances one step. Returns `false` (and stays put) on the last section.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Steps back one section. Returns `false` on the first section.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Jumps straight to `section` (a tab click). Sections outside this order are ignored.
    pub fn go_to(&mut self, section: Section) -> bool {
        match self.order.iter().position(|s| *s == section) {
            Some(position) => {
                self.position = position;
                true
            }
            None => false,
        }
    }

    /// "Back to Start".
    pub fn restart(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_resume_order_and_stops_at_end() {
        let mut cursor = SectionCursor::new(RESUME_SECTIONS);
        let mut seen = vec![cursor.current()];
        while cursor.next() {
            seen.push(cursor.current());
        }
        assert_eq!(seen, RESUME_SECTIONS);
        assert!(cursor.is_last());
        assert!(!cursor.next());
        assert_eq!(cursor.current(), Section::Projects);
        assert_eq!(cursor.upcoming(), None);
    }

    #[test]
    fn test_previous_is_noop_on_first() {
        let mut cursor = SectionCursor::new(PROFILE_SECTIONS);
        assert!(!cursor.previous());
        assert_eq!(cursor.current(), Section::Personal);
        assert_eq!(cursor.upcoming(), Some(Section::Experience));
    }

    #[test]
    fn test_go_to_and_restart() {
        let mut cursor = SectionCursor::new(RESUME_SECTIONS);
        assert!(cursor.go_to(Section::Skills));
        assert_eq!(cursor.current(), Section::Skills);
        assert!(cursor.previous());
        assert_eq!(cursor.current(), Section::Education);
        cursor.restart();
        assert_eq!(cursor.current(), Section::Personal);
    }

    #[test]
    fn test_go_to_unknown_section_is_ignored() {
        let mut cursor = SectionCursor::new(PROFILE_SECTIONS);
        cursor.next();
        assert!(!cursor.go_to(Section::Summary));
        assert_eq!(cursor.current(), Section::Experience);
    }
}
