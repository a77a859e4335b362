// src/domain/note.rs
use crate::constants::{CONTENT_MIN_CHARS, TITLE_MIN_CHARS};
use crate::domain::error::{FieldIssue, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Background colour of a note, limited to the fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteColor {
    #[default]
    #[serde(rename = "#F8F9FA")]
    LightGray,
    #[serde(rename = "#FFF3BF")]
    SoftYellow,
    #[serde(rename = "#D3F9D8")]
    SoftGreen,
    #[serde(rename = "#FFE3E3")]
    SoftRed,
    #[serde(rename = "#E7F5FF")]
    SoftBlue,
    #[serde(rename = "#F3F0F0")]
    SoftPurple,
}

impl NoteColor {
    pub const ALL: [NoteColor; 6] = [
        NoteColor::LightGray,
        NoteColor::SoftYellow,
        NoteColor::SoftGreen,
        NoteColor::SoftRed,
        NoteColor::SoftBlue,
        NoteColor::SoftPurple,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            NoteColor::LightGray => "#F8F9FA",
            NoteColor::SoftYellow => "#FFF3BF",
            NoteColor::SoftGreen => "#D3F9D8",
            NoteColor::SoftRed => "#FFE3E3",
            NoteColor::SoftBlue => "#E7F5FF",
            NoteColor::SoftPurple => "#F3F0F0",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NoteColor::LightGray => "lightGray",
            NoteColor::SoftYellow => "softYellow",
            NoteColor::SoftGreen => "softGreen",
            NoteColor::SoftRed => "softRed",
            NoteColor::SoftBlue => "softBlue",
            NoteColor::SoftPurple => "softPurple",
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl FromStr for NoteColor {
    type Err = String;

    /// Accepts a palette hex value (any case) or a palette name such as
    /// `softYellow`, `soft-yellow` or `soft_yellow`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let normalized: String = wanted
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        NoteColor::ALL
            .into_iter()
            .find(|color| {
                color.hex().eq_ignore_ascii_case(wanted) || color.name().to_lowercase() == normalized
            })
            .ok_or_else(|| format!("Unknown color: {wanted}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Ideas,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Ideas => "ideas",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "ideas" => Ok(Category::Ideas),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// A note as stored by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub color: NoteColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    // Echoed back by the mock service, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Note {
    pub fn is_pinned(&self) -> bool {
        self.is_pinned.unwrap_or(false)
    }
}

/// Servers disagree on whether ids are strings or numbers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

/// Fields a client may set when creating or updating a note
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            color: NoteColor::default(),
            category: None,
            is_pinned: None,
        }
    }

    pub fn with_color(mut self, color: NoteColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = Some(pinned);
        self
    }

    /// Check the form rules a note must satisfy before submission.
    ///
    /// All failing fields are reported, not just the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.title.chars().count() < TITLE_MIN_CHARS {
            issues.push(FieldIssue {
                field: "title",
                message: format!("Title must be at least {TITLE_MIN_CHARS} characters."),
            });
        }
        if self.content.chars().count() < CONTENT_MIN_CHARS {
            issues.push(FieldIssue {
                field: "content",
                message: format!("Content must be at least {CONTENT_MIN_CHARS} characters."),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            color: note.color,
            category: note.category,
            is_pinned: note.is_pinned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_hex_or_name_when_parsing_color_then_resolves_palette_entry() {
        assert_eq!("#FFF3BF".parse::<NoteColor>(), Ok(NoteColor::SoftYellow));
        assert_eq!("#fff3bf".parse::<NoteColor>(), Ok(NoteColor::SoftYellow));
        assert_eq!("softBlue".parse::<NoteColor>(), Ok(NoteColor::SoftBlue));
        assert_eq!("soft-red".parse::<NoteColor>(), Ok(NoteColor::SoftRed));
        assert!("#000000".parse::<NoteColor>().is_err());
    }

    #[test]
    fn given_palette_when_listing_then_has_six_distinct_colors() {
        let mut hexes: Vec<_> = NoteColor::ALL.iter().map(|c| c.hex()).collect();
        hexes.sort();
        hexes.dedup();
        assert_eq!(hexes.len(), 6);
    }

    #[test]
    fn given_server_json_with_numeric_id_when_deserializing_then_id_is_string() {
        let json = r##"{"id": 7, "title": "Hi", "content": "World!", "color": "#FFF3BF"}"##;

        let note: Note = serde_json::from_str(json).unwrap();

        assert_eq!(note.id.as_deref(), Some("7"));
        assert_eq!(note.color, NoteColor::SoftYellow);
        assert!(!note.is_pinned());
    }

    #[test]
    fn given_server_json_without_color_when_deserializing_then_uses_default_color() {
        let json = r#"{"id": "1", "createdAt": "2025-06-15T10:00:00.000Z", "title": "Hi", "content": "World!"}"#;

        let note: Note = serde_json::from_str(json).unwrap();

        assert_eq!(note.color, NoteColor::LightGray);
        assert_eq!(note.created_at.as_deref(), Some("2025-06-15T10:00:00.000Z"));
    }

    #[test]
    fn given_server_json_with_unknown_color_when_deserializing_then_fails() {
        let json = r##"{"title": "Hi", "content": "World!", "color": "#123456"}"##;

        assert!(serde_json::from_str::<Note>(json).is_err());
    }

    #[test]
    fn given_draft_when_serializing_then_uses_camel_case_and_skips_unset_fields() {
        let draft = NoteDraft::new("Hi", "World!").with_color(NoteColor::SoftYellow);

        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"title": "Hi", "content": "World!", "color": "#FFF3BF"})
        );
    }

    #[test]
    fn given_pinned_draft_when_serializing_then_writes_is_pinned() {
        let draft = NoteDraft::new("Hi", "World!")
            .with_category(Category::Ideas)
            .pinned(true);

        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["isPinned"], true);
        assert_eq!(json["category"], "ideas");
    }

    #[test]
    fn given_valid_draft_when_validating_then_ok() {
        assert!(NoteDraft::new("Hi", "World").validate().is_ok());
    }

    #[test]
    fn given_short_title_when_validating_then_reports_title() {
        let err = NoteDraft::new("H", "World!").validate().unwrap_err();

        assert_eq!(err.issues.len(), 1);
        assert!(err.has_issue("title"));
        assert_eq!(err.issues[0].message, "Title must be at least 2 characters.");
    }

    #[test]
    fn given_short_title_and_content_when_validating_then_reports_both() {
        let err = NoteDraft::new("", "abcd").validate().unwrap_err();

        assert!(err.has_issue("title"));
        assert!(err.has_issue("content"));
    }

    #[test]
    fn given_multibyte_title_when_validating_then_counts_characters() {
        assert!(NoteDraft::new("日本", "ünïcödé").validate().is_ok());
    }

    #[test]
    fn given_note_when_converting_to_draft_then_keeps_mutable_fields() {
        let note = Note {
            id: Some("1".to_string()),
            created_at: None,
            title: "Title".to_string(),
            content: "Content".to_string(),
            color: NoteColor::SoftGreen,
            category: Some(Category::Work),
            is_pinned: Some(true),
            name: None,
            avatar: None,
        };

        let draft = NoteDraft::from(&note);

        assert_eq!(draft.color, NoteColor::SoftGreen);
        assert_eq!(draft.category, Some(Category::Work));
        assert_eq!(draft.is_pinned, Some(true));
    }
}
