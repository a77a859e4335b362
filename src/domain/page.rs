// src/domain/page.rs
use crate::constants::{DEFAULT_PAGE_LIMIT, FIRST_PAGE};
use crate::domain::note::Note;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Note field the server sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    #[default]
    CreatedAt,
    Title,
    Content,
    Color,
    Category,
    IsPinned,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::CreatedAt => "createdAt",
            SortField::Title => "title",
            SortField::Content => "content",
            SortField::Color => "color",
            SortField::Category => "category",
            SortField::IsPinned => "isPinned",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "createdAt" | "created_at" | "created-at" => Ok(SortField::CreatedAt),
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            "color" => Ok(SortField::Color),
            "category" => Ok(SortField::Category),
            "isPinned" | "is_pinned" | "pinned" => Ok(SortField::IsPinned),
            other => Err(format!("Unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order: {other}")),
        }
    }
}

/// Parameters of a list request.
///
/// The infinite list ignores `page` and walks pages itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            search: String::new(),
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListParams {
    /// Page and limit are clamped to at least 1
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
            limit: limit.max(1),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort_by: SortField, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
            ..self.clone()
        }
    }

    /// Query string pairs in wire order; `search` only when non-empty
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(FIRST_PAGE).to_string()),
            ("limit", self.limit.max(1).to_string()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs
    }
}

/// One page of notes, normalized from whatever shape the server returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub page: u32,
    pub has_next_page: bool,
}

impl NotesPage {
    /// Build a page from the raw server items.
    ///
    /// A full page means another one may follow. Excess items are dropped so a
    /// page never exceeds `limit`.
    pub fn from_items(mut notes: Vec<Note>, page: u32, limit: u32) -> Self {
        let limit = limit.max(1) as usize;
        let has_next_page = notes.len() >= limit;
        notes.truncate(limit);
        Self {
            notes,
            page,
            has_next_page,
        }
    }

    pub fn next_page(&self) -> Option<u32> {
        self.page.checked_add(1).filter(|_| self.has_next_page)
    }
}

/// Pages of an infinite list, in fetch order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InfiniteNotes {
    pub pages: Vec<NotesPage>,
}

impl InfiniteNotes {
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.pages.iter().flat_map(|p| p.notes.iter())
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page().is_some()
    }

    /// Page number to request next, if the last page was full
    pub fn next_page(&self) -> Option<u32> {
        self.pages.last().and_then(NotesPage::next_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteColor;

    fn note(title: &str) -> Note {
        Note {
            id: None,
            created_at: None,
            title: title.to_string(),
            content: "content".to_string(),
            color: NoteColor::default(),
            category: None,
            is_pinned: None,
            name: None,
            avatar: None,
        }
    }

    #[test]
    fn given_default_params_when_building_query_then_omits_search() {
        let pairs = ListParams::default().query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("limit", "20".to_string()),
                ("sortBy", "createdAt".to_string()),
                ("order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn given_search_when_building_query_then_appends_search() {
        let pairs = ListParams::new(2, 5)
            .with_search("groceries")
            .with_sort(SortField::Title, SortOrder::Asc)
            .query_pairs();

        assert_eq!(pairs[0], ("page", "2".to_string()));
        assert_eq!(pairs[2], ("sortBy", "title".to_string()));
        assert_eq!(pairs[3], ("order", "asc".to_string()));
        assert_eq!(pairs[4], ("search", "groceries".to_string()));
    }

    #[test]
    fn given_zero_page_and_limit_when_creating_params_then_clamps_to_one() {
        let params = ListParams::new(0, 0);

        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn given_full_page_when_building_then_has_next_page() {
        let page = NotesPage::from_items(vec![note("a"), note("b")], 1, 2);

        assert!(page.has_next_page);
        assert_eq!(page.next_page(), Some(2));
    }

    #[test]
    fn given_short_page_when_building_then_no_next_page() {
        let page = NotesPage::from_items(vec![note("a")], 3, 2);

        assert!(!page.has_next_page);
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn given_full_last_representable_page_when_asking_next_then_none() {
        let page = NotesPage::from_items(vec![note("a")], u32::MAX, 1);

        assert!(page.has_next_page);
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn given_oversized_page_when_building_then_truncates_to_limit() {
        let page = NotesPage::from_items(vec![note("a"), note("b"), note("c")], 1, 2);

        assert_eq!(page.notes.len(), 2);
        assert!(page.has_next_page);
    }

    #[test]
    fn given_pages_when_flattening_infinite_notes_then_keeps_order() {
        let infinite = InfiniteNotes {
            pages: vec![
                NotesPage::from_items(vec![note("a"), note("b")], 1, 2),
                NotesPage::from_items(vec![note("c")], 2, 2),
            ],
        };

        let titles: Vec<_> = infinite.notes().map(|n| n.title.as_str()).collect();

        assert_eq!(titles, vec!["a", "b", "c"]);
        assert!(!infinite.has_next_page());
    }

    #[test]
    fn given_sort_field_names_when_parsing_then_accepts_wire_and_snake_case() {
        assert_eq!("createdAt".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert_eq!("created_at".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("size".parse::<SortField>().is_err());
    }
}
