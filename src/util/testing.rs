// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::NoteRepository;
use crate::domain::{
    ListParams, Note, NoteColor, NoteDraft, NotesPage, RequestError, SortField, SortOrder,
};

struct MockState {
    notes: Vec<Note>,
    next_id: u64,
    list_failure: Option<u16>,
}

/// In-memory notes server for testing code that depends on NoteRepository
///
/// Behaves like the remote service: assigns ids and timestamps, filters by
/// search term, sorts and paginates, and answers unknown ids with 404.
/// Counts every call so tests can assert how many requests were made.
///
/// # Examples
///
/// ```
/// use notekeep::util::testing::MockNoteRepository;
/// use notekeep::domain::NoteDraft;
///
/// let mock = MockNoteRepository::builder()
///     .with_note(NoteDraft::new("Groceries", "Milk and eggs"))
///     .with_latency(std::time::Duration::from_millis(5))
///     .build();
/// assert_eq!(mock.len(), 1);
/// ```
pub struct MockNoteRepository {
    state: Mutex<MockState>,
    latency: Option<Duration>,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of get_notes calls served so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of create, update and delete calls served so far
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent get_notes calls fail with `status`, or succeed again with None
    pub fn fail_lists_with(&self, status: Option<u16>) {
        self.state().list_failure = status;
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn insert_note(state: &mut MockState, draft: &NoteDraft) -> Note {
    state.next_id += 1;
    let n = state.next_id;
    let note = Note {
        id: Some(n.to_string()),
        created_at: Some(format!(
            "2025-06-15T{:02}:{:02}:{:02}.000Z",
            (n / 3600) % 24,
            (n / 60) % 60,
            n % 60
        )),
        title: draft.title.clone(),
        content: draft.content.clone(),
        color: draft.color,
        category: draft.category,
        is_pinned: draft.is_pinned,
        name: None,
        avatar: None,
    };
    state.notes.push(note.clone());
    note
}

fn sort_key(note: &Note, field: SortField) -> String {
    match field {
        SortField::Id => format!("{:0>20}", note.id.as_deref().unwrap_or_default()),
        SortField::CreatedAt => note.created_at.clone().unwrap_or_default(),
        SortField::Title => note.title.to_lowercase(),
        SortField::Content => note.content.to_lowercase(),
        SortField::Color => note.color.hex().to_string(),
        SortField::Category => note.category.map(|c| c.as_str()).unwrap_or("").to_string(),
        SortField::IsPinned => note.is_pinned().to_string(),
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn get_notes(&self, params: &ListParams) -> Result<NotesPage, RequestError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let state = self.state();
        if let Some(status) = state.list_failure {
            return Err(RequestError::Status(status));
        }

        let needle = params.search.to_lowercase();
        let mut matching: Vec<Note> = state
            .notes
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matching.sort_by_key(|n| sort_key(n, params.sort_by));
        if params.order == SortOrder::Desc {
            matching.reverse();
        }

        let limit = params.limit.max(1) as usize;
        let skip = (params.page.max(1) as usize - 1) * limit;
        let items = matching.into_iter().skip(skip).take(limit).collect();
        Ok(NotesPage::from_items(items, params.page, params.limit))
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, RequestError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Ok(insert_note(&mut self.state(), draft))
    }

    async fn update_note(&self, id: &str, draft: &NoteDraft) -> Result<Note, RequestError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let mut state = self.state();
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id.as_deref() == Some(id))
            .ok_or(RequestError::Status(404))?;
        note.title = draft.title.clone();
        note.content = draft.content.clone();
        note.color = draft.color;
        note.category = draft.category;
        note.is_pinned = draft.is_pinned;
        Ok(note.clone())
    }

    async fn delete_note(&self, id: &str) -> Result<bool, RequestError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let mut state = self.state();
        let position = state
            .notes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .ok_or(RequestError::Status(404))?;
        state.notes.remove(position);
        Ok(true)
    }
}

/// Builder for MockNoteRepository
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteRepositoryBuilder {
    drafts: Vec<NoteDraft>,
    latency: Option<Duration>,
    list_failure: Option<u16>,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            drafts: vec![],
            latency: None,
            list_failure: None,
        }
    }

    /// Seed a note; ids are assigned in insertion order starting at "1"
    pub fn with_note(mut self, draft: NoteDraft) -> Self {
        self.drafts.push(draft);
        self
    }

    /// Seed `count` notes titled "Note 1", "Note 2", ...
    pub fn with_notes(mut self, count: usize) -> Self {
        for i in 1..=count {
            self.drafts.push(
                NoteDraft::new(format!("Note {i}"), format!("Content of note {i}"))
                    .with_color(NoteColor::ALL[i % NoteColor::ALL.len()]),
            );
        }
        self
    }

    /// Delay every call, so concurrent callers overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail every get_notes call with the given HTTP status
    pub fn with_list_failure(mut self, status: u16) -> Self {
        self.list_failure = Some(status);
        self
    }

    pub fn build(self) -> MockNoteRepository {
        let mut state = MockState {
            notes: vec![],
            next_id: 0,
            list_failure: self.list_failure,
        };
        for draft in &self.drafts {
            insert_note(&mut state, draft);
        }
        MockNoteRepository {
            state: Mutex::new(state),
            latency: self.latency,
            list_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "hyper_util", "reqwest", "rustls", "mio", "wiremock"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    #[tokio::test]
    async fn given_seeded_notes_when_listing_then_paginates() {
        let mock = MockNoteRepository::builder().with_notes(5).build();
        let params = ListParams::new(2, 2).with_sort(SortField::Title, SortOrder::Asc);

        let page = mock.get_notes(&params).await.expect("List should succeed");

        let titles: Vec<_> = page.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Note 3", "Note 4"]);
        assert!(page.has_next_page);
        assert_eq!(mock.list_calls(), 1);
    }

    #[tokio::test]
    async fn given_search_term_when_listing_then_filters_title_and_content() {
        let mock = MockNoteRepository::builder()
            .with_note(NoteDraft::new("Groceries", "Milk and eggs"))
            .with_note(NoteDraft::new("Ideas", "Buy more milk"))
            .with_note(NoteDraft::new("Work", "Quarterly report"))
            .build();

        let page = mock
            .get_notes(&ListParams::default().with_search("MILK"))
            .await
            .expect("List should succeed");

        assert_eq!(page.notes.len(), 2);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn given_created_note_when_listing_newest_first_then_it_leads() {
        let mock = MockNoteRepository::builder().with_notes(3).build();

        let created = mock
            .create_note(&NoteDraft::new("Hi", "World!"))
            .await
            .expect("Create should succeed");
        let page = mock
            .get_notes(&ListParams::default())
            .await
            .expect("List should succeed");

        assert_eq!(created.id.as_deref(), Some("4"));
        assert!(created.created_at.is_some());
        assert_eq!(page.notes[0].id, created.id);
    }

    #[tokio::test]
    async fn given_unknown_id_when_updating_or_deleting_then_returns_404() {
        let mock = MockNoteRepository::builder().build();

        let update = mock.update_note("abc", &NoteDraft::new("New", "Content")).await;
        let delete = mock.delete_note("abc").await;

        assert_eq!(update.unwrap_err().status(), Some(404));
        assert_eq!(delete.unwrap_err().status(), Some(404));
        assert_eq!(mock.mutation_calls(), 2);
    }

    #[tokio::test]
    async fn given_list_failure_configured_when_listing_then_returns_status() {
        let mock = MockNoteRepository::builder().with_list_failure(500).build();

        let result = mock.get_notes(&ListParams::default()).await;
        assert_eq!(result.unwrap_err().status(), Some(500));

        mock.fail_lists_with(None);
        assert!(mock.get_notes(&ListParams::default()).await.is_ok());
    }
}
