// src/application/notes_queries.rs
use crate::application::query_client::{QueryClient, QueryKey, QueryOptions};
use crate::application::NoteRepository;
use crate::constants::{
    CACHE_GC_TIME_SECS, FIRST_PAGE, INFINITE_STALE_TIME_SECS, LIST_STALE_TIME_SECS, NOTES_RESOURCE,
};
use crate::domain::{InfiniteNotes, ListParams, Note, NoteDraft, NotesPage, RequestError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Cached reads and cache-invalidating writes over a [`NoteRepository`]
pub struct NotesQueries<R: NoteRepository> {
    repository: Arc<R>,
    cache: QueryClient,
    list_options: QueryOptions,
    infinite_options: QueryOptions,
}

impl<R: NoteRepository + 'static> NotesQueries<R> {
    pub fn new(repository: R, cache: QueryClient) -> Self {
        Self::from_shared(Arc::new(repository), cache)
    }

    pub fn from_shared(repository: Arc<R>, cache: QueryClient) -> Self {
        let gc_time = Duration::from_secs(CACHE_GC_TIME_SECS);
        Self {
            repository,
            cache,
            list_options: QueryOptions::new(Duration::from_secs(LIST_STALE_TIME_SECS), gc_time),
            infinite_options: QueryOptions::new(
                Duration::from_secs(INFINITE_STALE_TIME_SECS),
                gc_time,
            ),
        }
    }

    pub fn with_options(mut self, list: QueryOptions, infinite: QueryOptions) -> Self {
        self.list_options = list;
        self.infinite_options = infinite;
        self
    }

    pub fn cache(&self) -> &QueryClient {
        &self.cache
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Root of every notes query key; invalidating it stales them all
    pub fn namespace() -> QueryKey {
        QueryKey::new([NOTES_RESOURCE])
    }

    pub fn list_key(params: &ListParams) -> QueryKey {
        QueryKey::new([
            NOTES_RESOURCE.to_string(),
            "list".to_string(),
            params.page.to_string(),
            params.limit.to_string(),
            params.search.clone(),
            params.sort_by.to_string(),
            params.order.to_string(),
        ])
    }

    /// Page is not part of the key: one entry holds every loaded page
    pub fn infinite_key(params: &ListParams) -> QueryKey {
        QueryKey::new([
            NOTES_RESOURCE.to_string(),
            "infinite".to_string(),
            params.limit.to_string(),
            params.search.clone(),
            params.sort_by.to_string(),
            params.order.to_string(),
        ])
    }

    /// One page of notes, served from cache while fresh
    #[instrument(level = "debug", skip(self))]
    pub async fn notes(&self, params: &ListParams) -> Result<NotesPage, RequestError> {
        let repository = Arc::clone(&self.repository);
        let request = params.clone();
        self.cache
            .fetch_or_cached(Self::list_key(params), self.list_options, move || async move {
                repository.get_notes(&request).await
            })
            .await
    }

    /// All pages loaded so far for an infinite list, starting with page 1.
    ///
    /// A stale result is rebuilt by refetching every loaded page in order.
    #[instrument(level = "debug", skip(self))]
    pub async fn infinite_notes(&self, params: &ListParams) -> Result<InfiniteNotes, RequestError> {
        let key = Self::infinite_key(params);
        let loaded_pages = self
            .cache
            .get::<InfiniteNotes>(&key)
            .map_or(1, |pages| pages.pages.len().max(1));

        let repository = Arc::clone(&self.repository);
        let request = params.clone();
        self.cache
            .fetch_or_cached(key, self.infinite_options, move || async move {
                load_pages(repository, request, loaded_pages).await
            })
            .await
    }

    /// Append the page after the last loaded one, if the last page was full.
    ///
    /// Without a next page the current pages are returned unchanged.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_next_page(&self, params: &ListParams) -> Result<InfiniteNotes, RequestError> {
        let key = Self::infinite_key(params);
        // Read before `current`: an invalidation after this point keeps the
        // appended result stale.
        let seen = self.cache.generation(&key);
        let current = self.infinite_notes(params).await?;
        let Some(next) = current.next_page() else {
            return Ok(current);
        };

        let repository = Arc::clone(&self.repository);
        let request = params.at_page(next);
        self.cache
            .fetch_since(key, self.infinite_options, seen, move || async move {
                let page = repository.get_notes(&request).await?;
                let mut pages = current;
                pages.pages.push(page);
                Ok(pages)
            })
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note, RequestError> {
        let note = self
            .repository
            .create_note(draft)
            .await
            .inspect_err(|e| warn!(%e, "Error creating note"))?;
        info!(id = ?note.id, "Created note");
        self.invalidate_notes();
        Ok(note)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn update_note(&self, id: &str, draft: &NoteDraft) -> Result<Note, RequestError> {
        let note = self
            .repository
            .update_note(id, draft)
            .await
            .inspect_err(|e| warn!(%e, "Error updating note"))?;
        info!(id, "Updated note");
        self.invalidate_notes();
        Ok(note)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_note(&self, id: &str) -> Result<bool, RequestError> {
        let deleted = self
            .repository
            .delete_note(id)
            .await
            .inspect_err(|e| warn!(%e, "Error deleting note"))?;
        info!(id, "Deleted note");
        self.invalidate_notes();
        Ok(deleted)
    }

    fn invalidate_notes(&self) {
        self.cache.invalidate(&Self::namespace());
    }
}

/// Fetch up to `count` pages from the first one, stopping at the last page
async fn load_pages<R: NoteRepository>(
    repository: Arc<R>,
    params: ListParams,
    count: usize,
) -> Result<InfiniteNotes, RequestError> {
    let mut infinite = InfiniteNotes::default();
    let mut page = FIRST_PAGE;
    while infinite.pages.len() < count {
        let fetched = repository.get_notes(&params.at_page(page)).await?;
        let next = fetched.next_page();
        infinite.pages.push(fetched);
        match next {
            Some(n) => page = n,
            None => break,
        }
    }
    Ok(infinite)
}
