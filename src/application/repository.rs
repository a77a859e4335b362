// src/application/repository.rs
use crate::domain::{ListParams, Note, NoteDraft, NotesPage, RequestError};
use async_trait::async_trait;

/// CRUD access to the notes service.
///
/// One attempt per call. Implementations surface every failure as a
/// [`RequestError`] and never retry.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn get_notes(&self, params: &ListParams) -> Result<NotesPage, RequestError>;

    /// Server assigns `id` and `createdAt`
    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, RequestError>;

    /// Full replacement of the note's mutable fields
    async fn update_note(&self, id: &str, draft: &NoteDraft) -> Result<Note, RequestError>;

    async fn delete_note(&self, id: &str) -> Result<bool, RequestError>;
}
