// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod page;

pub use error::{FieldIssue, RequestError, ValidationError};
pub use note::{Category, Note, NoteColor, NoteDraft};
pub use page::{InfiniteNotes, ListParams, NotesPage, SortField, SortOrder};
