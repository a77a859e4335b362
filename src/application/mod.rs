// src/application/mod.rs
pub mod notes_queries;
pub mod query_client;
pub mod repository;

pub use notes_queries::NotesQueries;
pub use query_client::{QueryClient, QueryKey, QueryOptions, QueryStatus};
pub use repository::NoteRepository;
