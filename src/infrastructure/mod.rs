// src/infrastructure/mod.rs
pub mod config;
pub mod notes_api;

pub use config::Config;
pub use notes_api::NotesApi;
