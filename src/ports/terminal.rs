// src/ports/terminal.rs
use crate::constants::PREVIEW_WIDTH;
use crate::domain::{Note, NoteColor};
use crate::util::text::preview;
use tracing::instrument;

/// Plain-text rendering of notes for the terminal
#[derive(Debug)]
pub struct TerminalPresenter {
    preview_width: usize,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            preview_width: PREVIEW_WIDTH,
        }
    }

    pub fn with_preview_width(preview_width: usize) -> Self {
        Self { preview_width }
    }

    /// One line per note: id, pin marker, title and a content preview
    #[instrument(level = "trace", skip_all, fields(count = notes.len()))]
    pub fn render_list(&self, notes: &[&Note]) -> String {
        notes
            .iter()
            .map(|note| self.render_line(note))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_line(&self, note: &Note) -> String {
        let pin = if note.is_pinned() { "*" } else { " " };
        let body = preview(&note.content, self.preview_width);
        format!(
            "{:>6} {pin} {}  {}",
            note.id.as_deref().unwrap_or("-"),
            note.title,
            body
        )
    }

    /// Every field of a single note, one per line
    pub fn render_note(&self, note: &Note) -> String {
        let mut lines = vec![
            format!("id:       {}", note.id.as_deref().unwrap_or("-")),
            format!("title:    {}", note.title),
            format!("color:    {} ({})", note.color.name(), note.color.hex()),
        ];
        if let Some(category) = note.category {
            lines.push(format!("category: {category}"));
        }
        if note.is_pinned() {
            lines.push("pinned:   yes".to_string());
        }
        if let Some(created_at) = &note.created_at {
            lines.push(format!("created:  {created_at}"));
        }
        lines.push(String::new());
        lines.push(note.content.clone());
        lines.join("\n")
    }

    pub fn render_palette(&self) -> String {
        NoteColor::ALL
            .iter()
            .map(|color| format!("{:<11} {}", color.name(), color.hex()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}
