// src/cli/args.rs
use crate::domain::{Category, NoteColor, SortField, SortOrder};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Notes service base URL, overrides the config file
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Search and sort options shared by list and browse
#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub struct QueryArgs {
    /// Notes per page (defaults to config)
    #[arg(short, long, value_name = "N")]
    pub limit: Option<u32>,

    /// Only notes whose title or content contain this term
    #[arg(short, long, value_name = "SEARCH")]
    pub search: Option<String>,

    /// Field to sort by, e.g. createdAt or title (defaults to config)
    #[arg(long, value_name = "FIELD")]
    pub sort_by: Option<SortField>,

    /// asc or desc (defaults to config)
    #[arg(long, value_name = "ORDER")]
    pub order: Option<SortOrder>,
}

/// Editable note fields shared by create and update
#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub struct NoteArgs {
    #[arg(short, long)]
    pub title: String,

    #[arg(short = 'b', long)]
    pub content: String,

    /// Palette hex value or name, e.g. "#FFF3BF" or softYellow
    #[arg(long, default_value = "lightGray")]
    pub color: NoteColor,

    /// work, personal or ideas
    #[arg(long)]
    pub category: Option<Category>,

    /// Pin the note
    #[arg(long)]
    pub pinned: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List one page of notes
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[command(flatten)]
        query: QueryArgs,

        /// Output the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk pages until the last one (or --max-pages) and list them together
    Browse {
        #[command(flatten)]
        query: QueryArgs,

        /// Stop after this many pages
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,

        /// Output the notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    Create {
        #[command(flatten)]
        note: NoteArgs,

        /// Output the created note as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the fields of an existing note
    Update {
        /// Note ID to update
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        #[command(flatten)]
        note: NoteArgs,

        /// Output the updated note as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Show the color palette
    Colors,
}
