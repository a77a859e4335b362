// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::{NoteRepository, NotesQueries, QueryClient};
use crate::cli::args::{Args, Command, NoteArgs, QueryArgs};
use crate::domain::{ListParams, Note, NoteDraft};
use crate::infrastructure::config::ListDefaults;
use crate::infrastructure::{Config, NotesApi};
use crate::ports::TerminalPresenter;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notekeep with arguments");

    // Initialize infrastructure
    let config = Config::resolve(args.config.as_deref())?;
    let base_url = args.base_url.as_deref().unwrap_or(&config.api.base_url);
    let api = NotesApi::new(base_url)?;

    // Initialize application
    let cache = QueryClient::new(config.cache.list_options());
    let queries = NotesQueries::new(api, cache)
        .with_options(config.cache.list_options(), config.cache.infinite_options());

    // Initialize presentation
    let presenter = TerminalPresenter::new();

    execute(args.command, &queries, &config.defaults, &presenter).await
}

/// Run one subcommand against any repository, printing to stdout
pub async fn execute<R: NoteRepository + 'static>(
    command: Command,
    queries: &NotesQueries<R>,
    defaults: &ListDefaults,
    presenter: &TerminalPresenter,
) -> Result<()> {
    match command {
        Command::List { page, query, json } => {
            let params = list_params(&query, defaults).at_page(page);
            info!(page = params.page, "Listing notes");
            let result = queries.notes(&params).await.context("Failed to list notes")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let notes: Vec<&Note> = result.notes.iter().collect();
                println!("{}", presenter.render_list(&notes));
                if result.has_next_page {
                    println!("-- more on page {}", result.page + 1);
                }
            }
        }
        Command::Browse {
            query,
            max_pages,
            json,
        } => {
            let params = list_params(&query, defaults);
            let mut pages = queries
                .infinite_notes(&params)
                .await
                .context("Failed to load first page")?;
            while pages.has_next_page() && max_pages.map_or(true, |max| pages.pages.len() < max) {
                pages = queries
                    .fetch_next_page(&params)
                    .await
                    .context("Failed to load next page")?;
            }
            info!(pages = pages.pages.len(), "Browsed notes");

            let notes: Vec<&Note> = pages.notes().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else {
                println!("{}", presenter.render_list(&notes));
            }
        }
        Command::Create { note, json } => {
            let draft = note_draft(note)?;
            let created = queries
                .create_note(&draft)
                .await
                .context("Failed to create note")?;
            print_note(&created, json, presenter)?;
        }
        Command::Update {
            note_id,
            note,
            json,
        } => {
            let draft = note_draft(note)?;
            let updated = queries
                .update_note(&note_id, &draft)
                .await
                .with_context(|| format!("Failed to update note {note_id}"))?;
            print_note(&updated, json, presenter)?;
        }
        Command::Delete { note_id } => {
            queries
                .delete_note(&note_id)
                .await
                .with_context(|| format!("Failed to delete note {note_id}"))?;
            println!("Deleted note {note_id}");
        }
        Command::Colors => {
            println!("{}", presenter.render_palette());
        }
    }

    Ok(())
}

/// CLI flags over config defaults
pub fn list_params(query: &QueryArgs, defaults: &ListDefaults) -> ListParams {
    ListParams::new(1, query.limit.unwrap_or(defaults.limit))
        .with_search(query.search.clone().unwrap_or_default())
        .with_sort(
            query.sort_by.unwrap_or(defaults.sort_by),
            query.order.unwrap_or(defaults.order),
        )
}

/// Build and validate the draft before anything is sent
pub fn note_draft(args: NoteArgs) -> Result<NoteDraft> {
    let mut draft = NoteDraft::new(args.title, args.content).with_color(args.color);
    if let Some(category) = args.category {
        draft = draft.with_category(category);
    }
    if args.pinned {
        draft = draft.pinned(true);
    }
    draft.validate()?;
    Ok(draft)
}

fn print_note(note: &Note, json: bool, presenter: &TerminalPresenter) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
    } else {
        println!("{}", presenter.render_note(note));
    }
    Ok(())
}
