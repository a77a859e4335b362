use clap::Parser;
use notekeep::cli::args::{Args, Command};
use notekeep::domain::{Category, NoteColor, SortField, SortOrder};

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notekeep", "--base-url", "http://localhost"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_list_command_without_flags_when_parsing_then_uses_first_page() {
    // Arrange
    let args = vec!["notekeep", "list"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List { page, query, json } => {
            assert_eq!(page, 1);
            assert_eq!(query.limit, None);
            assert_eq!(query.search, None);
            assert!(!json);
        }
        _ => panic!("Expected List command"),
    }
    assert_eq!(parsed.config, None);
    assert_eq!(parsed.base_url, None);
}

#[test]
fn given_list_flags_when_parsing_then_parses_sort_and_search() {
    // Arrange
    let args = vec![
        "notekeep", "list", "--page", "3", "--limit", "10", "--search", "milk", "--sort-by",
        "title", "--order", "asc", "--json",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List { page, query, json } => {
            assert_eq!(page, 3);
            assert_eq!(query.limit, Some(10));
            assert_eq!(query.search.as_deref(), Some("milk"));
            assert_eq!(query.sort_by, Some(SortField::Title));
            assert_eq!(query.order, Some(SortOrder::Asc));
            assert!(json);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn given_unknown_sort_field_when_parsing_then_fails() {
    let args = vec!["notekeep", "list", "--sort-by", "size"];

    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn given_create_command_when_parsing_then_builds_note_args() {
    // Arrange
    let args = vec![
        "notekeep",
        "create",
        "--title",
        "Hi",
        "--content",
        "World!",
        "--color",
        "#FFF3BF",
        "--category",
        "ideas",
        "--pinned",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Create { note, json } => {
            assert_eq!(note.title, "Hi");
            assert_eq!(note.content, "World!");
            assert_eq!(note.color, NoteColor::SoftYellow);
            assert_eq!(note.category, Some(Category::Ideas));
            assert!(note.pinned);
            assert!(!json);
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn given_create_without_color_when_parsing_then_defaults_to_light_gray() {
    let args = vec!["notekeep", "create", "-t", "Hi", "-b", "World!"];

    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::Create { note, .. } => assert_eq!(note.color, NoteColor::LightGray),
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn given_color_outside_palette_when_parsing_then_fails() {
    let args = vec!["notekeep", "create", "-t", "Hi", "-b", "World!", "--color", "#000000"];

    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn given_update_command_when_parsing_then_takes_note_id() {
    // Arrange
    let args = vec![
        "notekeep", "update", "abc", "--title", "New", "--content", "Content", "--color",
        "softBlue",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Update { note_id, note, .. } => {
            assert_eq!(note_id, "abc");
            assert_eq!(note.title, "New");
            assert_eq!(note.color, NoteColor::SoftBlue);
        }
        _ => panic!("Expected Update command"),
    }
}

#[test]
fn given_delete_command_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["notekeep", "delete", "42"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Delete { note_id } => assert_eq!(note_id, "42"),
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn given_browse_command_when_parsing_then_reads_max_pages() {
    let args = vec!["notekeep", "browse", "--limit", "5", "--max-pages", "2"];

    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::Browse {
            query, max_pages, ..
        } => {
            assert_eq!(query.limit, Some(5));
            assert_eq!(max_pages, Some(2));
        }
        _ => panic!("Expected Browse command"),
    }
}

#[test]
fn given_verbose_flag_when_parsing_then_increments_count() {
    // Arrange
    let args = vec!["notekeep", "-vv", "colors"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(parsed.verbose, 2);
    assert!(matches!(parsed.command, Command::Colors));
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_succeeds() {
    // Arrange - global flags work anywhere when marked as global
    let args = vec![
        "notekeep",
        "delete",
        "--config",
        "/path/to/config.toml",
        "--base-url",
        "http://localhost:3000",
        "42",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(
        parsed.config,
        Some(std::path::PathBuf::from("/path/to/config.toml"))
    );
    assert_eq!(parsed.base_url.as_deref(), Some("http://localhost:3000"));
}
