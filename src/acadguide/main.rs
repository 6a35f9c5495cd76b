use acadguide::error::{Result, StoreError};
use acadguide::model::{BookmarkKind, Collection, FeedbackKind, FeedbackStatus, NewFeedback};
use acadguide::store::FileBackend;
use acadguide::{DataStore, Mirror};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;

mod args;
use args::{BookmarkCommands, Cli, Commands, FeedbackCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_spec = if cli.verbose { "debug" } else { "warn" };
    // The handle must stay alive until exit or buffered lines are lost.
    // A failed init is not worth dying over.
    let _logger = flexi_logger::Logger::try_with_env_or_str(log_spec)
        .and_then(|logger| logger.start())
        .ok();

    let store = open_store(&cli)?;

    let result = match cli.command {
        Commands::List { collection } => {
            let collection = parse_collection(&collection)?;
            print_json(&store.get_data(collection))
        }
        Commands::Get { collection, id } => {
            let collection = parse_collection(&collection)?;
            match store.get_item_by_id(collection, &id) {
                Some(record) => print_json(&record),
                None => Err(StoreError::Backend(format!("{id} not found in {collection}"))),
            }
        }
        Commands::Add { collection, json } => {
            let collection = parse_collection(&collection)?;
            let item = serde_json::from_str(&json)?;
            match store.add_item(collection, item) {
                Some(record) => print_json(&record),
                None => Err(StoreError::Backend(format!("invalid {collection} record"))),
            }
        }
        Commands::Update { collection, json } => {
            let collection = parse_collection(&collection)?;
            let item = serde_json::from_str(&json)?;
            match store.update_item(collection, item) {
                Some(record) => print_json(&record),
                None => Err(StoreError::Backend(format!("invalid {collection} record"))),
            }
        }
        Commands::Delete { collection, id } => {
            let collection = parse_collection(&collection)?;
            store.delete_item(collection, &id);
            Ok(())
        }
        Commands::Search { query } => print_json(&store.search(&query)),
        Commands::Feedback { command } => run_feedback(&store, command),
        Commands::Bookmark { command } => run_bookmark(&store, command),
        Commands::Notifications { mark_read } => {
            if let Some(id) = mark_read {
                store.mark_notification_as_read(&id);
            }
            print_json(&store.get_notifications())
        }
        Commands::Updates => print_json(&store.recent_updates()),
    };

    // Drain queued mirror writes before the process exits.
    if let Some(mirror) = store.mirror() {
        mirror.flush();
    }
    result
}

fn run_feedback(store: &DataStore<FileBackend>, command: FeedbackCommands) -> Result<()> {
    match command {
        FeedbackCommands::List => print_json(&store.get_feedback()),
        FeedbackCommands::Add {
            kind,
            subject,
            message,
            department,
            course,
        } => {
            let kind: FeedbackKind = kind.parse().map_err(StoreError::Backend)?;
            let created = store.add_feedback(NewFeedback {
                kind,
                subject,
                message,
                department_id: department,
                course_id: course,
            });
            match created {
                Some(feedback) => print_json(&feedback),
                None => Err(StoreError::Backend("feedback rejected".to_string())),
            }
        }
        FeedbackCommands::Status { id, status } => {
            let status: FeedbackStatus = status.parse().map_err(StoreError::Backend)?;
            store.update_feedback_status(&id, status);
            Ok(())
        }
    }
}

fn run_bookmark(store: &DataStore<FileBackend>, command: BookmarkCommands) -> Result<()> {
    match command {
        BookmarkCommands::List => print_json(&store.get_bookmarks()),
        BookmarkCommands::Add { id, kind, title } => {
            let kind: BookmarkKind = kind.parse().map_err(StoreError::Backend)?;
            store.add_bookmark(&id, kind, &title);
            Ok(())
        }
        BookmarkCommands::Remove { id, kind } => {
            let kind: BookmarkKind = kind.parse().map_err(StoreError::Backend)?;
            store.remove_bookmark(&id, kind);
            Ok(())
        }
    }
}

fn open_store(cli: &Cli) -> Result<DataStore<FileBackend>> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "adebert", "acadguide")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".acadguide")),
    };

    let backend = FileBackend::new(data_dir.join("data"));
    if cli.no_mirror {
        return Ok(DataStore::new(backend));
    }

    let mirror_path = data_dir.join("mirror.db");
    if let Some(parent) = mirror_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // A failed mirror open degrades to primary-only, matching the library's
    // best-effort contract.
    match Mirror::open(&mirror_path) {
        Ok(mirror) => Ok(DataStore::with_mirror(backend, mirror)),
        Err(err) => {
            log::warn!("mirror unavailable at {}: {err}", mirror_path.display());
            Ok(DataStore::new(backend))
        }
    }
}

fn parse_collection(name: &str) -> Result<Collection> {
    name.parse().map_err(StoreError::Backend)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
