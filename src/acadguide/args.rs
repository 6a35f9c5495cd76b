use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "acadguide")]
#[command(about = "Dual-tier data store for the AcadGuide academic portal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "ACADGUIDE_HOME")]
    pub data_dir: Option<PathBuf>,

    /// Disable the SQLite mirror (primary tier only)
    #[arg(long, global = true)]
    pub no_mirror: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all records in a collection
    #[command(alias = "ls")]
    List {
        /// Collection name (departments, courses, lessons, ...)
        collection: String,
    },

    /// Show a single record by id
    Get {
        collection: String,
        id: String,
    },

    /// Add a record (JSON object with an "id" field)
    Add {
        collection: String,
        json: String,
    },

    /// Update a record by its embedded id
    Update {
        collection: String,
        json: String,
    },

    /// Delete a record by id
    #[command(alias = "rm")]
    Delete {
        collection: String,
        id: String,
    },

    /// Search departments, courses, lessons and events
    Search {
        query: String,
    },

    /// Manage feedback submissions
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },

    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },

    /// List notifications, optionally marking one as read
    Notifications {
        /// Mark the notification with this id as read
        #[arg(long)]
        mark_read: Option<String>,
    },

    /// Show the five most recent updates
    Updates,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommands {
    /// List all feedback
    List,

    /// Submit new feedback
    Add {
        /// concern, improvement, praise, evaluation or other
        #[arg(long, default_value = "other")]
        kind: String,
        subject: String,
        message: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        course: Option<String>,
    },

    /// Set the status of a feedback item
    Status {
        id: String,
        /// pending, reviewed or addressed
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommands {
    /// List all bookmarks
    List,

    /// Bookmark an item
    Add {
        id: String,
        /// lesson, event, flashcard or quiz
        kind: String,
        title: String,
    },

    /// Remove a bookmark
    Remove {
        id: String,
        kind: String,
    },
}
