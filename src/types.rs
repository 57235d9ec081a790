//! Shared result type and the CLI command tree.
use clap::{Args, Subcommand};

use crate::{OrganizerError, TodoFilter};

/// A specialized Result type for organizer operations.
pub type Result<T> = std::result::Result<T, OrganizerError>;

/// Available subcommands for the organizer application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the month grid, or the events of a single day
    Calendar {
        /// Month to show (YYYY-MM), defaults to the current month
        #[clap(short, long)]
        month: Option<String>,

        /// List the events of this day (YYYY-MM-DD) instead of the grid
        #[clap(short, long, conflicts_with = "month")]
        day: Option<String>,

        /// Step one month back from the selected month
        #[clap(long, conflicts_with = "next")]
        prev: bool,

        /// Step one month forward from the selected month
        #[clap(long)]
        next: bool,
    },

    /// Calendar event operations
    #[clap(subcommand)]
    Event(EventCommand),

    /// Todo operations
    #[clap(subcommand)]
    Todo(TodoCommand),

    /// Note operations
    #[clap(subcommand)]
    Note(NoteCommand),

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting (key=value)
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Create a new event
    Add(EventFields),

    /// Edit an existing event
    Edit {
        /// ID of the event to edit
        id: String,

        #[clap(flatten)]
        fields: EventFields,

        /// Remove the event's description
        #[clap(long, conflicts_with = "description")]
        clear_description: bool,
    },

    /// Show a single event
    Show {
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Delete an event by ID
    Delete { id: String },
}

/// Event form fields. Every field is optional so the same set serves both
/// creation and editing.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Title of the event
    #[clap(short = 'T', long)]
    pub title: Option<String>,

    /// Longer description
    #[clap(short = 'D', long)]
    pub description: Option<String>,

    /// Day of the event (YYYY-MM-DD), defaults to today on creation
    #[clap(short, long)]
    pub date: Option<String>,

    /// Start time (HH:MM)
    #[clap(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM)
    #[clap(short, long)]
    pub end: Option<String>,

    /// Palette color: orange, yellow, lime, cyan, violet, pink (or hex)
    #[clap(short, long)]
    pub color: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    /// List todos with pending/completed counts
    List {
        /// Which todos to show
        #[clap(short, long, value_enum, default_value_t = TodoFilter::All)]
        filter: TodoFilter,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Create a new todo
    Add {
        /// Title of the todo
        #[clap(short = 'T', long)]
        title: String,

        /// low, medium or high
        #[clap(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[clap(short, long)]
        due: Option<String>,
    },

    /// Edit an existing todo
    Edit {
        /// ID of the todo to edit
        id: String,

        #[clap(short = 'T', long)]
        title: Option<String>,

        #[clap(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[clap(short, long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[clap(long)]
        clear_due: bool,
    },

    /// Flip a todo between pending and completed
    Toggle { id: String },

    /// Delete a todo by ID
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// List notes, optionally filtered by a search term
    List {
        /// Case-insensitive text to look for in titles and content
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Print full content instead of a preview
        #[clap(long)]
        detailed: bool,
    },

    /// Create a new note
    Add {
        /// Title of the note, "Untitled Note" if left blank
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Content of the note
        #[clap(short, long, conflicts_with = "edit")]
        content: Option<String>,

        /// Write the content in your editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        #[clap(short = 'T', long)]
        title: Option<String>,

        #[clap(short, long, conflicts_with = "edit")]
        content: Option<String>,

        /// Open the current content in your editor
        #[clap(short, long)]
        edit: bool,
    },

    /// View a note by ID
    Show {
        id: String,

        #[clap(short, long)]
        json: bool,
    },

    /// Delete a note by ID
    Delete { id: String },
}
