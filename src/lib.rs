//! Personal organizer library
//!
//! Three linked collections (calendar events, todos, and notes) kept in
//! memory and mirrored to a local key-value store, plus the view coordinator
//! and command-line front end that drive them.

mod calendar;
mod cli;
mod config;
mod coordinator;
pub mod dates;
mod errors;
mod event;
mod helper;
mod note;
mod record;
mod state;
mod storage;
mod todo;
mod types;

// Re-export key components
pub use calendar::*;
pub use cli::*;
pub use config::*;
pub use coordinator::*;
pub use errors::*;
pub use event::*;
pub use helper::*;
pub use note::*;
pub use record::*;
pub use state::*;
pub use storage::*;
pub use todo::*;
pub use types::*;
