//! Release Tracker Library
//!
//! This library keeps track of new releases from the artists found in a local
//! music library. Artists are looked up in the MusicBrainz catalog over a sync
//! window derived from the previous run, and the releases found are merged into
//! a local store.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types of the sync core and its collaborators
//! - `library` - Artists of the local music library
//! - `logging` - `tracing` subscriber setup
//! - `management` - Release store and preferences persistence
//! - `musicbrainz` - MusicBrainz web service client
//! - `sync` - The release sync orchestrator
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use relsync::{config, library::LibraryScanner, management, musicbrainz, sync::ReleaseSync};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     config::load_env().await?;
//!     let sync = ReleaseSync::new(
//!         Arc::new(LibraryScanner::new(config::music_library_dir()?)),
//!         Arc::new(musicbrainz::MusicBrainzClient::new(
//!             &config::musicbrainz_api_url(),
//!             &config::user_agent(),
//!         )?),
//!         Arc::new(management::ArtistReleaseStore::load(config::store_path()).await?),
//!         Arc::new(management::PreferencesManager::load(config::preferences_path()).await),
//!     );
//!     sync.run().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod management;
pub mod musicbrainz;
pub mod sync;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Scanning music library...");
/// info!("Found {} artists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the command-line layer; the program terminates
/// with exit code 1 right after printing.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
