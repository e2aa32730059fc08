//! # CLI Module
//!
//! User-facing commands of relsync. Each command wires the concrete
//! collaborators (music library scanner, MusicBrainz client, release store,
//! preferences) together and reports back with the colored output macros.
//!
//! ## Commands
//!
//! - [`sync`] - Looks up new releases for every artist of the music library
//! - [`list_releases`] - Shows stored releases, newest first
//! - [`list_artists`] - Shows the artists of the music library
//! - [`show_preferences`], [`set_preferences`], [`reset_preferences`] -
//!   Inspect and change sync settings
//!
//! ## Usage Patterns
//!
//! ```bash
//! relsync sync                         # incremental sync since the last run
//! relsync sync --full                  # look back over the whole lookback period
//! relsync sync --if-due                # for cron/systemd timers
//! relsync releases --upcoming          # what is announced but not out yet
//! relsync prefs set --lookback-months 12
//! ```

mod artists;
mod prefs;
mod progress;
mod releases;
mod sync;

pub use artists::list_artists;
pub use prefs::PreferenceChanges;
pub use prefs::reset_preferences;
pub use prefs::set_preferences;
pub use prefs::show_preferences;
pub use progress::ProgressBarObserver;
pub use releases::list_releases;
pub use sync::sync;
