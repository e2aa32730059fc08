//! # Release Sync
//!
//! The core of relsync. Every artist of the local library is looked up in the
//! remote catalog over the current sync window and what was found is stored.
//! Progress goes to whoever is listening.
//!
//! ```text
//! ReleaseSync::run
//!     ├── compute_window        (preferences + clock)
//!     ├── DeviceMusicService    (list artists)
//!     └── for each artist
//!           ├── ArtistSyncWorker    (RemoteMusicDatabase, ArtistStore)
//!           └── ProgressChannel     (observers)
//! ```
//!
//! ## Failure policy
//!
//! - A failed remote lookup only affects its artist; the run continues and
//!   the failure travels with the artist's progress event.
//! - A failing store or an unexpected error stops the run with a single
//!   failure event. The next run is then forced to do a full update.
//! - A run that visits every artist clears the forced full update flag and
//!   records the time the run started as the last refresh.

mod orchestrator;
mod progress;
mod traits;
mod window;
mod worker;

pub use orchestrator::ReleaseSync;
pub use orchestrator::RunOutcome;
pub use progress::ProgressChannel;
pub use progress::ProgressObserver;
pub use traits::ArtistStore;
pub use traits::Clock;
pub use traits::DeviceMusicService;
pub use traits::FixedClock;
pub use traits::PreferencesStore;
pub use traits::RemoteMusicDatabase;
pub use traits::SystemClock;
pub use window::SyncWindow;
pub use window::compute_window;
pub use window::full_update_start;
pub use worker::ArtistOutcome;
pub use worker::ArtistSyncWorker;
