mod preferences;
mod store;

pub use preferences::PreferencesManager;
pub use store::ArtistReleaseStore;
