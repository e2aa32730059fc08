//! Configuration management for relsync.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file in the local data directory. Every setting has a default except the
//! music library location when the platform has no audio directory.
//!
//! | Variable              | Default                               |
//! |-----------------------|---------------------------------------|
//! | `RELSYNC_MUSIC_DIR`   | platform audio dir (`~/Music`)        |
//! | `MUSICBRAINZ_API_URL` | `https://musicbrainz.org/ws/2`        |
//! | `RELSYNC_USER_AGENT`  | `relsync/<version> ( <contact> )`     |
//! | `RELSYNC_CONTACT`     | the crate's repository placeholder    |
//! | `RELSYNC_LOG`         | `warn` (a `tracing` filter directive) |

use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const APP_NAME: &str = "relsync";
pub const DEFAULT_MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2";
const DEFAULT_CONTACT: &str = "https://github.com/relsync/relsync";

/// Loads environment variables from `<data_local_dir>/relsync/.env`.
///
/// Creates the directory if needed. A missing `.env` file is not an error;
/// variables already set in the environment win over the file.
///
/// - Linux: `~/.local/share/relsync/.env`
/// - macOS: `~/Library/Application Support/relsync/.env`
/// - Windows: `%LOCALAPPDATA%/relsync/.env`
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| ConfigError::DataDir(dir.clone(), e))?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile(path, e))?;
    }
    Ok(())
}

/// Directory holding preferences, the release store and the `.env` file.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path
}

pub fn preferences_path() -> PathBuf {
    data_dir().join("preferences.json")
}

pub fn store_path() -> PathBuf {
    data_dir().join("store/artist-releases.json")
}

/// Root of the local music library.
pub fn music_library_dir() -> Result<PathBuf, ConfigError> {
    match env::var("RELSYNC_MUSIC_DIR") {
        Ok(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::audio_dir().ok_or(ConfigError::NoMusicDir),
    }
}

pub fn musicbrainz_api_url() -> String {
    env::var("MUSICBRAINZ_API_URL").unwrap_or_else(|_| DEFAULT_MUSICBRAINZ_API_URL.to_string())
}

/// User agent sent to MusicBrainz, which rejects anonymous clients.
pub fn user_agent() -> String {
    env::var("RELSYNC_USER_AGENT").unwrap_or_else(|_| {
        let contact = env::var("RELSYNC_CONTACT").unwrap_or_else(|_| DEFAULT_CONTACT.to_string());
        format!(
            "{name}/{version} ( {contact} )",
            name = APP_NAME,
            version = env!("CARGO_PKG_VERSION"),
            contact = contact
        )
    })
}

/// `tracing` filter directive for diagnostics on stderr.
pub fn log_filter() -> String {
    env::var("RELSYNC_LOG").unwrap_or_else(|_| "warn".to_string())
}
