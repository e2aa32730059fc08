use tabled::Table;

use crate::{
    config, error, management::PreferencesManager, success, types::PreferenceTableRow, utils,
};

/// Changes requested on the command line; `None` leaves a value alone.
#[derive(Debug, Clone, Default)]
pub struct PreferenceChanges {
    pub lookback_months: Option<i32>,
    pub include_future_releases: Option<bool>,
    pub full_update: Option<bool>,
    pub refresh_period_days: Option<u32>,
}

pub async fn show_preferences() {
    let manager = PreferencesManager::load(config::preferences_path()).await;
    let prefs = manager.snapshot();

    let row = |key: &str, value: String| PreferenceTableRow {
        key: key.to_string(),
        value,
    };
    let rows = vec![
        row("lookback months", prefs.lookback_months.to_string()),
        row(
            "include future releases",
            prefs.include_future_releases.to_string(),
        ),
        row("always full update", prefs.full_update.to_string()),
        row("refresh period (days)", prefs.refresh_period_days.to_string()),
        row("last refresh", utils::format_timestamp(prefs.last_refresh)),
        row("next refresh", utils::format_timestamp(prefs.next_refresh)),
        row("full update pending", prefs.force_full_refresh.to_string()),
    ];

    println!("{}\n{}", Table::new(rows), manager.path().display());
}

pub async fn set_preferences(changes: PreferenceChanges) {
    let manager = PreferencesManager::load(config::preferences_path()).await;
    let result = manager
        .update(|prefs| {
            if let Some(months) = changes.lookback_months {
                prefs.lookback_months = months;
            }
            if let Some(include) = changes.include_future_releases {
                prefs.include_future_releases = include;
            }
            if let Some(full) = changes.full_update {
                prefs.full_update = full;
            }
            if let Some(days) = changes.refresh_period_days {
                prefs.refresh_period_days = days;
            }
        })
        .await;

    match result {
        Ok(_) => success!("Preferences saved."),
        Err(e) => error!("Cannot save preferences. Err: {}", e),
    }
}

pub async fn reset_preferences() {
    let manager = PreferencesManager::load(config::preferences_path()).await;
    match manager.reset_bookkeeping().await {
        Ok(_) => success!("Sync history cleared, the next sync will be a full update."),
        Err(e) => error!("Cannot save preferences. Err: {}", e),
    }
}
