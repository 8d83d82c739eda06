//! Save data - leaderboard, lifetime stats, and settings
//!
//! Persisted to LocalStorage on wasm32, in-memory otherwise. Loads merge
//! with defaults field by field, so saves from older versions keep working.
//! Storage failures are logged and swallowed; the game never blocks on
//! persistence.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Leaderboard depth
pub const MAX_SCORES: usize = 10;

/// One finished run on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreRecord {
    pub score: u32,
    /// Seconds survived, rounded
    pub time: u32,
    /// Flies squashed during the run
    pub flies: u32,
    /// ISO-8601, supplied by the shell
    pub date: String,
}

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub high_score: u32,
    /// Longest survival time in seconds
    pub high_score_time: u32,
    pub total_flies_squashed: u32,
    /// Wire name keeps the long-standing typo so old saves import
    #[serde(rename = "totalGamesSessions")]
    pub total_game_sessions: u32,
    pub best_flies_in_one_session: u32,
    pub settings: Settings,
    /// Top scores, descending; ties keep insertion order
    pub scores: Vec<ScoreRecord>,
}

impl SaveData {
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sleep_tight_save";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished run into the lifetime stats and the leaderboard,
    /// then persist
    pub fn record_session(&mut self, score: f32, time_survived: f32, flies: u32, date: String) {
        self.total_game_sessions += 1;
        self.total_flies_squashed += flies;

        let score = score.round().max(0.0) as u32;
        let time = time_survived.round().max(0.0) as u32;
        self.high_score = self.high_score.max(score);
        self.high_score_time = self.high_score_time.max(time);
        self.best_flies_in_one_session = self.best_flies_in_one_session.max(flies);

        self.scores.push(ScoreRecord {
            score,
            time,
            flies,
            date,
        });
        // Stable sort: equal scores keep their insertion order
        self.scores.sort_by(|a, b| b.score.cmp(&a.score));
        self.scores.truncate(MAX_SCORES);

        self.save();
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.save();
    }

    /// Serialize the whole save for a user-visible export file
    pub fn export_data(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Replace the save with imported JSON. On parse failure the existing
    /// data is left untouched and the error is returned to the caller.
    pub fn import_data(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let imported: SaveData = serde_json::from_str(json)?;
        *self = imported;
        self.save();
        Ok(())
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(data) = serde_json::from_str::<SaveData>(&json) {
                    log::info!("Loaded save ({} leaderboard entries)", data.scores.len());
                    return data;
                }
                log::warn!("Save data unreadable, starting fresh");
            }
        }

        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// ISO-8601 timestamp for a new [`ScoreRecord`]
#[cfg(target_arch = "wasm32")]
pub fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_iso() -> String {
    String::new()
}
