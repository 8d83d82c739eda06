//! Player preferences
//!
//! Embedded in [`SaveData`](crate::save::SaveData) so one exported file
//! carries everything. Field names stay camelCase on the wire to match
//! existing saves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    /// Skip screen flashes and shake for motion-sensitive players
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            reduced_motion: false,
        }
    }
}
