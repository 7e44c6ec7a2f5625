use serde::{Deserialize, Serialize};

/// Persisted player progress. Kept as a flat JSON blob so the hosting
/// layer (browser local storage, a file, whatever) can stash it opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub x: f32,
    pub y: f32,
    pub hop_count: u32,
    pub state: String,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            hop_count: 0,
            state: String::new(),
        }
    }
}

impl SaveData {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("save data serialization must succeed")
    }

    /// Decode a save blob. Malformed data is recoverable: the caller falls
    /// back to spawn defaults.
    pub fn decode(blob: &str) -> Option<Self> {
        match serde_json::from_str(blob) {
            Ok(save) => Some(save),
            Err(e) => {
                tracing::warn!("Ignoring malformed save data: {e}");
                None
            },
        }
    }
}
