//! Asset type classification for cached artifacts.

use serde::{Deserialize, Serialize};

/// Kind of generated media an artifact holds.
///
/// Cache candidates are always restricted to one asset type: a music record
/// can never answer a video request, no matter how similar the prompts are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Music,
    Video,
}

impl AssetType {
    /// All known asset types, in a stable order.
    pub const ALL: [AssetType; 2] = [AssetType::Music, AssetType::Video];

    /// Stable lowercase name used in canonical keys and storage rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Music => "music",
            AssetType::Video => "video",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "music" => Ok(AssetType::Music),
            "video" => Ok(AssetType::Video),
            other => Err(crate::Error::validation(format!(
                "unknown asset type: {other:?} (expected \"music\" or \"video\")"
            ))),
        }
    }
}
