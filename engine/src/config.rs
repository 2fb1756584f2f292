use serde::{Deserialize, Serialize};
use types::WinPolicy;

/// Game-level configuration, typically deserialized from the deployment's
/// YAML config file. Everything but the platform tag has a sensible default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Platform tag stamped on every player this game registers; scores and
    /// ranks are always scoped to it.
    pub platform: String,

    /// Minimum guess length for fuzzy substring matching.
    #[serde(default = "default_min_matching_characters")]
    pub min_matching_characters: usize,

    /// Seconds a round must stay open before it may be skipped.
    #[serde(default)]
    pub min_seconds_before_new: i64,

    /// How multiple attempts per (round, player) collapse when scoring.
    #[serde(default)]
    pub win_policy: WinPolicy,

    /// Whether question search is case-sensitive.
    #[serde(default)]
    pub case_sensitive_search: bool,
}

fn default_min_matching_characters() -> usize {
    5
}

impl GameConfig {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            min_matching_characters: default_min_matching_characters(),
            min_seconds_before_new: 0,
            win_policy: WinPolicy::default(),
            case_sensitive_search: false,
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
