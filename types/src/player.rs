use serde::{Deserialize, Serialize};

/// A registered player. The (uid, platform) pair is unique; the id is stable
/// for the pair's lifetime. All score state is derived from attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub uid: String,
    pub platform: String,
}
