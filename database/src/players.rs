use sqlx::{Row, SqlitePool};
use types::Player;

use crate::error::StoreError;

#[derive(Clone)]
pub struct PlayerStore {
    pool: SqlitePool,
}

impl PlayerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert-if-absent registration. The insert races safely against itself:
    /// the unique constraint on (uid, platform) makes `INSERT OR IGNORE` a
    /// no-op for every caller but one, and all callers read back the same id.
    pub async fn ensure(&self, uid: &str, platform: &str) -> Result<i64, StoreError> {
        sqlx::query("INSERT OR IGNORE INTO player (uid, platform) VALUES (?, ?)")
            .bind(uid)
            .bind(platform)
            .execute(&self.pool)
            .await?;
        self.lookup(uid, platform).await
    }

    pub async fn lookup(&self, uid: &str, platform: &str) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT id FROM player WHERE uid = ? AND platform = ?")
            .bind(uid)
            .bind(platform)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(row.try_get("id")?),
            None => Err(StoreError::PlayerNotFound {
                uid: uid.to_string(),
                platform: platform.to_string(),
            }),
        }
    }

    pub async fn get(&self, id: i64) -> Result<Player, StoreError> {
        let row = sqlx::query("SELECT id, uid, platform FROM player WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Player {
                id: row.try_get("id")?,
                uid: row.try_get("uid")?,
                platform: row.try_get("platform")?,
            }),
            None => Err(StoreError::PlayerNotFound {
                uid: format!("#{id}"),
                platform: String::new(),
            }),
        }
    }
}
