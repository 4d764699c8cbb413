//! SQLite implementation of the theme repository

use crate::error::{Result, ThemeStoreError};
use crate::repository::{NewTheme, ThemeChanges, ThemeRecord, ThemeRepository};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::time::{SystemTime, UNIX_EPOCH};

/// Theme repository backed by a SQLite pool
pub struct SqliteThemeRepository {
    pool: SqlitePool,
}

impl SqliteThemeRepository {
    /// Create a repository over an already-migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &SqliteRow) -> Result<ThemeRecord> {
        let tokens_json: String = row.get("tokens");
        // Stored payloads round-trip through normalization so legacy or
        // hand-edited rows still read as complete token sets.
        let value: serde_json::Value = serde_json::from_str(&tokens_json)?;
        Ok(ThemeRecord {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            name: row.get("name"),
            tokens: theme_tokens::normalize(&value),
            is_default: row.get::<i64, _>("is_default") != 0,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn map_write_error(err: sqlx::Error, name: &str) -> ThemeStoreError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ThemeStoreError::Conflict(name.to_string())
            }
            _ => ThemeStoreError::Database(err),
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl ThemeRepository for SqliteThemeRepository {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ThemeRecord>> {
        let rows = sqlx::query("SELECT * FROM themes WHERE owner_id = ? ORDER BY name ASC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_record).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ThemeRecord>> {
        let row = sqlx::query("SELECT * FROM themes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn create(&self, theme: NewTheme) -> Result<ThemeRecord> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_millis();
        let tokens_json = serde_json::to_string(&theme.tokens)?;

        // The insert and the sibling demotion commit together; a second
        // request interleaving between them cannot observe two defaults
        // or demote this one before it lands.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO themes (id, owner_id, name, tokens, is_default, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&theme.owner_id)
        .bind(&theme.name)
        .bind(&tokens_json)
        .bind(theme.is_default as i64)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_write_error(e, &theme.name))?;

        if theme.is_default {
            sqlx::query("UPDATE themes SET is_default = (id = ?) WHERE owner_id = ?")
                .bind(&id)
                .bind(&theme.owner_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(ThemeRecord {
            id,
            owner_id: theme.owner_id,
            name: theme.name,
            tokens: theme.tokens,
            is_default: theme.is_default,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: &str, changes: ThemeChanges) -> Result<ThemeRecord> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ThemeStoreError::NotFound(id.to_string()))?;

        let name = changes.name.unwrap_or_else(|| existing.name.clone());
        let tokens = changes.tokens.unwrap_or_else(|| existing.tokens.clone());
        let is_default = changes.is_default.unwrap_or(existing.is_default);
        let now = now_millis();
        let tokens_json = serde_json::to_string(&tokens)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE themes SET name = ?, tokens = ?, is_default = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(&tokens_json)
        .bind(is_default as i64)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_write_error(e, &name))?;

        if is_default {
            sqlx::query("UPDATE themes SET is_default = (id = ?) WHERE owner_id = ?")
                .bind(id)
                .bind(&existing.owner_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(ThemeRecord {
            id: existing.id,
            owner_id: existing.owner_id,
            name,
            tokens,
            is_default,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM themes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_default(&self, owner_id: &str, id: &str) -> Result<()> {
        // Single statement, so promotion and demotion cannot be torn apart.
        sqlx::query("UPDATE themes SET is_default = (id = ?) WHERE owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_theme_references(&self, theme_id: &str) -> Result<()> {
        sqlx::query("UPDATE posts SET theme_id = NULL WHERE theme_id = ?")
            .bind(theme_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
