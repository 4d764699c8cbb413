//! Theme persistence abstraction
//!
//! The repository exposes exactly the row-level operations the invariant
//! manager composes. Each operation is individually atomic; writes that
//! set the default flag clear it on the owner's other themes in the same
//! transaction, so no interleaving of requests can leave an owner with
//! zero or two defaults.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use theme_tokens::TokenSet;

/// A persisted theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRecord {
    /// Opaque unique identifier, assigned at creation
    pub id: String,
    /// Owning identity, never reassigned
    pub owner_id: String,
    /// Display name, unique within the owner's namespace
    pub name: String,
    /// Complete, schema-valid token set
    pub tokens: TokenSet,
    /// At most one `true` per owner
    pub is_default: bool,
    /// Creation time, unix epoch milliseconds
    pub created_at: i64,
    /// Last mutation time, unix epoch milliseconds
    pub updated_at: i64,
}

/// Fields for a theme insert
#[derive(Debug, Clone)]
pub struct NewTheme {
    /// Owning identity
    pub owner_id: String,
    /// Display name
    pub name: String,
    /// Complete token set
    pub tokens: TokenSet,
    /// Whether the new theme is the owner's default
    pub is_default: bool,
}

/// Fields for a theme update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct ThemeChanges {
    /// New display name
    pub name: Option<String>,
    /// Replacement token set (already merged and validated)
    pub tokens: Option<TokenSet>,
    /// New default flag
    pub is_default: Option<bool>,
}

/// Row-level theme persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// All themes for an owner, ordered by name
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ThemeRecord>>;

    /// Look up a theme by id; `Ok(None)` when no such row exists
    async fn find_by_id(&self, id: &str) -> Result<Option<ThemeRecord>>;

    /// Insert a theme; surfaces a conflict error on a duplicate name.
    /// Inserting with the default flag set demotes the owner's other
    /// themes in the same transaction.
    async fn create(&self, theme: NewTheme) -> Result<ThemeRecord>;

    /// Apply changes to a theme and bump its `updated_at`. An update that
    /// leaves the theme flagged default demotes its siblings in the same
    /// transaction.
    async fn update(&self, id: &str, changes: ThemeChanges) -> Result<ThemeRecord>;

    /// Delete a theme row
    async fn delete(&self, id: &str) -> Result<()>;

    /// Make exactly the named theme the owner's default, in one statement
    async fn set_default(&self, owner_id: &str, id: &str) -> Result<()>;

    /// Null out dangling references to a theme held by dependent content
    async fn clear_theme_references(&self, theme_id: &str) -> Result<()>;
}
