//! Theme service: the single-default invariant manager
//!
//! Composes a [`ThemeRepository`] into the owner-facing create / update /
//! delete operations and keeps the invariant that a non-empty theme
//! collection has exactly one default theme. Writes that set the flag
//! demote siblings inside the repository's own transaction, so concurrent
//! requests cannot leave an owner with zero or two defaults; successor
//! promotion after a delete or demotion runs in the same operation, and a
//! failure there fails the whole operation rather than reporting partial
//! success.

use crate::error::{Result, ThemeStoreError};
use crate::repository::{NewTheme, ThemeChanges, ThemeRecord, ThemeRepository};
use theme_tokens::{default_tokens, merge_patch, try_normalize, TokenSet};

/// Minimum theme name length in characters
pub const NAME_MIN: usize = 2;
/// Maximum theme name length in characters
pub const NAME_MAX: usize = 64;

/// Payload for theme creation
#[derive(Debug, Clone)]
pub struct CreateTheme {
    /// Display name (2-64 characters)
    pub name: String,
    /// Complete token set as submitted by the editor; must pass strict
    /// validation, partial payloads are rejected here
    pub tokens: serde_json::Value,
    /// Request that the new theme become the owner's default
    pub is_default: bool,
}

/// Payload for theme update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateTheme {
    /// New display name
    pub name: Option<String>,
    /// Partial token override, merged onto the theme's current tokens
    pub tokens: Option<serde_json::Value>,
    /// New default flag
    pub is_default: Option<bool>,
}

/// Owner-facing theme operations with invariant enforcement
pub struct ThemeService<R> {
    repo: R,
}

impl<R: ThemeRepository> ThemeService<R> {
    /// Create a service over a repository
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a theme for an owner.
    ///
    /// The first theme an owner creates becomes the default regardless of
    /// the requested flag, so a non-empty collection always has a default.
    pub async fn create_theme(&self, owner_id: &str, req: CreateTheme) -> Result<ThemeRecord> {
        validate_name(&req.name)?;

        let normalized = try_normalize(&req.tokens);
        if !normalized.valid {
            return Err(ThemeStoreError::Validation(
                "tokens are not a complete, valid token set".to_string(),
            ));
        }

        let siblings = self.repo.find_by_owner(owner_id).await?;
        let is_default = req.is_default || siblings.is_empty();

        // A default insert demotes siblings inside the repository's
        // transaction, so nothing to repair here.
        self.repo
            .create(NewTheme {
                owner_id: owner_id.to_string(),
                name: req.name,
                tokens: normalized.tokens,
                is_default,
            })
            .await
    }

    /// Update a theme owned by `owner_id`.
    ///
    /// Token patches may be partial but every supplied leaf must be valid;
    /// an out-of-range leaf rejects the update instead of silently falling
    /// back. Promoting a theme to default demotes its siblings in the same
    /// operation; demoting the current default hands the flag to the
    /// earliest-created sibling (or keeps it when the theme stands alone).
    pub async fn update_theme(
        &self,
        owner_id: &str,
        id: &str,
        patch: UpdateTheme,
    ) -> Result<ThemeRecord> {
        let existing = self.owned_theme(owner_id, id).await?;

        let mut changes = ThemeChanges::default();
        if let Some(name) = patch.name {
            validate_name(&name)?;
            changes.name = Some(name);
        }
        if let Some(raw) = patch.tokens.as_ref() {
            let patched = merge_patch(&existing.tokens, raw);
            if !patched.clean {
                return Err(ThemeStoreError::Validation(
                    "token patch contains invalid values".to_string(),
                ));
            }
            changes.tokens = Some(patched.tokens);
        }

        let mut successor: Option<ThemeRecord> = None;
        match patch.is_default {
            Some(true) => changes.is_default = Some(true),
            Some(false) if existing.is_default => {
                let siblings = self.repo.find_by_owner(owner_id).await?;
                successor = earliest_created(siblings.into_iter().filter(|t| t.id != id));
                // The sole theme keeps the flag; a collection with themes
                // but no default is not a reachable state.
                changes.is_default = Some(successor.is_none());
            }
            Some(false) => changes.is_default = Some(false),
            None => {}
        }

        let updated = self.repo.update(id, changes).await?;

        if let Some(successor) = successor {
            self.promote(owner_id, &successor).await?;
        }

        Ok(updated)
    }

    /// Delete a theme owned by `owner_id`.
    ///
    /// Dependent content references are cleared first so nothing dangles.
    /// Deleting the default promotes the earliest-created survivor; an
    /// owner whose last theme is deleted simply has no default.
    pub async fn delete_theme(&self, owner_id: &str, id: &str) -> Result<()> {
        let existing = self.owned_theme(owner_id, id).await?;

        self.repo.clear_theme_references(id).await?;
        self.repo.delete(id).await?;

        if existing.is_default {
            let remaining = self
                .repo
                .find_by_owner(owner_id)
                .await
                .map_err(repair_failure)?;
            if let Some(successor) = earliest_created(remaining.into_iter()) {
                self.promote(owner_id, &successor).await?;
            }
        }

        Ok(())
    }

    /// Fetch one theme, scoped to the owner
    pub async fn get_theme(&self, owner_id: &str, id: &str) -> Result<ThemeRecord> {
        self.owned_theme(owner_id, id).await
    }

    /// All themes for an owner, ordered by name
    pub async fn list_themes(&self, owner_id: &str) -> Result<Vec<ThemeRecord>> {
        self.repo.find_by_owner(owner_id).await
    }

    /// The owner's default theme, if any
    pub async fn default_theme(&self, owner_id: &str) -> Result<Option<ThemeRecord>> {
        let themes = self.repo.find_by_owner(owner_id).await?;
        Ok(themes.into_iter().find(|t| t.is_default))
    }

    /// Token set the renderer should use for an owner: the default theme's
    /// tokens, or the Default Token Set when the owner has none.
    pub async fn effective_tokens(&self, owner_id: &str) -> Result<TokenSet> {
        Ok(self
            .default_theme(owner_id)
            .await?
            .map(|t| t.tokens)
            .unwrap_or_else(default_tokens))
    }

    /// A theme id outside the owner's namespace reads as not-found, never
    /// as existing-but-forbidden.
    async fn owned_theme(&self, owner_id: &str, id: &str) -> Result<ThemeRecord> {
        match self.repo.find_by_id(id).await? {
            Some(theme) if theme.owner_id == owner_id => Ok(theme),
            _ => Err(ThemeStoreError::NotFound(id.to_string())),
        }
    }

    /// Hand the default flag to a successor after the primary write
    /// succeeded; a failure here fails the whole operation.
    async fn promote(&self, owner_id: &str, successor: &ThemeRecord) -> Result<()> {
        self.repo
            .set_default(owner_id, &successor.id)
            .await
            .map_err(|e| {
                tracing::warn!(owner_id, theme_id = %successor.id, error = %e, "successor promotion failed");
                repair_failure(e)
            })?;
        tracing::info!(owner_id, theme_id = %successor.id, "promoted successor default theme");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ThemeStoreError::Validation(format!(
            "theme name must be {}-{} characters",
            NAME_MIN, NAME_MAX
        )));
    }
    Ok(())
}

/// Successor policy: earliest-created, id as the deterministic tie-break
fn earliest_created(themes: impl Iterator<Item = ThemeRecord>) -> Option<ThemeRecord> {
    themes.min_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    })
}

fn repair_failure(err: ThemeStoreError) -> ThemeStoreError {
    match err {
        ThemeStoreError::InvariantRepair(_) => err,
        other => ThemeStoreError::InvariantRepair(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockThemeRepository;
    use mockall::predicate::eq;

    fn record(id: &str, owner: &str, name: &str, is_default: bool, created_at: i64) -> ThemeRecord {
        ThemeRecord {
            id: id.to_string(),
            owner_id: owner.to_string(),
            name: name.to_string(),
            tokens: default_tokens(),
            is_default,
            created_at,
            updated_at: created_at,
        }
    }

    fn full_tokens() -> serde_json::Value {
        serde_json::to_value(default_tokens()).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_partial_tokens() {
        let service = ThemeService::new(MockThemeRepository::new());
        let err = service
            .create_theme(
                "owner-1",
                CreateTheme {
                    name: "Serif".to_string(),
                    tokens: serde_json::json!({"type": {"basePx": 16}}),
                    is_default: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ThemeStoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_name() {
        let service = ThemeService::new(MockThemeRepository::new());
        let too_long = "y".repeat(65);
        for name in ["x".to_string(), too_long] {
            let err = service
                .create_theme(
                    "owner-1",
                    CreateTheme {
                        name,
                        tokens: full_tokens(),
                        is_default: false,
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ThemeStoreError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_first_theme_forced_default() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_owner()
            .with(eq("owner-1"))
            .returning(|_| Ok(vec![]));
        repo.expect_create()
            .withf(|t| t.is_default)
            .returning(|t| {
                Ok(ThemeRecord {
                    id: "t1".to_string(),
                    owner_id: t.owner_id,
                    name: t.name,
                    tokens: t.tokens,
                    is_default: t.is_default,
                    created_at: 1,
                    updated_at: 1,
                })
            });

        let service = ThemeService::new(repo);
        let created = service
            .create_theme(
                "owner-1",
                CreateTheme {
                    name: "Serif".to_string(),
                    tokens: full_tokens(),
                    is_default: false, // overridden: first theme is default
                },
            )
            .await
            .unwrap();
        assert!(created.is_default);
    }

    #[tokio::test]
    async fn test_create_default_with_siblings_passes_flag_through() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_owner()
            .returning(|_| Ok(vec![record("t0", "owner-1", "Plain", true, 1)]));
        repo.expect_create().withf(|t| t.is_default).times(1).returning(|t| {
            Ok(ThemeRecord {
                id: "t1".to_string(),
                owner_id: t.owner_id,
                name: t.name,
                tokens: t.tokens,
                is_default: t.is_default,
                created_at: 2,
                updated_at: 2,
            })
        });

        let service = ThemeService::new(repo);
        let created = service
            .create_theme(
                "owner-1",
                CreateTheme {
                    name: "Bold".to_string(),
                    tokens: full_tokens(),
                    is_default: true,
                },
            )
            .await
            .unwrap();
        assert!(created.is_default);
    }

    #[tokio::test]
    async fn test_demotion_handover_failure_is_invariant_repair() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t2", "owner-1", "Bold", true, 2))));
        repo.expect_find_by_owner().returning(|_| {
            Ok(vec![
                record("t2", "owner-1", "Bold", true, 2),
                record("t1", "owner-1", "Plain", false, 1),
            ])
        });
        repo.expect_update()
            .returning(|_, _| Ok(record("t2", "owner-1", "Bold", false, 2)));
        repo.expect_set_default()
            .returning(|_, _| Err(ThemeStoreError::Database(sqlx::Error::PoolClosed)));

        let service = ThemeService::new(repo);
        let err = service
            .update_theme(
                "owner-1",
                "t2",
                UpdateTheme {
                    is_default: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ThemeStoreError::InvariantRepair(_)));
    }

    #[tokio::test]
    async fn test_update_other_owner_reads_as_not_found() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .with(eq("t1"))
            .returning(|_| Ok(Some(record("t1", "owner-2", "A", false, 1))));

        let service = ThemeService::new(repo);
        let err = service
            .update_theme("owner-1", "t1", UpdateTheme::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ThemeStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_dirty_patch() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t1", "owner-1", "A", false, 1))));

        let service = ThemeService::new(repo);
        let err = service
            .update_theme(
                "owner-1",
                "t1",
                UpdateTheme {
                    tokens: Some(serde_json::json!({"type": {"leading": 9.0}})),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ThemeStoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_merges_partial_patch_onto_current() {
        let mut current = record("t1", "owner-1", "A", false, 1);
        current.tokens.type_.base_px = 20.0;

        let mut repo = MockThemeRepository::new();
        let fetched = current.clone();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(fetched.clone())));
        repo.expect_update()
            .withf(|_, changes| {
                let tokens = changes.tokens.as_ref().unwrap();
                tokens.type_.base_px == 20.0 && tokens.type_.leading == 1.7
            })
            .returning(move |_, changes| {
                let mut out = current.clone();
                out.tokens = changes.tokens.unwrap();
                Ok(out)
            });

        let service = ThemeService::new(repo);
        let updated = service
            .update_theme(
                "owner-1",
                "t1",
                UpdateTheme {
                    tokens: Some(serde_json::json!({"type": {"leading": 1.7}})),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.tokens.type_.base_px, 20.0);
        assert_eq!(updated.tokens.type_.leading, 1.7);
    }

    #[tokio::test]
    async fn test_demoting_default_promotes_earliest_sibling() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t2", "owner-1", "B", true, 2))));
        repo.expect_find_by_owner().returning(|_| {
            Ok(vec![
                record("t2", "owner-1", "B", true, 2),
                record("t3", "owner-1", "C", false, 3),
                record("t1", "owner-1", "A", false, 1),
            ])
        });
        repo.expect_update()
            .with(eq("t2"), mockall::predicate::function(|c: &ThemeChanges| {
                c.is_default == Some(false)
            }))
            .returning(|_, _| Ok(record("t2", "owner-1", "B", false, 2)));
        repo.expect_set_default()
            .with(eq("owner-1"), eq("t1"))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ThemeService::new(repo);
        let updated = service
            .update_theme(
                "owner-1",
                "t2",
                UpdateTheme {
                    is_default: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_default);
    }

    #[tokio::test]
    async fn test_demoting_sole_theme_keeps_flag() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t1", "owner-1", "A", true, 1))));
        repo.expect_find_by_owner()
            .returning(|_| Ok(vec![record("t1", "owner-1", "A", true, 1)]));
        repo.expect_update()
            .withf(|_, c| c.is_default == Some(true))
            .returning(|_, _| Ok(record("t1", "owner-1", "A", true, 1)));

        let service = ThemeService::new(repo);
        let updated = service
            .update_theme(
                "owner-1",
                "t1",
                UpdateTheme {
                    is_default: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_default);
    }

    #[tokio::test]
    async fn test_delete_clears_references_before_delete() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t1", "owner-1", "A", false, 1))));
        repo.expect_clear_theme_references()
            .with(eq("t1"))
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_delete()
            .with(eq("t1"))
            .times(1)
            .returning(|_| Ok(()));

        let service = ThemeService::new(repo);
        service.delete_theme("owner-1", "t1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_default_promotes_successor() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t1", "owner-1", "A", true, 1))));
        repo.expect_clear_theme_references().returning(|_| Ok(()));
        repo.expect_delete().returning(|_| Ok(()));
        repo.expect_find_by_owner().returning(|_| {
            Ok(vec![
                record("t3", "owner-1", "C", false, 3),
                record("t2", "owner-1", "B", false, 2),
            ])
        });
        repo.expect_set_default()
            .with(eq("owner-1"), eq("t2"))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ThemeService::new(repo);
        service.delete_theme("owner-1", "t1").await.unwrap();
    }

    #[tokio::test]
    async fn test_promotion_failure_is_invariant_repair() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(record("t1", "owner-1", "A", true, 1))));
        repo.expect_clear_theme_references().returning(|_| Ok(()));
        repo.expect_delete().returning(|_| Ok(()));
        repo.expect_find_by_owner()
            .returning(|_| Ok(vec![record("t2", "owner-1", "B", false, 2)]));
        repo.expect_set_default()
            .returning(|_, _| Err(ThemeStoreError::Database(sqlx::Error::PoolClosed)));

        let service = ThemeService::new(repo);
        let err = service.delete_theme("owner-1", "t1").await.unwrap_err();
        assert!(matches!(err, ThemeStoreError::InvariantRepair(_)));
    }

    #[tokio::test]
    async fn test_effective_tokens_falls_back_to_defaults() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_owner().returning(|_| Ok(vec![]));

        let service = ThemeService::new(repo);
        let tokens = service.effective_tokens("owner-1").await.unwrap();
        assert_eq!(tokens, default_tokens());
    }

    #[tokio::test]
    async fn test_default_theme_lookup() {
        let mut repo = MockThemeRepository::new();
        repo.expect_find_by_owner().returning(|_| {
            Ok(vec![
                record("t1", "owner-1", "A", false, 1),
                record("t2", "owner-1", "B", true, 2),
            ])
        });

        let service = ThemeService::new(repo);
        let default = service.default_theme("owner-1").await.unwrap().unwrap();
        assert_eq!(default.id, "t2");
    }
}
