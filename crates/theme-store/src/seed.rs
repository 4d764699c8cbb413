//! Preset seeding
//!
//! Explicit, idempotent initialization called once by the process entry
//! point: an owner with no themes gets the built-in presets, with the
//! `Plain` preset as their default. Owners who already have themes are
//! left untouched, so re-running is safe.

use crate::error::Result;
use crate::repository::ThemeRepository;
use crate::service::{CreateTheme, ThemeService};
use theme_tokens::presets;

/// Create the preset themes for an owner if they have none.
///
/// Returns the number of themes created (zero when the owner already has
/// any).
pub async fn ensure_seed_themes<R: ThemeRepository>(
    service: &ThemeService<R>,
    owner_id: &str,
) -> Result<usize> {
    if !service.list_themes(owner_id).await?.is_empty() {
        return Ok(0);
    }

    let mut created = 0;
    for (name, tokens) in presets::all() {
        service
            .create_theme(
                owner_id,
                CreateTheme {
                    name: name.to_string(),
                    tokens: serde_json::to_value(&tokens)?,
                    is_default: name == presets::DEFAULT_PRESET,
                },
            )
            .await?;
        created += 1;
    }

    tracing::info!(owner_id, created, "seeded preset themes");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ThemeDatabase;
    use crate::sqlite::SqliteThemeRepository;

    #[tokio::test]
    async fn test_seed_creates_presets_once() {
        let db = ThemeDatabase::in_memory().await.unwrap();
        let service = ThemeService::new(SqliteThemeRepository::new(db.pool().clone()));

        let created = ensure_seed_themes(&service, "owner-1").await.unwrap();
        assert_eq!(created, presets::all().len());

        // Second run is a no-op.
        let created = ensure_seed_themes(&service, "owner-1").await.unwrap();
        assert_eq!(created, 0);

        let default = service.default_theme("owner-1").await.unwrap().unwrap();
        assert_eq!(default.name, presets::DEFAULT_PRESET);
        assert_eq!(default.tokens, presets::plain());
    }

    #[tokio::test]
    async fn test_seed_skips_owner_with_themes() {
        let db = ThemeDatabase::in_memory().await.unwrap();
        let service = ThemeService::new(SqliteThemeRepository::new(db.pool().clone()));

        service
            .create_theme(
                "owner-1",
                CreateTheme {
                    name: "Mine".to_string(),
                    tokens: serde_json::to_value(theme_tokens::default_tokens()).unwrap(),
                    is_default: true,
                },
            )
            .await
            .unwrap();

        let created = ensure_seed_themes(&service, "owner-1").await.unwrap();
        assert_eq!(created, 0);
        assert_eq!(service.list_themes("owner-1").await.unwrap().len(), 1);
    }
}
