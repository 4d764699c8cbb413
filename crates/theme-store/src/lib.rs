//! Theme store for Inkpost
//!
//! This crate persists themes and enforces the single-default-theme
//! invariant: among all themes owned by one owner, at most one is marked
//! default at any observation point, and deleting the current default
//! promotes a successor within the same operation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod db;
pub mod error;
pub mod repository;
pub mod seed;
pub mod service;
pub mod sqlite;

pub use db::{DatabaseConfig, SynchronousMode, ThemeDatabase};
pub use error::{Result, ThemeStoreError};
pub use repository::{NewTheme, ThemeChanges, ThemeRecord, ThemeRepository};
pub use seed::ensure_seed_themes;
pub use service::{CreateTheme, ThemeService, UpdateTheme};
pub use sqlite::SqliteThemeRepository;
