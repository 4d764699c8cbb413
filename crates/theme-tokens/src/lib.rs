//! Design token model for Inkpost themes
//!
//! This crate defines the complete token set that drives a theme's visual
//! rendering, the normalization pipeline that turns untrusted partial input
//! into a schema-valid token set, and the derivation of CSS custom
//! properties consumed by the page renderer.
//!
//! Everything here is pure and synchronous; persistence lives in
//! `theme-store`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod css;
pub mod defaults;
pub mod normalize;
pub mod presets;
pub mod schema;

pub use css::derive_variables;
pub use defaults::default_tokens;
pub use normalize::{merge_patch, normalize, try_normalize, Normalized, Patched};
pub use schema::{
    ColorMode, ColorTokens, FontTokens, Hyphens, LinkTokens, ModeColors, RuleTokens, TokenSet,
    TypeTokens,
};
