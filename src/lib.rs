//! Inkpost theme subsystem
//!
//! Umbrella crate re-exporting the token model and the theme store so the
//! application layer can depend on a single entry point.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use theme_store;
pub use theme_tokens;
