//! Token set schema for Inkpost themes
//!
//! A [`TokenSet`] is the complete, validated configuration object that
//! controls how a published page renders: font stacks and role assignments,
//! typographic measure, per-mode color records, link treatment, and text
//! layout rules.
//!
//! A stored or consumed token set is always complete. Partial shapes exist
//! only transiently inside normalization (see [`crate::normalize`]).

use serde::{Deserialize, Serialize};

// =============================================================================
// Range Limits
// =============================================================================

/// Closed numeric ranges for every constrained token field.
///
/// Validation rejects any supplied value outside these bounds; the merge
/// step then falls back to the default for that field alone.
pub mod limits {
    /// Base font size in pixels
    pub const BASE_PX: (f64, f64) = (14.0, 22.0);
    /// Body line height (unitless)
    pub const LEADING: (f64, f64) = (1.3, 1.8);
    /// Maximum measure in character units
    pub const MAX_CH: (f64, f64) = (60.0, 90.0);
    /// Heading scale factor
    pub const H_SCALE: (f64, f64) = (1.1, 1.35);
    /// Paragraph spacing in rem
    pub const PARA_SPACE: (f64, f64) = (0.0, 1.2);
    /// Link underline offset in pixels
    pub const LINK_OFFSET: (f64, f64) = (0.0, 16.0);
    /// Link underline thickness in pixels
    pub const LINK_THICKNESS: (f64, f64) = (1.0, 6.0);
    /// Orphan line count
    pub const ORPHANS: (i64, i64) = (1, 3);
    /// Widow line count
    pub const WIDOWS: (i64, i64) = (1, 3);
}

// =============================================================================
// Fonts
// =============================================================================

/// Named font stacks and rendering toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontTokens {
    /// Sans-serif stack
    pub sans: String,
    /// Serif stack
    pub serif: String,
    /// Monospace stack
    pub mono: String,
    /// Stack used for body copy
    pub body: String,
    /// Stack used for headings
    pub headings: String,
    /// Stack used for code blocks
    pub code: String,
    /// Enable optical sizing (`font-optical-sizing`)
    pub optical_sizing: bool,
    /// Enable standard ligatures
    pub liga: bool,
}

// =============================================================================
// Typography
// =============================================================================

/// Numeric typography parameters, each constrained to a closed range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTokens {
    /// Base font size in pixels (14-22)
    pub base_px: f64,
    /// Line height multiplier (1.3-1.8)
    pub leading: f64,
    /// Maximum measure in ch units (60-90)
    pub max_ch: f64,
    /// Heading scale factor (1.1-1.35)
    pub h_scale: f64,
    /// Paragraph spacing in rem (0-1.2)
    pub para_space: f64,
}

// =============================================================================
// Colors
// =============================================================================

/// Semantic color roles for one appearance mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeColors {
    /// Page background
    pub bg: String,
    /// Body text
    pub text: String,
    /// Muted/secondary text
    pub muted: String,
    /// Accent (links, highlights)
    pub accent: String,
}

/// Color records for every appearance mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTokens {
    /// Light mode
    pub light: ModeColors,
    /// Dark mode
    pub dark: ModeColors,
    /// High-contrast mode
    pub hc: ModeColors,
}

/// Appearance mode selector for CSS derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode
    #[default]
    Light,
    /// Dark mode
    Dark,
    /// High-contrast mode
    #[serde(rename = "hc")]
    HighContrast,
}

impl ColorMode {
    /// Short mode key as used in CSS variable names
    pub fn key(&self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
            ColorMode::HighContrast => "hc",
        }
    }

    /// All modes, in declaration order
    pub fn all() -> [ColorMode; 3] {
        [ColorMode::Light, ColorMode::Dark, ColorMode::HighContrast]
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ColorMode::Light),
            "dark" => Ok(ColorMode::Dark),
            "hc" | "high-contrast" => Ok(ColorMode::HighContrast),
            _ => Err(format!("Unknown color mode: {}", s)),
        }
    }
}

// =============================================================================
// Links
// =============================================================================

/// Visual treatment of hyperlinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTokens {
    /// Underline links
    pub underline: bool,
    /// Underline offset in pixels (0-16)
    pub offset: f64,
    /// Underline thickness in pixels (1-6)
    pub thickness: f64,
}

// =============================================================================
// Layout Rules
// =============================================================================

/// Hyphenation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Hyphens {
    /// No hyphenation
    None,
    /// Only at soft hyphens
    #[default]
    Manual,
    /// Automatic hyphenation
    Auto,
}

impl Hyphens {
    /// CSS keyword for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Hyphens::None => "none",
            Hyphens::Manual => "manual",
            Hyphens::Auto => "auto",
        }
    }
}

impl std::str::FromStr for Hyphens {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Hyphens::None),
            "manual" => Ok(Hyphens::Manual),
            "auto" => Ok(Hyphens::Auto),
            _ => Err(format!("Unknown hyphenation mode: {}", s)),
        }
    }
}

/// Text layout rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTokens {
    /// Hyphenation mode
    pub hyphens: Hyphens,
    /// Minimum lines at the bottom of a block (1-3)
    pub orphans: i64,
    /// Minimum lines at the top of a block (1-3)
    pub widows: i64,
}

// =============================================================================
// Token Set
// =============================================================================

/// The complete, schema-valid token set for one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Font stacks and toggles
    pub fonts: FontTokens,
    /// Typography parameters
    #[serde(rename = "type")]
    pub type_: TypeTokens,
    /// Per-mode color records
    pub colors: ColorTokens,
    /// Link treatment
    pub links: LinkTokens,
    /// Layout rules
    pub rules: RuleTokens,
}

impl TokenSet {
    /// Color record for the given appearance mode
    pub fn colors_for(&self, mode: ColorMode) -> &ModeColors {
        match mode {
            ColorMode::Light => &self.colors.light,
            ColorMode::Dark => &self.colors.dark,
            ColorMode::HighContrast => &self.colors.hc,
        }
    }

    /// Pretty-printed JSON form, as shown in the theme editor
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        crate::defaults::default_tokens()
    }
}
