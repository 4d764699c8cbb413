//! The canonical Default Token Set
//!
//! Process-wide constant used as the normalization fallback and merge base.
//! Every normalized token set starts from these values; a field survives
//! only if the caller supplied a valid replacement.

use crate::schema::{
    ColorTokens, FontTokens, Hyphens, LinkTokens, ModeColors, RuleTokens, TokenSet, TypeTokens,
};

/// Default sans-serif stack
pub const SANS: &str = "'Inter', 'Segoe UI', system-ui, -apple-system, sans-serif";
/// Default serif stack
pub const SERIF: &str = "'Source Serif 4', 'Iowan Old Style', serif";
/// Default monospace stack
pub const MONO: &str = "'JetBrains Mono', 'SFMono-Regular', 'Consolas', monospace";

/// Build the Default Token Set
pub fn default_tokens() -> TokenSet {
    TokenSet {
        fonts: FontTokens {
            sans: SANS.to_string(),
            serif: SERIF.to_string(),
            mono: MONO.to_string(),
            body: SANS.to_string(),
            headings: SERIF.to_string(),
            code: MONO.to_string(),
            optical_sizing: true,
            liga: true,
        },
        type_: TypeTokens {
            base_px: 18.0,
            leading: 1.5,
            max_ch: 72.0,
            h_scale: 1.2,
            para_space: 0.6,
        },
        colors: ColorTokens {
            light: ModeColors {
                bg: "#fbfbfb".to_string(),
                text: "#111111".to_string(),
                muted: "#5a5a5a".to_string(),
                accent: "#1f6feb".to_string(),
            },
            dark: ModeColors {
                bg: "#0f1115".to_string(),
                text: "#f4f4f4".to_string(),
                muted: "#a0a0a0".to_string(),
                accent: "#4ea1ff".to_string(),
            },
            hc: ModeColors {
                bg: "#000000".to_string(),
                text: "#ffffff".to_string(),
                muted: "#d6d6d6".to_string(),
                accent: "#ffd500".to_string(),
            },
        },
        links: LinkTokens {
            underline: true,
            offset: 3.0,
            thickness: 1.0,
        },
        rules: RuleTokens {
            hyphens: Hyphens::Manual,
            orphans: 2,
            widows: 2,
        },
    }
}
