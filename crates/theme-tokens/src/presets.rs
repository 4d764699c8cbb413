//! Built-in theme presets
//!
//! Named, complete token sets used when seeding a fresh owner's theme
//! collection. `Plain` is the preset promoted to default by the seeder.

use crate::schema::{
    ColorTokens, FontTokens, Hyphens, LinkTokens, ModeColors, RuleTokens, TokenSet, TypeTokens,
};

/// Name of the preset seeded as the owner's default theme
pub const DEFAULT_PRESET: &str = "Plain";

/// The `Plain` preset: system stacks, generous leading, restrained accents
pub fn plain() -> TokenSet {
    TokenSet {
        fonts: FontTokens {
            sans: "-apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Inter,Arial,sans-serif"
                .to_string(),
            serif: "Georgia, \"Times New Roman\", serif".to_string(),
            mono: "ui-monospace, SFMono-Regular, Menlo, monospace".to_string(),
            body: "-apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Inter,Arial,sans-serif"
                .to_string(),
            headings: "Georgia, \"Times New Roman\", serif".to_string(),
            code: "ui-monospace, SFMono-Regular, Menlo, monospace".to_string(),
            optical_sizing: true,
            liga: true,
        },
        type_: TypeTokens {
            base_px: 18.0,
            leading: 1.55,
            max_ch: 72.0,
            h_scale: 1.2,
            para_space: 0.65,
        },
        colors: ColorTokens {
            light: ModeColors {
                bg: "#ffffff".to_string(),
                text: "#0b0b0b".to_string(),
                muted: "#666666".to_string(),
                accent: "#0f62fe".to_string(),
            },
            dark: ModeColors {
                bg: "#0b0b0b".to_string(),
                text: "#f5f5f5".to_string(),
                muted: "#9a9a9a".to_string(),
                accent: "#7aa2ff".to_string(),
            },
            hc: ModeColors {
                bg: "#ffffff".to_string(),
                text: "#000000".to_string(),
                muted: "#000000".to_string(),
                accent: "#0000ff".to_string(),
            },
        },
        links: LinkTokens {
            underline: true,
            offset: 3.0,
            thickness: 1.0,
        },
        rules: RuleTokens {
            hyphens: Hyphens::Auto,
            orphans: 2,
            widows: 2,
        },
    }
}

/// All presets, in seeding order
pub fn all() -> Vec<(&'static str, TokenSet)> {
    vec![(DEFAULT_PRESET, plain())]
}
