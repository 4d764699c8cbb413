//! CSS custom property derivation
//!
//! Projects a valid [`TokenSet`] into the flat `--var: value` mapping the
//! page renderer applies at the document root. Pure and total over valid
//! token sets: normalization runs before derivation, so no field here can
//! be out of range.

use crate::schema::{ColorMode, ModeColors, TokenSet};
use std::collections::BTreeMap;

/// Derive the flat CSS variable mapping for a token set and appearance mode.
///
/// All non-color groups are mode-independent; the selected mode's color
/// record is projected into the flat `--bg`/`--text`/`--muted`/`--accent`
/// keys. Every mode is additionally emitted under `--color-{mode}-{role}`
/// so client-side mode switching does not need a re-derivation.
pub fn derive_variables(tokens: &TokenSet, mode: ColorMode) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();

    vars.insert("--font-sans".to_string(), tokens.fonts.sans.clone());
    vars.insert("--font-serif".to_string(), tokens.fonts.serif.clone());
    vars.insert("--font-mono".to_string(), tokens.fonts.mono.clone());
    vars.insert("--font-body".to_string(), tokens.fonts.body.clone());
    vars.insert("--font-head".to_string(), tokens.fonts.headings.clone());
    vars.insert("--font-code".to_string(), tokens.fonts.code.clone());
    vars.insert(
        "--font-optical-sizing".to_string(),
        flag(tokens.fonts.optical_sizing),
    );
    vars.insert("--font-liga".to_string(), flag(tokens.fonts.liga));

    vars.insert("--base".to_string(), px(tokens.type_.base_px));
    vars.insert("--leading".to_string(), num(tokens.type_.leading));
    vars.insert("--max-ch".to_string(), num(tokens.type_.max_ch));
    vars.insert("--h-scale".to_string(), num(tokens.type_.h_scale));
    vars.insert(
        "--para-space".to_string(),
        format!("{}rem", num(tokens.type_.para_space)),
    );

    vars.insert(
        "--link-underline".to_string(),
        if tokens.links.underline {
            "underline".to_string()
        } else {
            "none".to_string()
        },
    );
    vars.insert("--link-offset".to_string(), px(tokens.links.offset));
    vars.insert("--link-thickness".to_string(), px(tokens.links.thickness));

    vars.insert(
        "--hyphens".to_string(),
        tokens.rules.hyphens.as_str().to_string(),
    );
    vars.insert("--orphans".to_string(), tokens.rules.orphans.to_string());
    vars.insert("--widows".to_string(), tokens.rules.widows.to_string());

    let active = tokens.colors_for(mode);
    vars.insert("--bg".to_string(), active.bg.clone());
    vars.insert("--text".to_string(), active.text.clone());
    vars.insert("--muted".to_string(), active.muted.clone());
    vars.insert("--accent".to_string(), active.accent.clone());

    for m in ColorMode::all() {
        insert_mode(&mut vars, m, tokens.colors_for(m));
    }

    vars
}

fn insert_mode(vars: &mut BTreeMap<String, String>, mode: ColorMode, colors: &ModeColors) {
    let key = mode.key();
    vars.insert(format!("--color-{}-bg", key), colors.bg.clone());
    vars.insert(format!("--color-{}-text", key), colors.text.clone());
    vars.insert(format!("--color-{}-muted", key), colors.muted.clone());
    vars.insert(format!("--color-{}-accent", key), colors.accent.clone());
}

/// Numeric value with a pixel suffix
fn px(value: f64) -> String {
    format!("{}px", num(value))
}

/// Unitless numeric value, shortest form (`18`, not `18.0`)
fn num(value: f64) -> String {
    format!("{}", value)
}

/// Boolean encoded for style text
fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
