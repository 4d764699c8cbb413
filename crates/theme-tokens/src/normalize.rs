//! Token normalization: validate-then-merge
//!
//! Untrusted input (editor submissions, stored payloads from older schema
//! versions) is converted into a complete, schema-valid [`TokenSet`] by
//! validating each field against its declared constraint and merging the
//! accepted values onto a known-good base. A value that fails its own
//! constraint never survives into the result; the fallback is local to that
//! leaf. A subtree that is not an object where an object is expected falls
//! back wholesale. Unknown keys are dropped.
//!
//! [`normalize`] never fails; [`try_normalize`] additionally reports whether
//! the entire input was already fully valid, so the editor can reject a
//! submission the user believes is complete instead of silently correcting
//! it.

use crate::defaults::default_tokens;
use crate::schema::{
    limits, ColorTokens, FontTokens, Hyphens, LinkTokens, ModeColors, RuleTokens, TokenSet,
    TypeTokens,
};
use serde_json::{Map, Value};

/// Result of [`try_normalize`]: the merged tokens plus whether any fallback
/// occurred
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The complete, schema-valid token set
    pub tokens: TokenSet,
    /// True iff every declared field was supplied and satisfied its
    /// constraint (no silent substitution of defaults happened)
    pub valid: bool,
}

/// Result of [`merge_patch`]: the merged tokens plus whether the patch was
/// accepted cleanly
#[derive(Debug, Clone, PartialEq)]
pub struct Patched {
    /// The base with the patch's accepted fields applied
    pub tokens: TokenSet,
    /// True iff every field the patch did supply satisfied its constraint
    /// (missing fields are fine for a patch)
    pub clean: bool,
}

/// Tracks what happened while walking the input against the schema
#[derive(Debug, Default, Clone, Copy)]
struct Acceptance {
    missing: bool,
    invalid: bool,
}

impl Acceptance {
    fn miss(&mut self) {
        self.missing = true;
    }

    fn reject(&mut self) {
        self.invalid = true;
    }

    fn fully_valid(&self) -> bool {
        !self.missing && !self.invalid
    }

    fn clean(&self) -> bool {
        !self.invalid
    }
}

/// Normalize arbitrary input into a complete token set.
///
/// Total: any input, including `null`, arrays, and deeply malformed
/// objects, produces a valid token set. Invalid or absent fields take the
/// default value.
pub fn normalize(raw: &Value) -> TokenSet {
    merge_onto(&default_tokens(), raw).0
}

/// Normalize and report whether the whole input was already fully valid.
pub fn try_normalize(raw: &Value) -> Normalized {
    let (tokens, acceptance) = merge_onto(&default_tokens(), raw);
    if !acceptance.fully_valid() {
        tracing::debug!("token input required fallback during normalization");
    }
    Normalized {
        tokens,
        valid: acceptance.fully_valid(),
    }
}

/// Merge a partial token patch onto an already-valid base.
///
/// Used for theme updates: the stored tokens are the base and the editor's
/// partial override is the patch. `clean` is false when the patch supplied
/// a value that failed its constraint, which callers treat as a rejectable
/// submission rather than a silent downgrade.
pub fn merge_patch(base: &TokenSet, raw: &Value) -> Patched {
    let (tokens, acceptance) = merge_onto(base, raw);
    Patched {
        tokens,
        clean: acceptance.clean(),
    }
}

fn merge_onto(base: &TokenSet, raw: &Value) -> (TokenSet, Acceptance) {
    let mut out = base.clone();
    let mut acc = Acceptance::default();

    let Some(root) = raw.as_object() else {
        // Structural failure at the top level: the base survives unchanged.
        acc.miss();
        acc.reject();
        return (out, acc);
    };

    merge_fonts(&mut out.fonts, root.get("fonts"), &mut acc);
    merge_type(&mut out.type_, root.get("type"), &mut acc);
    merge_colors(&mut out.colors, root.get("colors"), &mut acc);
    merge_links(&mut out.links, root.get("links"), &mut acc);
    merge_rules(&mut out.rules, root.get("rules"), &mut acc);

    (out, acc)
}

// =============================================================================
// Per-group merges
// =============================================================================

fn merge_fonts(out: &mut FontTokens, raw: Option<&Value>, acc: &mut Acceptance) {
    let Some(group) = group_object(raw, acc) else {
        return;
    };
    take_string(group, "sans", &mut out.sans, acc);
    take_string(group, "serif", &mut out.serif, acc);
    take_string(group, "mono", &mut out.mono, acc);
    take_string(group, "body", &mut out.body, acc);
    take_string(group, "headings", &mut out.headings, acc);
    take_string(group, "code", &mut out.code, acc);
    take_bool(group, "opticalSizing", &mut out.optical_sizing, acc);
    take_bool(group, "liga", &mut out.liga, acc);
}

fn merge_type(out: &mut TypeTokens, raw: Option<&Value>, acc: &mut Acceptance) {
    let Some(group) = group_object(raw, acc) else {
        return;
    };
    take_number(group, "basePx", limits::BASE_PX, &mut out.base_px, acc);
    take_number(group, "leading", limits::LEADING, &mut out.leading, acc);
    take_number(group, "maxCh", limits::MAX_CH, &mut out.max_ch, acc);
    take_number(group, "hScale", limits::H_SCALE, &mut out.h_scale, acc);
    take_number(group, "paraSpace", limits::PARA_SPACE, &mut out.para_space, acc);
}

fn merge_colors(out: &mut ColorTokens, raw: Option<&Value>, acc: &mut Acceptance) {
    let Some(group) = group_object(raw, acc) else {
        return;
    };
    merge_mode_colors(&mut out.light, group.get("light"), acc);
    merge_mode_colors(&mut out.dark, group.get("dark"), acc);
    merge_mode_colors(&mut out.hc, group.get("hc"), acc);
}

fn merge_mode_colors(out: &mut ModeColors, raw: Option<&Value>, acc: &mut Acceptance) {
    let Some(group) = group_object(raw, acc) else {
        return;
    };
    take_string(group, "bg", &mut out.bg, acc);
    take_string(group, "text", &mut out.text, acc);
    take_string(group, "muted", &mut out.muted, acc);
    take_string(group, "accent", &mut out.accent, acc);
}

fn merge_links(out: &mut LinkTokens, raw: Option<&Value>, acc: &mut Acceptance) {
    let Some(group) = group_object(raw, acc) else {
        return;
    };
    take_bool(group, "underline", &mut out.underline, acc);
    take_number(group, "offset", limits::LINK_OFFSET, &mut out.offset, acc);
    take_number(
        group,
        "thickness",
        limits::LINK_THICKNESS,
        &mut out.thickness,
        acc,
    );
}

fn merge_rules(out: &mut RuleTokens, raw: Option<&Value>, acc: &mut Acceptance) {
    let Some(group) = group_object(raw, acc) else {
        return;
    };
    take_hyphens(group, "hyphens", &mut out.hyphens, acc);
    take_integer(group, "orphans", limits::ORPHANS, &mut out.orphans, acc);
    take_integer(group, "widows", limits::WIDOWS, &mut out.widows, acc);
}

// =============================================================================
// Field takers
// =============================================================================

/// Resolve a group value to an object, or record why it cannot be merged.
///
/// Missing group: every leaf in it falls back, recorded as missing.
/// Non-object group (arrays included): the whole subtree falls back,
/// recorded as invalid.
fn group_object<'a>(raw: Option<&'a Value>, acc: &mut Acceptance) -> Option<&'a Map<String, Value>> {
    match raw {
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            acc.reject();
            None
        }
        None => {
            acc.miss();
            None
        }
    }
}

fn take_string(group: &Map<String, Value>, key: &str, slot: &mut String, acc: &mut Acceptance) {
    match group.get(key) {
        Some(Value::String(s)) if !s.is_empty() => *slot = s.clone(),
        Some(_) => acc.reject(),
        None => acc.miss(),
    }
}

fn take_bool(group: &Map<String, Value>, key: &str, slot: &mut bool, acc: &mut Acceptance) {
    match group.get(key) {
        Some(Value::Bool(b)) => *slot = *b,
        Some(_) => acc.reject(),
        None => acc.miss(),
    }
}

fn take_number(
    group: &Map<String, Value>,
    key: &str,
    range: (f64, f64),
    slot: &mut f64,
    acc: &mut Acceptance,
) {
    match group.get(key).and_then(Value::as_f64) {
        Some(n) if n >= range.0 && n <= range.1 => *slot = n,
        Some(_) => acc.reject(),
        None => match group.get(key) {
            Some(_) => acc.reject(),
            None => acc.miss(),
        },
    }
}

fn take_integer(
    group: &Map<String, Value>,
    key: &str,
    range: (i64, i64),
    slot: &mut i64,
    acc: &mut Acceptance,
) {
    match group.get(key).and_then(Value::as_f64) {
        Some(n) if n.fract() == 0.0 && (n as i64) >= range.0 && (n as i64) <= range.1 => {
            *slot = n as i64
        }
        Some(_) => acc.reject(),
        None => match group.get(key) {
            Some(_) => acc.reject(),
            None => acc.miss(),
        },
    }
}

fn take_hyphens(group: &Map<String, Value>, key: &str, slot: &mut Hyphens, acc: &mut Acceptance) {
    match group.get(key) {
        Some(Value::String(s)) => match s.parse::<Hyphens>() {
            Ok(mode) => *slot = mode,
            Err(_) => acc.reject(),
        },
        Some(_) => acc.reject(),
        None => acc.miss(),
    }
}
