//! Collection document id computation.
//!
//! A document id is `prefix + identifier + suffix`. The identifier is the
//! caller-supplied one, the schema's default, or randomly generated; the
//! affixes come from caller overrides or the schema's [`AffixRule`].

use strata_schema::AffixRule;
use strata_types::{generate_id, ValueMap};

/// Apply affixes to an identifier.
///
/// Caller overrides win per side; otherwise the rule's affix is resolved;
/// a side with neither stays empty.
pub fn affixed_id(
    identifier: &str,
    prefix_override: Option<&str>,
    suffix_override: Option<&str>,
    rule: Option<&AffixRule>,
) -> String {
    let prefix = prefix_override
        .map(str::to_string)
        .or_else(|| rule.and_then(|r| r.prefix.as_ref()).map(|p| p.resolve()))
        .unwrap_or_default();
    let suffix = suffix_override
        .map(str::to_string)
        .or_else(|| rule.and_then(|r| r.suffix.as_ref()).map(|s| s.resolve()))
        .unwrap_or_default();
    format!("{prefix}{identifier}{suffix}")
}

/// Compute a fresh document id that is not already a key of `existing`.
///
/// The schema's default identifier is tried first; after that, random
/// identifiers are drawn until one is unused.
pub fn fresh_id(rule: Option<&AffixRule>, existing: &ValueMap) -> String {
    if let Some(default) = rule.and_then(|r| r.default.as_deref()) {
        let candidate = affixed_id(default, None, None, rule);
        if !existing.contains_key(&candidate) {
            return candidate;
        }
    }
    loop {
        let candidate = affixed_id(&generate_id(), None, None, rule);
        if !existing.contains_key(&candidate) {
            return candidate;
        }
    }
}
