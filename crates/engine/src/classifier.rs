//! Brand classification — maps a free-text request to a vendor dialect.
//!
//! Resolution order:
//!
//! 1. **Keyword** — substring match against the Cisco, Juniper and HPE
//!    keyword sets, first matching set wins in that order.
//! 2. **Equivalence cue** — "same as …" phrasing paired with a brand word.
//! 3. **Session continuity** — the brand of the most recent assistant turn.
//! 4. **Default** — Cisco.
//!
//! Classification is total: every input yields exactly one [`Brand`].

use serde::Serialize;
use switchbot_core::brand::Brand;
use switchbot_core::message::{Role, Turn};

const CISCO_KEYWORDS: &[&str] = &["cisco", "ios", "catalyst"];
const JUNIPER_KEYWORDS: &[&str] = &["juniper", "junos", "jumper", "junipeur"];
const HPE_KEYWORDS: &[&str] = &["hp", "aruba", "hpe", "procurve"];

const EQUIVALENCE_CUES: &[&str] = &["pareil", "même", "identique", "same", "identical"];

/// Brand words consulted once an equivalence cue is present, in order.
const CUE_BRANDS: &[(Brand, &[&str])] = &[
    (Brand::Juniper, &["juniper", "junos", "jumper"]),
    (Brand::Hpe, &["hp", "hpe", "aruba"]),
    (Brand::Cisco, &["cisco"]),
];

/// How a brand was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Keyword,
    EquivalenceCue,
    SessionContinuity,
    Default,
}

/// Result of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub brand: Brand,
    pub resolution: Resolution,
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Keyword-only detection. `None` when no keyword set matches.
pub fn detect_brand(text: &str) -> Option<Brand> {
    let text = text.to_lowercase();
    [
        (Brand::Cisco, CISCO_KEYWORDS),
        (Brand::Juniper, JUNIPER_KEYWORDS),
        (Brand::Hpe, HPE_KEYWORDS),
    ]
    .into_iter()
    .find(|(_, words)| contains_any(&text, words))
    .map(|(brand, _)| brand)
}

/// Brand named alongside an equivalence cue ("same thing on junos").
fn equivalence_brand(text: &str) -> Option<Brand> {
    if !contains_any(text, EQUIVALENCE_CUES) {
        return None;
    }
    CUE_BRANDS
        .iter()
        .find(|(_, words)| contains_any(text, words))
        .map(|(brand, _)| *brand)
}

/// Brand of the most recent assistant turn that carries one.
fn continuity_brand(turns: &[Turn]) -> Option<Brand> {
    turns
        .iter()
        .rev()
        .filter(|t| t.role == Role::Assistant)
        .find_map(|t| t.brand)
}

/// Classify `query` given the session's prior turns (oldest first).
pub fn classify(query: &str, prior_turns: &[Turn]) -> Classification {
    if let Some(brand) = detect_brand(query) {
        return Classification {
            brand,
            resolution: Resolution::Keyword,
        };
    }

    let text = query.to_lowercase();
    if let Some(brand) = equivalence_brand(&text) {
        return Classification {
            brand,
            resolution: Resolution::EquivalenceCue,
        };
    }

    if let Some(brand) = continuity_brand(prior_turns) {
        return Classification {
            brand,
            resolution: Resolution::SessionContinuity,
        };
    }

    Classification {
        brand: Brand::Cisco,
        resolution: Resolution::Default,
    }
}
