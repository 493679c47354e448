//! Advisory structure checks on generated command lists.
//!
//! Warnings never block or alter an answer; they are returned alongside it.

use switchbot_core::brand::Brand;

/// An expected opening command, searched for in the first `within` lines.
struct Opening {
    needle: &'static str,
    within: usize,
}

/// Expected opening and closing commands for one brand.
struct Structure {
    opening: Opening,
    /// Any of these anywhere in the answer satisfies the closing check.
    closing: &'static [&'static str],
    closing_label: &'static str,
}

fn structure(brand: Brand) -> Structure {
    match brand {
        Brand::Cisco => Structure {
            opening: Opening {
                needle: "enable",
                within: 3,
            },
            closing: &["write memory", "copy run"],
            closing_label: "write memory",
        },
        Brand::Juniper => Structure {
            opening: Opening {
                needle: "configure",
                within: 2,
            },
            closing: &["commit"],
            closing_label: "commit",
        },
        Brand::Hpe => Structure {
            opening: Opening {
                needle: "configure terminal",
                within: 2,
            },
            closing: &[],
            closing_label: "",
        },
    }
}

/// Check `answer` against `brand`'s expected structure.
///
/// Matching is case-insensitive substring search per line.
pub fn validate(brand: Brand, answer: &str) -> Vec<String> {
    let lines: Vec<String> = answer.trim().lines().map(str::to_lowercase).collect();
    let rules = structure(brand);
    let mut warnings = Vec::new();

    let opens = lines
        .iter()
        .take(rules.opening.within)
        .any(|l| l.contains(rules.opening.needle));
    if !opens {
        warnings.push(format!("⚠️ Should start with '{}'", rules.opening.needle));
    }

    if !rules.closing.is_empty() {
        let closes = lines
            .iter()
            .any(|l| rules.closing.iter().any(|c| l.contains(c)));
        if !closes {
            warnings.push(format!("⚠️ Should end with '{}'", rules.closing_label));
        }
    }

    warnings
}
