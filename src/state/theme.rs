//! Theme tables for the themed shuffle.

use std::collections::BTreeMap;

/// A themed shuffle's pool restrictions.
///
/// `rules` maps a category id to the item labels that category may draw from
/// under this theme. Categories with no rule keep their full eligible pool.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    /// Stable theme id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Category id -> allowed item labels.
    pub rules: BTreeMap<String, Vec<String>>,
}

impl Theme {
    /// Build a theme from `(category id, allowed labels)` pairs.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        rules: &[(&str, &[&str])],
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rules: rules
                .iter()
                .map(|(cat, labels)| {
                    (
                        (*cat).to_string(),
                        labels.iter().map(|l| (*l).to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

/// The three stock themes.
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme::new(
            "cosmic",
            "Cosmic",
            &[
                (
                    "background",
                    &[
                        "Midnight",
                        "Sunset Drive",
                        "Neon Cyber",
                        "Midnight City",
                        "Lava Flow",
                    ][..],
                ),
                ("body", &["Chrome", "Ghost", "Alien", "Robot"][..]),
                ("vibe", &["Matrix", "Dreamy"][..]),
                ("eyes", &["White", "Teal", "Yellow"][..]),
            ],
        ),
        Theme::new(
            "tough",
            "Tough",
            &[
                (
                    "background",
                    &["Midnight", "Charcoal", "Crimson", "Lava Flow"][..],
                ),
                ("body", &["Black", "Tiger", "Camo", "Zombie"][..]),
                ("shirt", &["Biker", "SWAT", "Hilfiger"][..]),
                ("hat", &["Army", "Police", "Viking"][..]),
                ("vibe", &["Noir"][..]),
            ],
        ),
        Theme::new(
            "party",
            "Party",
            &[
                (
                    "background",
                    &["Cat Yellow", "Emerald", "Hot Pink", "Cotton Candy"][..],
                ),
                ("body", &["Rainbow", "Gold"][..]),
                ("vibe", &["Vibrant"][..]),
                ("speech", &["GM", "WAGMI", "Meow"][..]),
            ],
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/state/theme.rs"]
mod tests;
