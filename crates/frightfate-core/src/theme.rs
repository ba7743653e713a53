//! Narrative archetypes a session can be played in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The horror archetype bound to a session at creation time.
///
/// Unrecognised theme names are preserved as [`Theme::Custom`] so they can
/// still be shown to players; narrative code treats them generically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    /// A cursed Victorian mansion.
    #[default]
    HauntedHouse,
    /// A zombie-overrun post-apocalypse.
    ZombieOutbreak,
    /// A masked killer stalking victims.
    SlasherMovie,
    /// An extraterrestrial invasion.
    AlienInvasion,
    /// Something ancient awake in a deep ocean research facility.
    DeepSeaTerror,
    /// Any other theme name.
    Custom(String),
}

impl Theme {
    /// Every built-in theme, in display order.
    pub const BUILT_IN: [Theme; 5] = [
        Theme::HauntedHouse,
        Theme::ZombieOutbreak,
        Theme::SlasherMovie,
        Theme::AlienInvasion,
        Theme::DeepSeaTerror,
    ];

    /// Parses a snake_case theme name. Never fails.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "haunted_house" => Self::HauntedHouse,
            "zombie_outbreak" => Self::ZombieOutbreak,
            "slasher_movie" => Self::SlasherMovie,
            "alien_invasion" => Self::AlienInvasion,
            "deep_sea_terror" => Self::DeepSeaTerror,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// The snake_case name used on the wire and in storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::HauntedHouse => "haunted_house",
            Self::ZombieOutbreak => "zombie_outbreak",
            Self::SlasherMovie => "slasher_movie",
            Self::AlienInvasion => "alien_invasion",
            Self::DeepSeaTerror => "deep_sea_terror",
            Self::Custom(name) => name,
        }
    }

    /// Human-readable name ("haunted house").
    #[must_use]
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// One-sentence archetype description used when prompting the oracle.
    #[must_use]
    pub fn archetype_description(&self) -> &'static str {
        match self {
            Self::HauntedHouse => {
                "a cursed Victorian mansion with supernatural entities, moving objects, and dark family secrets"
            }
            Self::ZombieOutbreak => {
                "a post-apocalyptic world overrun by zombies where survivors must make tough choices"
            }
            Self::SlasherMovie => {
                "a classic 80s horror movie scenario with a masked killer stalking victims"
            }
            Self::AlienInvasion => {
                "an extraterrestrial invasion where humanity fights for survival"
            }
            Self::DeepSeaTerror => {
                "a deep ocean research facility where something ancient has awakened"
            }
            Self::Custom(_) => "a generic horror scenario",
        }
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.as_str().to_owned()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognises_every_built_in_theme() {
        for theme in Theme::BUILT_IN {
            assert_eq!(Theme::parse(theme.as_str()), theme);
        }
    }

    #[test]
    fn test_unknown_theme_keeps_name_and_gets_generic_description() {
        let theme = Theme::parse("clown_carnival");

        assert_eq!(theme, Theme::Custom("clown_carnival".to_owned()));
        assert_eq!(theme.display_name(), "clown carnival");
        assert_eq!(theme.archetype_description(), "a generic horror scenario");
    }

    #[test]
    fn test_theme_serializes_as_plain_string() {
        let json = serde_json::to_value(Theme::DeepSeaTerror).unwrap();
        assert_eq!(json, serde_json::json!("deep_sea_terror"));

        let parsed: Theme = serde_json::from_value(serde_json::json!("zombie_outbreak")).unwrap();
        assert_eq!(parsed, Theme::ZombieOutbreak);
    }
}
