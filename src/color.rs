//! Accent color identifiers and the preference-value normalizer.
//!
//! The declaration order of [`AccentColor::ALL`] doubles as the tie-break
//! priority for the substring fallback in [`normalize`]. Keep it as is.

use std::fmt;
use std::str::FromStr;

/// One of the nine colors the prompt configuration ships variants for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccentColor {
    #[default]
    Green,
    Blue,
    Slate,
    Pink,
    Red,
    Orange,
    Yellow,
    Teal,
    Purple,
}

impl AccentColor {
    /// Every known color, in priority order.
    pub const ALL: [AccentColor; 9] = [
        AccentColor::Green,
        AccentColor::Blue,
        AccentColor::Slate,
        AccentColor::Pink,
        AccentColor::Red,
        AccentColor::Orange,
        AccentColor::Yellow,
        AccentColor::Teal,
        AccentColor::Purple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Slate => "slate",
            Self::Pink => "pink",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Teal => "teal",
            Self::Purple => "purple",
        }
    }

    fn from_exact(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used for explicit user input; no fuzzy matching.
impl FromStr for AccentColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::from_exact(&lowered).ok_or_else(|| {
            let known = Self::ALL.map(AccentColor::as_str).join(", ");
            format!("unknown color `{s}` (expected one of: {known})")
        })
    }
}

/// Map a raw preference value onto a known color.
///
/// Tolerates quoting (`'blue'`), leading non-letters (`#`, digits) and
/// vendor-prefixed values such as `preset-blue-dark`. Anything that cannot be
/// matched falls back to [`AccentColor::Green`].
pub fn normalize(value: Option<&str>) -> AccentColor {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return AccentColor::default();
    };
    let lowered = value.to_lowercase();

    let candidate = first_letter_run(value)
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| lowered.clone());
    if let Some(color) = AccentColor::from_exact(&candidate) {
        return color;
    }

    AccentColor::ALL
        .into_iter()
        .find(|c| lowered.contains(c.as_str()))
        .unwrap_or_default()
}

fn first_letter_run(value: &str) -> Option<&str> {
    let start = value.find(|c: char| c.is_ascii_alphabetic())?;
    let rest = &value[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}
