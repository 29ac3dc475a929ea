//! Accessibility trait bitmasks and the token vocabulary.
//!
//! Queries name traits by token (`"button"`, `"link"`, ...); elements carry
//! the same flags as a bitmask. Matching is a superset test: an element
//! satisfies a trait query iff it carries every requested flag.

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::result::{BuscarError, BuscarResult};

/// A set of accessibility capability flags attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessibilityTraits(u64);

impl AccessibilityTraits {
    /// The empty trait set (token `"none"`)
    pub const NONE: Self = Self(0);
    /// Button
    pub const BUTTON: Self = Self(1);
    /// Link
    pub const LINK: Self = Self(1 << 1);
    /// Search field
    pub const SEARCH_FIELD: Self = Self(1 << 2);
    /// Image
    pub const IMAGE: Self = Self(1 << 3);
    /// Selected
    pub const SELECTED: Self = Self(1 << 4);
    /// Plays a sound when activated
    pub const PLAYS_SOUND: Self = Self(1 << 5);
    /// Keyboard key
    pub const KEYBOARD_KEY: Self = Self(1 << 6);
    /// Static text
    pub const STATIC_TEXT: Self = Self(1 << 7);
    /// Summary element
    pub const SUMMARY_ELEMENT: Self = Self(1 << 8);
    /// Not enabled
    pub const NOT_ENABLED: Self = Self(1 << 9);
    /// Updates frequently
    pub const UPDATES_FREQUENTLY: Self = Self(1 << 10);
    /// Starts a media session when activated
    pub const STARTS_MEDIA_SESSION: Self = Self(1 << 11);
    /// Adjustable
    pub const ADJUSTABLE: Self = Self(1 << 12);
    /// Allows direct interaction
    pub const ALLOWS_DIRECT_INTERACTION: Self = Self(1 << 13);
    /// Causes a page turn when scrolled
    pub const CAUSES_PAGE_TURN: Self = Self(1 << 14);
    /// Tab bar
    pub const TAB_BAR: Self = Self(1 << 15);

    /// Create the empty trait set
    #[must_use]
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Raw bit representation
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether no flag is set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Superset test: whether every flag in `other` is also set in `self`
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bitwise union of two trait sets
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Translate a sequence of trait tokens into their combined bitmask.
    ///
    /// The token `"none"` contributes no bits and is valid anywhere in the
    /// sequence. Any token outside the vocabulary fails the translation.
    pub fn from_tokens<I, S>(tokens: I) -> BuscarResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = Self::NONE;
        for token in tokens {
            mask |= Self::from_token(token.as_ref())?;
        }
        Ok(mask)
    }

    #[cfg(test)]
    pub(crate) const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    fn from_token(token: &str) -> BuscarResult<Self> {
        Ok(match token {
            "none" => Self::NONE,
            "button" => Self::BUTTON,
            "link" => Self::LINK,
            "searchField" => Self::SEARCH_FIELD,
            "image" => Self::IMAGE,
            "selected" => Self::SELECTED,
            "playsSound" => Self::PLAYS_SOUND,
            "keyboardKey" => Self::KEYBOARD_KEY,
            "staticText" => Self::STATIC_TEXT,
            "summaryElement" => Self::SUMMARY_ELEMENT,
            "notEnabled" => Self::NOT_ENABLED,
            "updatesFrequently" => Self::UPDATES_FREQUENTLY,
            "startsMediaSession" => Self::STARTS_MEDIA_SESSION,
            "adjustable" => Self::ADJUSTABLE,
            "allowsDirectInteraction" => Self::ALLOWS_DIRECT_INTERACTION,
            "causesPageTurn" => Self::CAUSES_PAGE_TURN,
            "tabBar" => Self::TAB_BAR,
            other => {
                return Err(BuscarError::UnknownTrait {
                    token: other.to_string(),
                })
            }
        })
    }
}

impl BitOr for AccessibilityTraits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for AccessibilityTraits {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}
