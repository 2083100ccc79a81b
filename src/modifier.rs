//! Modifiers module.
//!
//! A modifier is one adjustment applied to an attribute: a flat bonus, a
//! percentage, or a multiplier. Modifiers are plain values except for their
//! remaining duration, which counts down once per game tick.

use crate::numeric::StatValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Origin tag given to modifiers created without an explicit source.
pub const GLOBAL_SOURCE: &str = "global";

/// How a modifier combines with the value it is applied to.
///
/// Attributes apply every `Flat` modifier first, then every `Percentage`,
/// then every `Multiplier`. [`ModifierKind::ALL`] lists the kinds in that
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    /// Adds the magnitude.
    Flat,
    /// Scales by `1 + magnitude / 100`.
    Percentage,
    /// Scales by the magnitude.
    Multiplier,
}

impl ModifierKind {
    /// Every kind, in stacking order.
    pub const ALL: [ModifierKind; 3] = [
        ModifierKind::Flat,
        ModifierKind::Percentage,
        ModifierKind::Multiplier,
    ];
}

/// A single named adjustment to an attribute.
///
/// # Examples
///
/// ```rust
/// use piecestat::Modifier;
///
/// let bonus = Modifier::percentage("war_cry", 20.0)
///     .with_source("banner")
///     .with_duration(3);
///
/// assert_eq!(bonus.apply(110.0), 132.0);
/// assert_eq!(bonus.source(), "banner");
/// assert_eq!(bonus.remaining(), Some(3));
/// assert_eq!(bonus.to_string(), "+20%");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    name: String,
    magnitude: StatValue,
    kind: ModifierKind,
    #[serde(default = "global_source", deserialize_with = "source_or_global")]
    source: String,
    #[serde(default)]
    duration: Option<u32>,
}

fn global_source() -> String {
    GLOBAL_SOURCE.to_string()
}

fn source_or_global<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(global_source))
}

impl Modifier {
    /// Create a permanent modifier with the global source.
    pub fn new(name: impl Into<String>, magnitude: StatValue, kind: ModifierKind) -> Self {
        Self {
            name: name.into(),
            magnitude,
            kind,
            source: global_source(),
            duration: None,
        }
    }

    /// A flat bonus (or penalty, when negative).
    pub fn flat(name: impl Into<String>, magnitude: StatValue) -> Self {
        Self::new(name, magnitude, ModifierKind::Flat)
    }

    /// A percentage change: `20.0` means +20%.
    pub fn percentage(name: impl Into<String>, magnitude: StatValue) -> Self {
        Self::new(name, magnitude, ModifierKind::Percentage)
    }

    /// A straight multiplier: `2.0` doubles the value.
    pub fn multiplier(name: impl Into<String>, magnitude: StatValue) -> Self {
        Self::new(name, magnitude, ModifierKind::Multiplier)
    }

    /// Tag the modifier with an origin, such as an item id.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Limit the modifier to a number of ticks.
    pub fn with_duration(mut self, ticks: u32) -> Self {
        self.duration = Some(ticks);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn magnitude(&self) -> StatValue {
        self.magnitude
    }

    pub fn kind(&self) -> ModifierKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Remaining ticks, or `None` for a permanent modifier.
    pub fn remaining(&self) -> Option<u32> {
        self.duration
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }

    /// Apply this modifier to a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use piecestat::Modifier;
    ///
    /// assert_eq!(Modifier::flat("a", 10.0).apply(100.0), 110.0);
    /// assert_eq!(Modifier::percentage("b", -50.0).apply(100.0), 50.0);
    /// assert_eq!(Modifier::multiplier("c", 2.0).apply(100.0), 200.0);
    /// ```
    pub fn apply(&self, value: StatValue) -> StatValue {
        match self.kind {
            ModifierKind::Flat => value + self.magnitude,
            ModifierKind::Percentage => value * (1.0 + self.magnitude / 100.0),
            ModifierKind::Multiplier => value * self.magnitude,
        }
    }

    /// Advance the duration by one tick.
    ///
    /// Returns true when the modifier has run out and should be removed.
    /// Permanent modifiers never expire.
    pub fn tick(&mut self) -> bool {
        match self.duration.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ModifierKind::Flat => write!(f, "{:+}", self.magnitude),
            ModifierKind::Percentage => write!(f, "{:+}%", self.magnitude),
            ModifierKind::Multiplier => write!(f, "x{}", self.magnitude),
        }
    }
}
