//! Computation traces for attributes.
//!
//! Contains the `Breakdown` type, a read-only record of how an attribute's
//! effective value was reached. Useful for tooltips and debugging.

use crate::numeric::StatValue;
use serde::{Deserialize, Serialize};

/// Step-by-step trace of an attribute's value.
///
/// Each step is `(description, value_after_step)`. Steps appear in the order
/// they were applied: every flat modifier, then every percentage, then every
/// multiplier, then a clamp step if the bounds changed the result.
///
/// # Examples
///
/// ```rust
/// use piecestat::{Attribute, Modifier};
///
/// let mut damage = Attribute::new("damage", 100.0);
/// damage.add_modifier(Modifier::flat("sword", 10.0));
/// damage.add_modifier(Modifier::percentage("rage", 20.0));
///
/// let trace = damage.breakdown();
/// assert_eq!(trace.base_value, 100.0);
/// assert_eq!(trace.steps.len(), 2);
/// assert_eq!(trace.steps[0], ("sword +10".to_string(), 110.0));
/// assert_eq!(trace.value, 132.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Breakdown {
    /// Name of the traced attribute.
    pub name: String,

    /// Value before any modifier.
    pub base_value: StatValue,

    /// Applied steps in order.
    pub steps: Vec<(String, StatValue)>,

    /// Final, clamped value.
    pub value: StatValue,
}

impl Breakdown {
    pub(crate) fn new(name: impl Into<String>, base_value: StatValue) -> Self {
        Self {
            name: name.into(),
            base_value,
            steps: Vec::new(),
            value: base_value,
        }
    }

    pub(crate) fn push(&mut self, description: impl Into<String>, value: StatValue) {
        self.steps.push((description.into(), value));
        self.value = value;
    }

    /// True when no modifier or clamp touched the base value.
    pub fn is_unmodified(&self) -> bool {
        self.steps.is_empty()
    }
}
