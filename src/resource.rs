//! Resources module.
//!
//! A [`Resource`] is a consumable pool (health, mana, stamina). Its ceiling
//! is an [`Attribute`], so equipment and spells raise or lower the maximum
//! through ordinary modifiers, while the current amount is spent and
//! restored with [`take`](Resource::take) and [`give`](Resource::give).

use crate::attribute::{Attribute, AttributeRecord};
use crate::error::StatError;
use crate::modifier::Modifier;
use crate::numeric::{self, StatValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A current amount bounded by an attribute-driven ceiling.
///
/// `current` is clamped into `[0, max]` whenever it is written. When the
/// ceiling shrinks (a buff expires, an item is unequipped), reads of
/// [`current`](Self::current) report the new ceiling without any explicit
/// resync.
///
/// # Examples
///
/// ```rust
/// use piecestat::{Modifier, Resource};
///
/// let mut health = Resource::with_current("health", 100.0, 50.0);
/// health.give(1000.0)?;
/// assert_eq!(health.current(), 100.0);
///
/// health.add_modifier(Modifier::flat("fortify", 20.0).with_duration(1));
/// health.refill();
/// assert_eq!(health.current(), 120.0);
///
/// health.tick();
/// assert_eq!(health.current(), 100.0);
/// # Ok::<(), piecestat::StatError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ResourceRecord", into = "ResourceRecord")]
pub struct Resource {
    attribute: Attribute,
    current: StatValue,
}

impl Resource {
    /// Create a full resource: the current amount starts at `base_value`.
    pub fn new(name: impl Into<String>, base_value: StatValue) -> Self {
        Self::with_current(name, base_value, base_value)
    }

    /// Create a resource with an explicit starting amount.
    pub fn with_current(name: impl Into<String>, base_value: StatValue, current: StatValue) -> Self {
        Self::from_attribute(Attribute::new(name, base_value), current)
    }

    /// Wrap an existing attribute as the ceiling of a resource.
    pub fn from_attribute(attribute: Attribute, current: StatValue) -> Self {
        let mut resource = Self {
            attribute,
            current: 0.0,
        };
        resource.set_current(current);
        resource
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    /// The ceiling attribute.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// Mutable access to the ceiling attribute.
    ///
    /// Lowering the ceiling this way is picked up by the next
    /// [`current`](Self::current) read.
    pub fn attribute_mut(&mut self) -> &mut Attribute {
        &mut self.attribute
    }

    pub fn base_value(&self) -> StatValue {
        self.attribute.base_value()
    }

    pub fn set_base_value(&mut self, base_value: StatValue) {
        self.attribute.set_base_value(base_value);
    }

    /// The ceiling: the attribute's clamped effective value.
    pub fn max(&self) -> StatValue {
        self.attribute.value()
    }

    /// The current amount, clamped into `[0, max]` against the live ceiling.
    ///
    /// A ceiling below zero reads as an empty pool.
    pub fn current(&self) -> StatValue {
        numeric::clamp_between(self.current, 0.0, self.max())
    }

    /// Set the current amount, clamped into `[0, max]`.
    pub fn set_current(&mut self, current: StatValue) {
        self.current = numeric::clamp_between(current, 0.0, self.max());
    }

    /// Spend `amount`. Fails with `InvalidArgument` on a negative or NaN
    /// amount and leaves the current amount untouched.
    pub fn take(&mut self, amount: StatValue) -> Result<(), StatError> {
        self.check_amount("take", amount)?;
        self.set_current(self.current() - amount);
        Ok(())
    }

    /// Restore `amount`. Fails with `InvalidArgument` on a negative or NaN
    /// amount and leaves the current amount untouched.
    pub fn give(&mut self, amount: StatValue) -> Result<(), StatError> {
        self.check_amount("give", amount)?;
        self.set_current(self.current() + amount);
        Ok(())
    }

    pub fn is_depleted(&self) -> bool {
        self.current() <= 0.0
    }

    /// Reset the current amount to exactly the ceiling.
    pub fn refill(&mut self) {
        self.current = self.max();
    }

    /// Current amount as a share of the ceiling, `0.0` when the ceiling is
    /// zero.
    pub fn fraction(&self) -> StatValue {
        let max = self.max();
        if max > 0.0 {
            self.current() / max
        } else {
            0.0
        }
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.attribute.add_modifier(modifier);
    }

    pub fn remove_modifier(&mut self, name: &str) -> bool {
        self.attribute.remove_modifier(name)
    }

    pub fn remove_modifiers_by_source(&mut self, source: &str) -> bool {
        self.attribute.remove_modifiers_by_source(source)
    }

    /// Advance the ceiling's modifiers by one tick.
    pub fn tick(&mut self) -> Vec<Modifier> {
        self.attribute.tick()
    }

    /// Serialize into the plain nested map used for persistence.
    pub fn to_value(&self) -> Result<serde_json::Value, StatError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a resource from [`to_value`](Self::to_value) output.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StatError> {
        Ok(serde_json::from_value(value)?)
    }

    fn check_amount(&self, operation: &str, amount: StatValue) -> Result<(), StatError> {
        if amount.is_nan() || amount < 0.0 {
            warn!(resource = self.name(), operation, amount, "rejected resource amount");
            return Err(StatError::InvalidArgument(format!(
                "cannot {} {} {}: amount must be non-negative",
                operation,
                amount,
                self.name()
            )));
        }
        Ok(())
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute && self.current() == other.current()
    }
}

/// Persistence shape of a [`Resource`]: the attribute record plus `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResourceRecord {
    #[serde(flatten)]
    attribute: AttributeRecord,
    current: StatValue,
}

impl From<Resource> for ResourceRecord {
    fn from(resource: Resource) -> Self {
        let current = resource.current();
        Self {
            attribute: resource.attribute.into(),
            current,
        }
    }
}

impl TryFrom<ResourceRecord> for Resource {
    type Error = StatError;

    fn try_from(record: ResourceRecord) -> Result<Self, Self::Error> {
        let attribute = Attribute::try_from(record.attribute)?;
        Ok(Resource::from_attribute(attribute, record.current))
    }
}
