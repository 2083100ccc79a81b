//! Attributes module.
//!
//! An [`Attribute`] is one named number on an entity (damage, move range,
//! health ceiling) built from a base value and a set of [`Modifier`]s. The
//! effective value is computed lazily and cached until the next mutation.
//!
//! Modifiers stack in three stages: every flat modifier, then every
//! percentage, then every multiplier. The result is clamped into the
//! attribute's bounds.

use crate::breakdown::Breakdown;
use crate::error::{EntryKind, StatError};
use crate::modifier::{Modifier, ModifierKind};
use crate::numeric::{self, StatValue, DEFAULT_MAX, DEFAULT_MIN};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// A base value plus active modifiers, with a cached effective value.
///
/// Modifiers are keyed by name; adding a modifier under an existing name
/// replaces it. Every modifier is also indexed by its source tag so that
/// everything one item or spell contributed can be removed in one call.
///
/// The cache lives in a [`Cell`], so reading [`value`](Self::value) takes
/// `&self`. An attribute can be moved between threads but not shared.
///
/// # Examples
///
/// ```rust
/// use piecestat::{Attribute, Modifier};
///
/// let mut damage = Attribute::new("damage", 100.0);
/// damage.add_modifier(Modifier::flat("sword", 10.0).with_source("item:7"));
/// damage.add_modifier(Modifier::percentage("rage", 20.0).with_duration(2));
/// damage.add_modifier(Modifier::multiplier("crit", 2.0));
///
/// // (100 + 10) * 1.2 * 2
/// assert_eq!(damage.value(), 264.0);
///
/// damage.remove_modifiers_by_source("item:7");
/// assert_eq!(damage.value(), 240.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AttributeRecord", into = "AttributeRecord")]
pub struct Attribute {
    name: String,
    base_value: StatValue,
    min_value: StatValue,
    max_value: StatValue,

    /// Active modifiers by name. Name order keeps recomputation deterministic.
    modifiers: BTreeMap<String, Modifier>,

    /// Inverse of `modifiers` by source tag. Never holds an empty bucket.
    source_index: BTreeMap<String, BTreeSet<String>>,

    /// `None` means dirty.
    cache: Cell<Option<StatValue>>,
}

impl Attribute {
    /// Create an attribute with the default bounds `[0, +inf]`.
    pub fn new(name: impl Into<String>, base_value: StatValue) -> Self {
        Self::with_bounds(name, base_value, DEFAULT_MIN, DEFAULT_MAX)
    }

    /// Create an attribute with explicit bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use piecestat::{Attribute, Modifier};
    ///
    /// let mut crit = Attribute::with_bounds("crit_chance", 0.5, 0.0, 0.75);
    /// crit.add_modifier(Modifier::multiplier("lucky", 2.0));
    /// assert_eq!(crit.value(), 0.75);
    /// ```
    pub fn with_bounds(
        name: impl Into<String>,
        base_value: StatValue,
        min_value: StatValue,
        max_value: StatValue,
    ) -> Self {
        Self {
            name: name.into(),
            base_value,
            min_value,
            max_value,
            modifiers: BTreeMap::new(),
            source_index: BTreeMap::new(),
            cache: Cell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_value(&self) -> StatValue {
        self.base_value
    }

    /// Replace the base value. The effective value is recomputed on the next
    /// read.
    pub fn set_base_value(&mut self, base_value: StatValue) {
        self.base_value = base_value;
        self.invalidate();
    }

    pub fn min_value(&self) -> StatValue {
        self.min_value
    }

    pub fn max_value(&self) -> StatValue {
        self.max_value
    }

    /// Replace both bounds.
    pub fn set_bounds(&mut self, min_value: StatValue, max_value: StatValue) {
        self.min_value = min_value;
        self.max_value = max_value;
        self.invalidate();
    }

    /// The effective value: base, then flat, percentage and multiplier
    /// modifiers, clamped into `[min_value, max_value]`.
    ///
    /// Cached until the base value, bounds, or modifier set change.
    pub fn value(&self) -> StatValue {
        if let Some(cached) = self.cache.get() {
            return cached;
        }
        let value = self.compute(None);
        trace!(attribute = %self.name, value, "recomputed attribute value");
        self.cache.set(Some(value));
        value
    }

    /// The effective value truncated toward zero, for whole-number displays.
    pub fn value_whole(&self) -> i64 {
        numeric::whole(self.value())
    }

    /// Whether the next [`value`](Self::value) read will recompute.
    pub fn is_cache_dirty(&self) -> bool {
        self.cache.get().is_none()
    }

    /// Trace how the effective value is reached.
    pub fn breakdown(&self) -> Breakdown {
        let mut breakdown = Breakdown::new(self.name.clone(), self.base_value);
        self.compute(Some(&mut breakdown));
        breakdown
    }

    /// Add a modifier, replacing any modifier with the same name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use piecestat::{Attribute, Modifier};
    ///
    /// let mut armor = Attribute::new("armor", 10.0);
    /// armor.add_modifier(Modifier::flat("shield", 5.0).with_source("left_hand"));
    /// armor.add_modifier(Modifier::flat("shield", 8.0).with_source("right_hand"));
    ///
    /// assert_eq!(armor.value(), 18.0);
    /// assert_eq!(armor.modifier_names_from("left_hand").count(), 0);
    /// assert_eq!(armor.modifier_names_from("right_hand").count(), 1);
    /// ```
    pub fn add_modifier(&mut self, modifier: Modifier) {
        if let Some(previous) = self.modifiers.remove(modifier.name()) {
            debug!(
                attribute = %self.name,
                modifier = previous.name(),
                "replacing modifier"
            );
            self.unindex(&previous);
        }
        self.index(&modifier);
        self.modifiers.insert(modifier.name().to_string(), modifier);
        self.invalidate();
    }

    /// Remove a modifier by name. Returns whether anything was removed.
    pub fn remove_modifier(&mut self, name: &str) -> bool {
        self.take_modifier(name).is_some()
    }

    /// Remove a modifier by name, failing with `NotFound` if it is absent.
    pub fn remove_modifier_checked(&mut self, name: &str) -> Result<Modifier, StatError> {
        self.take_modifier(name)
            .ok_or_else(|| StatError::not_found(EntryKind::Modifier, name))
    }

    /// Remove every modifier tagged with `source`.
    ///
    /// The match is exact and case-sensitive. Returns false, changing
    /// nothing, when no modifier carries the tag.
    pub fn remove_modifiers_by_source(&mut self, source: &str) -> bool {
        let Some(names) = self.source_index.remove(source) else {
            return false;
        };
        for name in &names {
            self.modifiers.remove(name);
        }
        debug!(
            attribute = %self.name,
            source,
            removed = names.len(),
            "removed modifiers by source"
        );
        self.invalidate();
        true
    }

    /// Advance every modifier by one tick and drop the expired ones.
    ///
    /// Returns the expired modifiers in name order.
    pub fn tick(&mut self) -> Vec<Modifier> {
        let expired_names: Vec<String> = self
            .modifiers
            .iter_mut()
            .filter_map(|(name, modifier)| modifier.tick().then(|| name.clone()))
            .collect();

        let expired: Vec<Modifier> = expired_names
            .iter()
            .filter_map(|name| self.take_modifier(name))
            .collect();

        for modifier in &expired {
            debug!(attribute = %self.name, modifier = modifier.name(), "modifier expired");
        }
        expired
    }

    /// Look up a modifier by name.
    pub fn modifier(&self, name: &str) -> Result<&Modifier, StatError> {
        self.modifiers
            .get(name)
            .ok_or_else(|| StatError::not_found(EntryKind::Modifier, name))
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Active modifiers in name order.
    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.values()
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    /// Names of the modifiers tagged with `source`, in name order.
    pub fn modifier_names_from<'a>(&'a self, source: &str) -> impl Iterator<Item = &'a str> {
        self.source_index
            .get(source)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Every source tag with at least one active modifier.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.source_index.keys().map(String::as_str)
    }

    /// Serialize into the plain nested map used for persistence.
    pub fn to_value(&self) -> Result<serde_json::Value, StatError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild an attribute from [`to_value`](Self::to_value) output.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StatError> {
        Ok(serde_json::from_value(value)?)
    }

    fn take_modifier(&mut self, name: &str) -> Option<Modifier> {
        let modifier = self.modifiers.remove(name)?;
        self.unindex(&modifier);
        self.invalidate();
        Some(modifier)
    }

    fn index(&mut self, modifier: &Modifier) {
        self.source_index
            .entry(modifier.source().to_string())
            .or_default()
            .insert(modifier.name().to_string());
    }

    fn unindex(&mut self, modifier: &Modifier) {
        if let Some(names) = self.source_index.get_mut(modifier.source()) {
            names.remove(modifier.name());
            if names.is_empty() {
                self.source_index.remove(modifier.source());
            }
        }
    }

    fn invalidate(&self) {
        self.cache.set(None);
    }

    fn compute(&self, mut trace: Option<&mut Breakdown>) -> StatValue {
        let mut value = self.base_value;

        for kind in ModifierKind::ALL {
            for modifier in self.modifiers.values().filter(|m| m.kind() == kind) {
                value = modifier.apply(value);
                if let Some(breakdown) = trace.as_deref_mut() {
                    breakdown.push(format!("{} {}", modifier.name(), modifier), value);
                }
            }
        }

        let clamped = numeric::clamp_between(value, self.min_value, self.max_value);
        if clamped != value {
            if let Some(breakdown) = trace.as_deref_mut() {
                breakdown.push(
                    format!("clamp({}, {})", self.min_value, self.max_value),
                    clamped,
                );
            }
        }
        clamped
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.base_value == other.base_value
            && self.min_value == other.min_value
            && self.max_value == other.max_value
            && self.modifiers == other.modifiers
    }
}

/// Persistence shape of an [`Attribute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AttributeRecord {
    pub(crate) name: String,
    pub(crate) base_value: StatValue,
    #[serde(
        default = "numeric::bound::default_lower",
        serialize_with = "numeric::bound::serialize",
        deserialize_with = "numeric::bound::deserialize_lower"
    )]
    pub(crate) min_value: StatValue,
    #[serde(
        default = "numeric::bound::default_upper",
        serialize_with = "numeric::bound::serialize",
        deserialize_with = "numeric::bound::deserialize_upper"
    )]
    pub(crate) max_value: StatValue,
    #[serde(default)]
    pub(crate) modifiers: BTreeMap<String, Modifier>,
}

impl From<Attribute> for AttributeRecord {
    fn from(attribute: Attribute) -> Self {
        Self {
            name: attribute.name,
            base_value: attribute.base_value,
            min_value: attribute.min_value,
            max_value: attribute.max_value,
            modifiers: attribute.modifiers,
        }
    }
}

impl TryFrom<AttributeRecord> for Attribute {
    type Error = StatError;

    fn try_from(record: AttributeRecord) -> Result<Self, Self::Error> {
        let mut attribute = Attribute::with_bounds(
            record.name,
            record.base_value,
            record.min_value,
            record.max_value,
        );
        for (key, modifier) in record.modifiers {
            if key != modifier.name() {
                return Err(StatError::InvalidRecord(format!(
                    "modifier stored under `{}` is named `{}`",
                    key,
                    modifier.name()
                )));
            }
            attribute.add_modifier(modifier);
        }
        Ok(attribute)
    }
}
