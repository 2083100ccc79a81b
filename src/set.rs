//! Named collections of attributes and resources.
//!
//! Provides [`StatSet`], a case-insensitive map from name to entry, and the
//! two instantiations an entity owns: [`AttributeSet`] and [`ResourceSet`].
//! The set is the unit the turn driver ticks once per game step.

use crate::attribute::Attribute;
use crate::error::{EntryKind, StatError};
use crate::key::StatKey;
use crate::modifier::Modifier;
use crate::numeric::{StatValue, DEFAULT_MAX, DEFAULT_MIN};
use crate::resource::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// Behaviour a [`StatSet`] needs from its entries.
pub trait SetEntry: Serialize + DeserializeOwned {
    /// What a failed lookup reports.
    const KIND: EntryKind;

    /// The entry's display name. The set keys it by its lower-cased form.
    fn name(&self) -> &str;

    /// Advance modifier durations, returning the expired modifiers.
    fn tick(&mut self) -> Vec<Modifier>;

    /// Remove every modifier with the given source tag.
    fn remove_modifiers_by_source(&mut self, source: &str) -> bool;
}

impl SetEntry for Attribute {
    const KIND: EntryKind = EntryKind::Attribute;

    fn name(&self) -> &str {
        Attribute::name(self)
    }

    fn tick(&mut self) -> Vec<Modifier> {
        Attribute::tick(self)
    }

    fn remove_modifiers_by_source(&mut self, source: &str) -> bool {
        Attribute::remove_modifiers_by_source(self, source)
    }
}

impl SetEntry for Resource {
    const KIND: EntryKind = EntryKind::Resource;

    fn name(&self) -> &str {
        Resource::name(self)
    }

    fn tick(&mut self) -> Vec<Modifier> {
        Resource::tick(self)
    }

    fn remove_modifiers_by_source(&mut self, source: &str) -> bool {
        Resource::remove_modifiers_by_source(self, source)
    }
}

/// A case-insensitive name → entry collection.
///
/// Names are lower-cased on insertion and on lookup, so `"Health"`,
/// `"health"` and `"HEALTH"` all reach the same entry. Inserting under a name
/// that is already present replaces the old entry.
///
/// # Examples
///
/// ```rust
/// use piecestat::{AttributeSet, Modifier};
///
/// let mut stats = AttributeSet::new();
/// stats.add("Move_Range", 2.0);
///
/// stats
///     .get_mut("move_range")?
///     .add_modifier(Modifier::flat("boots", 1.0).with_duration(1));
/// assert_eq!(stats.value("MOVE_RANGE")?, 3.0);
///
/// let expired = stats.tick();
/// assert_eq!(expired["move_range"].len(), 1);
/// assert_eq!(stats.value("move_range")?, 2.0);
/// # Ok::<(), piecestat::StatError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StatSet<T> {
    entries: BTreeMap<StatKey, T>,
}

/// Attributes owned by one entity.
pub type AttributeSet = StatSet<Attribute>;

/// Resources owned by one entity.
pub type ResourceSet = StatSet<Resource>;

impl<T> Default for StatSet<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: SetEntry> StatSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built entry, returning the entry it replaced.
    pub fn insert(&mut self, entry: T) -> Option<T> {
        let key = StatKey::new(entry.name());
        let previous = self.entries.insert(key.clone(), entry);
        if previous.is_some() {
            let kind = T::KIND;
            debug!(%kind, %key, "replaced set entry");
        }
        previous
    }

    /// Look up an entry by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&T, StatError> {
        self.entries
            .get(&StatKey::new(name))
            .ok_or_else(|| StatError::not_found(T::KIND, name))
    }

    /// Mutable lookup by name, ignoring case.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut T, StatError> {
        self.entries
            .get_mut(&StatKey::new(name))
            .ok_or_else(|| StatError::not_found(T::KIND, name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&StatKey::new(name))
    }

    /// Remove an entry by name, ignoring case.
    pub fn remove(&mut self, name: &str) -> Result<T, StatError> {
        self.entries
            .remove(&StatKey::new(name))
            .ok_or_else(|| StatError::not_found(T::KIND, name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with their normalized keys, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&StatKey, &T)> {
        self.entries.iter()
    }

    /// Normalized keys in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(StatKey::as_str)
    }

    /// Tick every entry once.
    ///
    /// Only entries that lost at least one modifier appear in the result,
    /// keyed by normalized name.
    pub fn tick(&mut self) -> BTreeMap<String, Vec<Modifier>> {
        let mut expired = BTreeMap::new();
        for (key, entry) in self.entries.iter_mut() {
            let removed = entry.tick();
            if !removed.is_empty() {
                expired.insert(key.as_str().to_string(), removed);
            }
        }
        expired
    }

    /// Remove a source's modifiers from every entry.
    ///
    /// Returns how many entries changed. Used when an item that touched
    /// several attributes is unequipped.
    pub fn remove_modifiers_by_source(&mut self, source: &str) -> usize {
        self.entries
            .values_mut()
            .map(|entry| entry.remove_modifiers_by_source(source))
            .filter(|removed| *removed)
            .count()
    }

    /// Insert, replacing any entry with the same key, and hand back the new
    /// entry.
    fn insert_new(&mut self, entry: T) -> &mut T {
        match self.entries.entry(StatKey::new(entry.name())) {
            Entry::Occupied(mut slot) => {
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entry),
        }
    }

    /// Serialize into a name → record map.
    pub fn to_value(&self) -> Result<serde_json::Value, StatError> {
        let mut map = serde_json::Map::with_capacity(self.entries.len());
        for (key, entry) in &self.entries {
            map.insert(key.as_str().to_string(), serde_json::to_value(entry)?);
        }
        Ok(serde_json::Value::Object(map))
    }

    /// Rebuild a set from [`to_value`](Self::to_value) output.
    ///
    /// Entries are keyed by each record's own `name`; the outer map keys
    /// only group the records. Two records whose names differ only in case
    /// fail with `InvalidRecord`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StatError> {
        let records: BTreeMap<String, T> = serde_json::from_value(value)?;
        let mut set = Self::new();
        for entry in records.into_values() {
            match set.entries.entry(StatKey::new(entry.name())) {
                Entry::Occupied(slot) => {
                    return Err(StatError::InvalidRecord(format!(
                        "{} `{}` collides with `{}`",
                        T::KIND,
                        entry.name(),
                        slot.get().name()
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }
        Ok(set)
    }
}

impl AttributeSet {
    /// Create and insert an attribute with default bounds.
    pub fn add(&mut self, name: &str, base_value: StatValue) -> &mut Attribute {
        self.add_bounded(name, base_value, DEFAULT_MIN, DEFAULT_MAX)
    }

    /// Create and insert an attribute with explicit bounds.
    pub fn add_bounded(
        &mut self,
        name: &str,
        base_value: StatValue,
        min_value: StatValue,
        max_value: StatValue,
    ) -> &mut Attribute {
        self.insert_new(Attribute::with_bounds(name, base_value, min_value, max_value))
    }

    /// Effective value of the named attribute.
    pub fn value(&self, name: &str) -> Result<StatValue, StatError> {
        Ok(self.get(name)?.value())
    }
}

impl ResourceSet {
    /// Create and insert a resource with default ceiling bounds.
    pub fn add(&mut self, name: &str, base_value: StatValue, current: StatValue) -> &mut Resource {
        self.insert_new(Resource::with_current(name, base_value, current))
    }

    /// Create and insert a resource whose ceiling has explicit bounds.
    pub fn add_bounded(
        &mut self,
        name: &str,
        base_value: StatValue,
        current: StatValue,
        min_value: StatValue,
        max_value: StatValue,
    ) -> &mut Resource {
        let ceiling = Attribute::with_bounds(name, base_value, min_value, max_value);
        self.insert_new(Resource::from_attribute(ceiling, current))
    }

    /// Current amount of the named resource.
    pub fn current(&self, name: &str) -> Result<StatValue, StatError> {
        Ok(self.get(name)?.current())
    }
}
