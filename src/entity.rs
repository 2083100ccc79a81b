//! Entity identity and stat ownership.
//!
//! An [`Entity`] (a piece on the board) owns exactly one [`AttributeSet`]
//! and one [`ResourceSet`]. Identities come from an [`IdAllocator`] passed in
//! by the caller; there is no global counter, so tests can hand in a fresh
//! [`SequentialIds`] and get predictable ids.

use crate::error::StatError;
use crate::key::StatKey;
use crate::modifier::Modifier;
use crate::numeric::StatValue;
use crate::resource::Resource;
use crate::set::{AttributeSet, ResourceSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Standard attribute and resource names created for every entity.
pub mod names {
    pub const VALUE: &str = "value";
    pub const MOVE_RANGE: &str = "move_range";
    pub const DAMAGE: &str = "damage";
    pub const MAX_HEALTH: &str = "max_health";
    pub const MAX_MANA: &str = "max_mana";
    pub const MAX_STAMINA: &str = "max_stamina";

    pub const HEALTH: &str = "health";
    pub const MANA: &str = "mana";
    pub const STAMINA: &str = "stamina";

    /// `(resource, ceiling attribute)` pairs.
    pub const POOLS: [(&str, &str); 3] = [
        (HEALTH, MAX_HEALTH),
        (MANA, MAX_MANA),
        (STAMINA, MAX_STAMINA),
    ];
}

/// Identity of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of fresh entity ids.
pub trait IdAllocator {
    fn next_id(&mut self) -> EntityId;
}

/// Hands out increasing ids, starting at 1 unless told otherwise.
///
/// # Examples
///
/// ```rust
/// use piecestat::entity::{EntityId, IdAllocator, SequentialIds};
///
/// let mut ids = SequentialIds::new();
/// assert_eq!(ids.next_id(), EntityId(1));
/// assert_eq!(ids.next_id(), EntityId(2));
/// ```
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Resume allocation after a loaded save.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Base stat table for a kind of piece.
///
/// Tables are plain data and can be loaded from JSON; every number defaults
/// to zero when omitted.
///
/// # Examples
///
/// ```rust
/// use piecestat::entity::EntityTemplate;
///
/// let rook = EntityTemplate::from_json(r#"{
///     "name": "Rook",
///     "value": 5,
///     "move_range": 7,
///     "max_health": 50,
///     "damage": 25
/// }"#)?;
/// assert_eq!(rook.max_health, 50.0);
/// assert_eq!(rook.max_mana, 0.0);
/// # Ok::<(), piecestat::StatError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,
    #[serde(default)]
    pub value: StatValue,
    #[serde(default)]
    pub move_range: StatValue,
    #[serde(default)]
    pub damage: StatValue,
    #[serde(default)]
    pub max_health: StatValue,
    #[serde(default)]
    pub max_mana: StatValue,
    #[serde(default)]
    pub max_stamina: StatValue,
}

impl EntityTemplate {
    /// A template with every stat at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            move_range: 0.0,
            damage: 0.0,
            max_health: 0.0,
            max_mana: 0.0,
            max_stamina: 0.0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StatError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A piece with its own attributes and resource pools.
///
/// Equality is identity: two entities are equal when their ids match.
/// `Clone` keeps the id (the same piece); use
/// [`clone_with_new_identity`](Self::clone_with_new_identity) to duplicate a
/// piece as a new one.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    attributes: AttributeSet,
    resources: ResourceSet,
}

impl Entity {
    /// Build an entity from a stat table.
    ///
    /// Creates the standard attributes and one resource per pool, each
    /// starting full at its ceiling.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use piecestat::entity::{Entity, EntityTemplate, SequentialIds};
    ///
    /// let mut ids = SequentialIds::new();
    /// let mut king = EntityTemplate::new("King");
    /// king.max_health = 100.0;
    /// king.move_range = 1.0;
    ///
    /// let piece = Entity::spawn(&king, &mut ids);
    /// assert_eq!(piece.move_range()?, 1.0);
    /// assert_eq!(piece.health()?.current(), 100.0);
    /// # Ok::<(), piecestat::StatError>(())
    /// ```
    pub fn spawn(template: &EntityTemplate, ids: &mut impl IdAllocator) -> Self {
        let mut attributes = AttributeSet::new();
        attributes.add(names::VALUE, template.value);
        attributes.add(names::MOVE_RANGE, template.move_range);
        attributes.add(names::DAMAGE, template.damage);
        attributes.add(names::MAX_HEALTH, template.max_health);
        attributes.add(names::MAX_MANA, template.max_mana);
        attributes.add(names::MAX_STAMINA, template.max_stamina);

        let mut resources = ResourceSet::new();
        resources.insert(Resource::new(names::HEALTH, template.max_health));
        resources.insert(Resource::new(names::MANA, template.max_mana));
        resources.insert(Resource::new(names::STAMINA, template.max_stamina));

        let id = ids.next_id();
        debug!(entity = %id, name = %template.name, "spawned entity");
        Self {
            id,
            name: template.name.clone(),
            attributes,
            resources,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceSet {
        &mut self.resources
    }

    pub fn move_range(&self) -> Result<StatValue, StatError> {
        self.attributes.value(names::MOVE_RANGE)
    }

    pub fn damage(&self) -> Result<StatValue, StatError> {
        self.attributes.value(names::DAMAGE)
    }

    /// Point value of the piece.
    pub fn piece_value(&self) -> Result<StatValue, StatError> {
        self.attributes.value(names::VALUE)
    }

    pub fn max_health(&self) -> Result<StatValue, StatError> {
        self.attributes.value(names::MAX_HEALTH)
    }

    pub fn health(&self) -> Result<&Resource, StatError> {
        self.resources.get(names::HEALTH)
    }

    pub fn health_mut(&mut self) -> Result<&mut Resource, StatError> {
        self.resources.get_mut(names::HEALTH)
    }

    /// Add a modifier to the named attribute.
    ///
    /// A modifier on `max_health`, `max_mana` or `max_stamina` is pushed
    /// into the matching pool before this returns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use piecestat::entity::{Entity, EntityTemplate, SequentialIds};
    /// use piecestat::Modifier;
    ///
    /// let mut template = EntityTemplate::new("Bishop");
    /// template.max_health = 40.0;
    /// let mut bishop = Entity::spawn(&template, &mut SequentialIds::new());
    ///
    /// bishop.add_modifier("Max_Health", Modifier::flat("mitre", 10.0))?;
    /// assert_eq!(bishop.health()?.max(), 50.0);
    /// # Ok::<(), piecestat::StatError>(())
    /// ```
    pub fn add_modifier(&mut self, attribute: &str, modifier: Modifier) -> Result<(), StatError> {
        self.attributes.get_mut(attribute)?.add_modifier(modifier);
        let key = StatKey::new(attribute);
        if let Some((pool, ceiling)) = names::POOLS
            .into_iter()
            .find(|(_, ceiling)| key.as_str() == *ceiling)
        {
            self.sync_pool(pool, ceiling)?;
        }
        Ok(())
    }

    /// Remove a source's modifiers from every attribute and pool, then
    /// resync the pool ceilings.
    ///
    /// Returns how many entries changed.
    pub fn remove_modifiers_by_source(&mut self, source: &str) -> Result<usize, StatError> {
        let changed = self.attributes.remove_modifiers_by_source(source)
            + self.resources.remove_modifiers_by_source(source);
        self.sync_resource_ceilings()?;
        Ok(changed)
    }

    /// Copy each pool's ceiling attribute into the pool's base value.
    ///
    /// [`add_modifier`](Self::add_modifier),
    /// [`remove_modifiers_by_source`](Self::remove_modifiers_by_source) and
    /// [`tick`](Self::tick) do this already; call it after editing the
    /// ceilings through [`attributes_mut`](Self::attributes_mut). Current
    /// amounts are left alone and re-clamp on the next read.
    pub fn sync_resource_ceilings(&mut self) -> Result<(), StatError> {
        for (pool, ceiling) in names::POOLS {
            self.sync_pool(pool, ceiling)?;
        }
        Ok(())
    }

    fn sync_pool(&mut self, pool: &str, ceiling: &str) -> Result<(), StatError> {
        let max = self.attributes.value(ceiling)?;
        self.resources.get_mut(pool)?.set_base_value(max);
        Ok(())
    }

    /// Tick both sets once.
    ///
    /// Pools whose ceiling attribute lost a modifier are resynced before the
    /// pools themselves tick. The report merges attribute and resource
    /// expiries, keyed by normalized name.
    pub fn tick(&mut self) -> Result<BTreeMap<String, Vec<Modifier>>, StatError> {
        let mut expired = self.attributes.tick();
        for (pool, ceiling) in names::POOLS {
            if expired.contains_key(ceiling) {
                self.sync_pool(pool, ceiling)?;
            }
        }
        for (name, modifiers) in self.resources.tick() {
            expired.entry(name).or_default().extend(modifiers);
        }
        Ok(expired)
    }

    /// Duplicate this entity under a freshly allocated id.
    ///
    /// Everything except identity is copied, including active modifiers and
    /// current resource amounts.
    pub fn clone_with_new_identity(&self, ids: &mut impl IdAllocator) -> Self {
        let id = ids.next_id();
        debug!(from = %self.id, to = %id, "cloned entity with new identity");
        Self {
            id,
            ..self.clone()
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}
