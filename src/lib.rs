//! # piecestat - Attribute and Resource Engine for Tactical Games
//!
//! Computes the effective numbers behind every piece on the board (damage,
//! movement range, health ceiling) and the pools they feed (health, mana,
//! stamina):
//! - **Staged** stacking: flat, then percentage, then multiplier, then clamp
//! - **Lazy** recomputation with a per-attribute cache
//! - **Source-scoped** removal, so unequipping an item drops exactly what it
//!   granted
//! - **Timed** modifiers that expire on the game tick
//! - **Round-trip** serialization to a plain nested map
//!
//! ## Core Concepts
//!
//! ```text
//! [Modifier] → [Attribute] → [Resource]
//!                   ↓             ↓
//!             [AttributeSet] [ResourceSet] → [Entity]
//! ```
//!
//! 1. **Modifiers** describe one adjustment and an optional duration
//! 2. **Attributes** hold a base value, bounds, and modifiers
//! 3. **Resources** add a spendable current amount under an attribute ceiling
//! 4. **Sets** give case-insensitive access and tick everything at once
//!
//! ## Example
//!
//! ```rust
//! use piecestat::*;
//!
//! let mut stats = AttributeSet::new();
//! let damage = stats.add("Damage", 100.0);
//! damage.add_modifier(Modifier::flat("sword", 10.0).with_source("item:1"));
//! damage.add_modifier(Modifier::percentage("rage", 20.0).with_duration(2));
//! damage.add_modifier(Modifier::multiplier("crit", 2.0));
//!
//! // (100 + 10) * 1.2 * 2
//! assert_eq!(stats.value("damage")?, 264.0);
//!
//! stats.tick();
//! stats.tick();
//! assert_eq!(stats.value("damage")?, 220.0);
//! # Ok::<(), StatError>(())
//! ```
//!
//! ## Modules
//!
//! - [`modifier`] - Modifier values and kinds
//! - [`attribute`] - Cached attributes
//! - [`resource`] - Consumable pools
//! - [`set`] - Named collections
//! - [`entity`] - Entity identity and stat ownership
//! - [`breakdown`] - Computation traces
//! - [`key`] - Case-insensitive keys
//! - [`numeric`] - Clamping and presentation helpers
//! - [`error`] - Error types

pub mod attribute;
pub mod breakdown;
pub mod entity;
pub mod error;
pub mod key;
pub mod modifier;
pub mod numeric;
pub mod resource;
pub mod set;

// Re-export main types for convenience
pub use attribute::Attribute;
pub use breakdown::Breakdown;
pub use entity::{Entity, EntityId, EntityTemplate, IdAllocator, SequentialIds};
pub use error::{EntryKind, StatError};
pub use key::StatKey;
pub use modifier::{Modifier, ModifierKind, GLOBAL_SOURCE};
pub use numeric::StatValue;
pub use resource::Resource;
pub use set::{AttributeSet, ResourceSet, SetEntry, StatSet};
