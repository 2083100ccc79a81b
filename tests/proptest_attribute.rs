//! Property tests for attribute mutation sequences.
//!
//! These tests use `proptest` to generate random sequences of modifier
//! operations and check that the source index, the cache, and serialization
//! stay consistent after every step.

use piecestat::*;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Operations we can perform on an attribute.
#[derive(Debug, Clone)]
enum AttrOp {
    Add {
        name: usize,
        source: Option<usize>,
        kind: ModifierKind,
        magnitude: f64,
        duration: Option<u32>,
    },
    Remove(usize),
    RemoveSource(usize),
    Tick,
    SetBase(f64),
    Read,
}

const NAMES: [&str; 6] = ["sword", "ring", "haste", "curse", "aura", "rage"];
const SOURCES: [&str; 3] = ["item:1", "item:2", "spell"];

/// Small magnitudes keep products finite and comparable.
fn magnitude() -> impl Strategy<Value = f64> {
    (-200i32..200i32).prop_map(|v| v as f64 * 0.25)
}

fn kind() -> impl Strategy<Value = ModifierKind> {
    prop_oneof![
        Just(ModifierKind::Flat),
        Just(ModifierKind::Percentage),
        Just(ModifierKind::Multiplier),
    ]
}

fn attr_op_strategy() -> impl Strategy<Value = AttrOp> {
    prop_oneof![
        (
            0..NAMES.len(),
            prop::option::of(0..SOURCES.len()),
            kind(),
            magnitude(),
            prop::option::of(0u32..4),
        )
            .prop_map(|(name, source, kind, magnitude, duration)| AttrOp::Add {
                name,
                source,
                kind,
                magnitude,
                duration,
            }),
        (0..NAMES.len()).prop_map(AttrOp::Remove),
        (0..SOURCES.len()).prop_map(AttrOp::RemoveSource),
        Just(AttrOp::Tick),
        magnitude().prop_map(AttrOp::SetBase),
        Just(AttrOp::Read),
    ]
}

fn build(op: &AttrOp) -> Option<Modifier> {
    let AttrOp::Add {
        name,
        source,
        kind,
        magnitude,
        duration,
    } = op
    else {
        return None;
    };
    let mut modifier = Modifier::new(NAMES[*name], *magnitude, *kind);
    if let Some(source) = source {
        modifier = modifier.with_source(SOURCES[*source]);
    }
    if let Some(ticks) = duration {
        modifier = modifier.with_duration(*ticks);
    }
    Some(modifier)
}

/// Recompute the value from scratch, independent of the attribute's cache.
fn expected_value(attr: &Attribute) -> f64 {
    let mut value = attr.base_value();
    for kind in ModifierKind::ALL {
        for modifier in attr.modifiers().filter(|m| m.kind() == kind) {
            value = modifier.apply(value);
        }
    }
    value.min(attr.max_value()).max(attr.min_value())
}

fn assert_index_is_inverse(attr: &Attribute) {
    let mut expected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for modifier in attr.modifiers() {
        expected
            .entry(modifier.source().to_string())
            .or_default()
            .insert(modifier.name().to_string());
    }

    let sources: BTreeSet<String> = attr.sources().map(str::to_string).collect();
    assert_eq!(sources, expected.keys().cloned().collect::<BTreeSet<_>>());
    for (source, names) in &expected {
        let indexed: BTreeSet<String> = attr
            .modifier_names_from(source)
            .map(str::to_string)
            .collect();
        assert_eq!(&indexed, names);
        assert!(!indexed.is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn attribute_random_ops_preserve_invariants(ops in prop::collection::vec(attr_op_strategy(), 1..60)) {
        let mut attr = Attribute::new("damage", 50.0);

        for op in &ops {
            match op {
                AttrOp::Add { .. } => {
                    if let Some(modifier) = build(op) {
                        attr.add_modifier(modifier);
                    }
                }
                AttrOp::Remove(name) => {
                    let had = attr.has_modifier(NAMES[*name]);
                    prop_assert_eq!(attr.remove_modifier(NAMES[*name]), had);
                }
                AttrOp::RemoveSource(source) => {
                    let had = attr.modifier_names_from(SOURCES[*source]).count();
                    let before = attr.modifier_count();
                    let removed = attr.remove_modifiers_by_source(SOURCES[*source]);
                    prop_assert_eq!(removed, had > 0);
                    prop_assert_eq!(attr.modifier_count(), before - had);
                }
                AttrOp::Tick => {
                    let before = attr.modifier_count();
                    let expired = attr.tick();
                    prop_assert_eq!(attr.modifier_count(), before - expired.len());
                    for modifier in &expired {
                        prop_assert!(!attr.has_modifier(modifier.name()));
                    }
                }
                AttrOp::SetBase(base) => attr.set_base_value(*base),
                AttrOp::Read => {
                    let _ = attr.value();
                }
            }

            assert_index_is_inverse(&attr);

            // Cached and fresh computations agree
            let first = attr.value();
            prop_assert!(!attr.is_cache_dirty());
            prop_assert_eq!(first, attr.value());
            prop_assert_eq!(first, expected_value(&attr));
        }

        let restored = Attribute::from_value(attr.to_value().unwrap()).unwrap();
        prop_assert_eq!(&restored, &attr);
        prop_assert_eq!(restored.value(), attr.value());
    }

    #[test]
    fn resource_current_stays_within_ceiling(
        base in 0u32..500,
        start in 0u32..500,
        amounts in prop::collection::vec((any::<bool>(), 0u32..300), 1..40),
        buff in prop::option::of(1u32..100),
    ) {
        let mut resource = Resource::with_current("health", base as f64, start as f64);
        if let Some(buff) = buff {
            resource.add_modifier(Modifier::flat("buff", buff as f64).with_duration(1));
        }

        for (spend, amount) in amounts {
            if spend {
                resource.take(amount as f64).unwrap();
            } else {
                resource.give(amount as f64).unwrap();
            }
            prop_assert!(resource.current() >= 0.0);
            prop_assert!(resource.current() <= resource.max());
        }

        resource.tick();
        prop_assert!(resource.current() <= resource.max());
        prop_assert_eq!(resource.max(), base as f64);
    }
}
