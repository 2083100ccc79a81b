use piecestat::*;
use serde_json::json;

/// Flat, then percentage, then multiplier, then clamp.
#[test]
fn test_stacking_order() {
    let mut attr = Attribute::new("damage", 100.0);
    attr.add_modifier(Modifier::flat("flat", 10.0));
    assert_eq!(attr.value(), 110.0);

    attr.add_modifier(Modifier::percentage("percent", 20.0));
    assert!((attr.value() - 132.0).abs() < 1e-9);

    attr.add_modifier(Modifier::multiplier("mult", 2.0));
    assert!((attr.value() - 264.0).abs() < 1e-9);

    attr.set_bounds(0.0, 200.0);
    assert_eq!(attr.value(), 200.0);
}

/// Reading twice without a mutation gives the same answer.
#[test]
fn test_value_is_deterministic() {
    let mut attr = Attribute::new("damage", 37.0);
    attr.add_modifier(Modifier::flat("a", 3.3));
    attr.add_modifier(Modifier::percentage("b", 17.0));
    attr.add_modifier(Modifier::multiplier("c", 1.1));
    attr.add_modifier(Modifier::flat("d", -2.0));

    let first = attr.value();
    let second = attr.value();
    assert_eq!(first, second);

    // A fresh attribute built in a different insertion order agrees
    let mut other = Attribute::new("damage", 37.0);
    other.add_modifier(Modifier::flat("d", -2.0));
    other.add_modifier(Modifier::multiplier("c", 1.1));
    other.add_modifier(Modifier::percentage("b", 17.0));
    other.add_modifier(Modifier::flat("a", 3.3));
    assert_eq!(other.value(), first);
}

#[test]
fn test_source_scoped_removal() {
    let mut attr = Attribute::new("armor", 10.0);
    attr.add_modifier(Modifier::flat("p1", 5.0).with_source("potion"));
    attr.add_modifier(Modifier::percentage("p2", 50.0).with_source("potion"));
    attr.add_modifier(Modifier::flat("a1", 1.0).with_source("aura"));
    assert_eq!(attr.value(), 24.0);

    assert!(attr.remove_modifiers_by_source("potion"));
    assert_eq!(attr.modifier_count(), 1);
    assert_eq!(attr.value(), 11.0);

    assert!(!attr.remove_modifiers_by_source("potion"));
    assert_eq!(attr.modifier_count(), 1);
    assert_eq!(attr.value(), 11.0);
}

#[test]
fn test_duration_expiry() {
    let mut attr = Attribute::new("move_range", 2.0);
    attr.add_modifier(Modifier::flat("haste", 2.0).with_duration(2));
    assert_eq!(attr.value(), 4.0);

    assert!(attr.tick().is_empty());
    assert_eq!(attr.modifier("haste").unwrap().remaining(), Some(1));
    assert_eq!(attr.value(), 4.0);

    let expired = attr.tick();
    assert_eq!(expired, vec![Modifier::flat("haste", 2.0).with_duration(0)]);
    assert_eq!(attr.value(), 2.0);
}

#[test]
fn test_resource_clamping() {
    let mut health = Resource::with_current("health", 100.0, 50.0);
    health.give(1000.0).unwrap();
    assert_eq!(health.current(), 100.0);

    health.take(1000.0).unwrap();
    assert_eq!(health.current(), 0.0);
    assert!(health.is_depleted());
}

#[test]
fn test_resource_follows_shrinking_ceiling() {
    let mut health = Resource::new("health", 100.0);
    health.add_modifier(Modifier::flat("blessing", 40.0).with_duration(1));
    health.refill();
    assert_eq!(health.current(), 140.0);

    health.tick();
    assert_eq!(health.current(), 100.0);
    assert_eq!(health.max(), 100.0);
}

#[test]
fn test_negative_amount_rejection() {
    let mut mana = Resource::with_current("mana", 30.0, 20.0);

    let err = mana.take(-5.0).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(mana.current(), 20.0);

    let err = mana.give(-5.0).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(mana.current(), 20.0);
}

#[test]
fn test_case_insensitive_set_keys() {
    let mut set = AttributeSet::new();
    set.add("Health", 100.0);

    let lower = set.get("health").unwrap() as *const Attribute;
    let upper = set.get("HEALTH").unwrap() as *const Attribute;
    assert_eq!(lower, upper);
    assert!(set.get("mana").unwrap_err().is_not_found());
}

/// Every modifier kind, with and without source and duration.
fn fully_loaded() -> Attribute {
    let mut attr = Attribute::with_bounds("damage", 12.5, 1.0, 500.0);
    attr.add_modifier(Modifier::flat("plain", 3.0));
    attr.add_modifier(Modifier::flat("sword", 7.0).with_source("item:11"));
    attr.add_modifier(Modifier::percentage("rage", 25.0).with_duration(3));
    attr.add_modifier(
        Modifier::percentage("curse", -10.0)
            .with_source("spell:hex")
            .with_duration(1),
    );
    attr.add_modifier(Modifier::multiplier("crit", 1.5).with_source("item:11"));
    attr
}

#[test]
fn test_round_trip_empty() {
    let attr = Attribute::new("move_range", 3.0);
    let restored = Attribute::from_value(attr.to_value().unwrap()).unwrap();
    assert_eq!(restored, attr);
    assert_eq!(restored.max_value(), f64::INFINITY);
}

#[test]
fn test_round_trip_single() {
    let mut attr = Attribute::new("move_range", 3.0);
    attr.add_modifier(Modifier::multiplier("slow", 0.5).with_duration(2));
    let restored = Attribute::from_value(attr.to_value().unwrap()).unwrap();
    assert_eq!(restored, attr);
}

#[test]
fn test_round_trip_many() {
    let attr = fully_loaded();
    let restored = Attribute::from_value(attr.to_value().unwrap()).unwrap();
    assert_eq!(restored, attr);
    assert_eq!(restored.value(), attr.value());
    assert_eq!(
        restored.modifier_names_from("item:11").collect::<Vec<_>>(),
        vec!["crit", "sword"]
    );
}

#[test]
fn test_round_trip_through_json_text() {
    let attr = fully_loaded();
    let text = serde_json::to_string(&attr).unwrap();
    let restored: Attribute = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, attr);
}

#[test]
fn test_round_trip_after_ticks() {
    let mut attr = fully_loaded();
    attr.tick();
    let restored = Attribute::from_value(attr.to_value().unwrap()).unwrap();
    assert_eq!(restored, attr);
    assert!(!restored.has_modifier("curse"));
    assert_eq!(restored.modifier("rage").unwrap().remaining(), Some(2));
}

#[test]
fn test_set_round_trip() {
    let mut set = AttributeSet::new();
    set.insert(fully_loaded());
    set.add("Move_Range", 2.0);
    set.add_bounded("crit_chance", 0.1, 0.0, 0.75);

    let restored = AttributeSet::from_value(set.to_value().unwrap()).unwrap();
    assert_eq!(restored, set);
    assert_eq!(restored.get("move_range").unwrap().name(), "Move_Range");
}

#[test]
fn test_persistence_shape() {
    let mut set = ResourceSet::new();
    set.add("Health", 20.0, 15.0)
        .add_modifier(Modifier::flat("amulet", 5.0).with_source("item:4"));

    assert_eq!(
        set.to_value().unwrap(),
        json!({
            "health": {
                "name": "Health",
                "base_value": 20.0,
                "min_value": 0.0,
                "max_value": null,
                "modifiers": {
                    "amulet": {
                        "name": "amulet",
                        "magnitude": 5.0,
                        "kind": "flat",
                        "source": "item:4",
                        "duration": null
                    }
                },
                "current": 15.0
            }
        })
    );
}

#[test]
fn test_deserialize_accepts_integers_and_missing_bounds() {
    let attr = Attribute::from_value(json!({
        "name": "value",
        "base_value": 9,
        "modifiers": {
            "bonus": { "name": "bonus", "magnitude": 1, "kind": "flat" }
        }
    }))
    .unwrap();
    assert_eq!(attr.value(), 10.0);
    assert_eq!(attr.min_value(), 0.0);
    assert_eq!(attr.max_value(), f64::INFINITY);
    assert_eq!(attr.modifier("bonus").unwrap().source(), GLOBAL_SOURCE);
}

#[test]
fn test_equipment_flow_across_sets() {
    let mut ids = SequentialIds::new();
    let mut template = EntityTemplate::new("Queen");
    template.max_health = 90.0;
    template.damage = 45.0;
    template.move_range = 7.0;
    let mut queen = Entity::spawn(&template, &mut ids);

    // Equip: one item touches two attributes
    let attrs = queen.attributes_mut();
    attrs
        .get_mut("damage")
        .unwrap()
        .add_modifier(Modifier::percentage("edge", 10.0).with_source("item:crown"));
    attrs
        .get_mut("max_health")
        .unwrap()
        .add_modifier(Modifier::flat("ward", 10.0).with_source("item:crown"));
    queen.sync_resource_ceilings().unwrap();
    assert!((queen.damage().unwrap() - 49.5).abs() < 1e-9);
    assert_eq!(queen.health().unwrap().max(), 100.0);

    // Unequip
    assert_eq!(
        queen.attributes_mut().remove_modifiers_by_source("item:crown"),
        2
    );
    queen.sync_resource_ceilings().unwrap();
    assert_eq!(queen.damage().unwrap(), 45.0);
    assert_eq!(queen.health().unwrap().current(), 90.0);
}

#[test]
fn test_turn_driver_reacts_to_expiry() {
    let mut ids = SequentialIds::new();
    let mut template = EntityTemplate::new("Pawn");
    template.move_range = 1.0;
    template.max_stamina = 5.0;
    let mut pawn = Entity::spawn(&template, &mut ids);

    pawn.attributes_mut()
        .get_mut("move_range")
        .unwrap()
        .add_modifier(Modifier::flat("charge", 1.0).with_duration(1));
    assert_eq!(pawn.move_range().unwrap(), 2.0);

    let report = pawn.tick().unwrap();
    assert_eq!(report.keys().collect::<Vec<_>>(), vec!["move_range"]);
    assert_eq!(pawn.move_range().unwrap(), 1.0);
    assert!(pawn.tick().unwrap().is_empty());
}

/// A timed buff on `max_health` that wears off during the turn pulls the
/// health pool back down with it.
#[test]
fn test_expiring_ceiling_buff_shrinks_health() {
    let mut ids = SequentialIds::new();
    let mut template = EntityTemplate::new("King");
    template.max_health = 100.0;
    let mut king = Entity::spawn(&template, &mut ids);

    king.add_modifier(
        "max_health",
        Modifier::flat("coronation", 50.0).with_duration(1),
    )
    .unwrap();
    king.health_mut().unwrap().refill();
    assert_eq!(king.health().unwrap().current(), 150.0);

    let report = king.tick().unwrap();
    assert_eq!(report.keys().collect::<Vec<_>>(), vec!["max_health"]);

    let max_health = king.max_health().unwrap();
    let health = king.health().unwrap();
    assert_eq!(max_health, 100.0);
    assert_eq!(health.max(), max_health);
    assert_eq!(health.current(), 100.0);
    assert!(health.current() <= max_health);
}

/// A pool whose ceiling attribute allows negatives never reports a negative
/// amount.
#[test]
fn test_negative_ceiling_keeps_current_at_zero() {
    let ceiling = Attribute::with_bounds("debt", -5.0, -10.0, 100.0);
    let mut pool = Resource::from_attribute(ceiling, 3.0);
    assert_eq!(pool.max(), -5.0);
    assert_eq!(pool.current(), 0.0);
    assert!(pool.is_depleted());
    assert_eq!(pool.fraction(), 0.0);

    pool.refill();
    assert!(pool.current() >= 0.0);
}
