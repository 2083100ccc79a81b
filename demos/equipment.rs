//! Equipment example: source-scoped modifiers and resource ceilings
//!
//! This example demonstrates:
//! - Tagging modifiers with an item id as their source
//! - Unequipping by removing everything that source granted
//! - Health following its ceiling after the item is gone
//! - Saving and restoring the resource set

use piecestat::*;

const CROWN: &str = "item:crown";

fn main() -> Result<(), StatError> {
    let mut ids = SequentialIds::new();
    let mut template = EntityTemplate::new("Queen");
    template.max_health = 90.0;
    template.damage = 45.0;
    template.move_range = 7.0;

    let mut queen = Entity::spawn(&template, &mut ids);

    println!("Equipping crown:");
    queen.add_modifier(
        "max_health",
        Modifier::flat("crown_ward", 30.0).with_source(CROWN),
    )?;
    queen.add_modifier(
        "damage",
        Modifier::multiplier("crown_edge", 1.2).with_source(CROWN),
    )?;
    queen.health_mut()?.refill();

    let health = queen.health()?;
    println!("  health {}/{}", health.current(), health.max());
    println!("  damage {:.1}", queen.damage()?);

    println!("\nTaking 25 damage:");
    queen.health_mut()?.take(25.0)?;
    println!("  health {}/{}", queen.health()?.current(), queen.health()?.max());

    println!("\nUnequipping crown:");
    let touched = queen.remove_modifiers_by_source(CROWN)?;
    println!("  {} entries changed", touched);
    println!("  health {}/{}", queen.health()?.current(), queen.health()?.max());
    println!("  damage {:.1}", queen.damage()?);

    println!("\nSaved resources:");
    let saved = queen.resources().to_value()?;
    println!("{}", serde_json::to_string_pretty(&saved)?);

    let restored = ResourceSet::from_value(saved)?;
    assert_eq!(&restored, queen.resources());

    if let Err(err) = queen.health_mut()?.give(-10.0) {
        println!("\nRejected: {}", err);
    }

    Ok(())
}
