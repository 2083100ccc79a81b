//! Turn loop example: timed modifiers expiring over several turns
//!
//! This example demonstrates:
//! - Spawning a piece from a stat table
//! - Applying timed buffs and debuffs
//! - Ticking once per turn and reacting to expirations
//!
//! Run with `RUST_LOG=piecestat=debug` to see the engine's own events.

use piecestat::*;

fn main() -> Result<(), StatError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let knight = EntityTemplate::from_json(
        r#"{
            "name": "Knight",
            "value": 3,
            "move_range": 2,
            "damage": 15,
            "max_health": 30,
            "max_stamina": 10
        }"#,
    )?;

    let mut ids = SequentialIds::new();
    let mut piece = Entity::spawn(&knight, &mut ids);
    println!("Spawned {} {}", piece.name(), piece.id());

    piece
        .attributes_mut()
        .get_mut("move_range")?
        .add_modifier(Modifier::flat("gallop", 1.0).with_duration(2));
    piece
        .attributes_mut()
        .get_mut("damage")?
        .add_modifier(
            Modifier::percentage("weakened", -40.0)
                .with_duration(3)
                .with_source("spell:hex"),
        );

    for turn in 1..=4 {
        println!(
            "\nTurn {}: move_range={} damage={:.1}",
            turn,
            piece.attributes().get("move_range")?.value_whole(),
            piece.damage()?
        );

        let expired = piece.tick()?;
        for (stat, modifiers) in &expired {
            for modifier in modifiers {
                println!("  {} wore off {} ({})", modifier.name(), stat, modifier);
            }
        }
    }

    println!("\nDamage breakdown:");
    let trace = piece.attributes().get("damage")?.breakdown();
    println!("  base: {:.1}", trace.base_value);
    for (step, value) in &trace.steps {
        println!("  {}: {:.1}", step, value);
    }
    println!("  final: {:.1}", trace.value);

    Ok(())
}
