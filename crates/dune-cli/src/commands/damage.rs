use clap::Args;
use colored::Colorize;

use dune_mechanics::resolution::{WeaponQuality, roll_damage};
use dune_table::TableConfig;

#[derive(Args)]
pub struct DamageArgs {
    /// Weapon's base damage
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=20))]
    base: u32,

    /// Base effects added to the effect die
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=10))]
    effects: u32,

    /// Weapon quality: vicious, intense, piercing (repeatable)
    #[arg(short, long = "quality")]
    qualities: Vec<String>,
}

pub fn run(config: &TableConfig, args: &DamageArgs) -> Result<(), String> {
    let qualities = args
        .qualities
        .iter()
        .map(|q| {
            WeaponQuality::from_name(q).ok_or_else(|| format!("unknown weapon quality: {q}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let roll = roll_damage(args.base, args.effects, &qualities, &mut super::rng(config));

    println!(
        "  {} base {} + d6, effects {} + d6",
        "Damage".bold(),
        args.base,
        args.effects
    );
    println!("  {roll}");
    for note in roll.notes() {
        println!("  {}", note.yellow());
    }
    Ok(())
}
