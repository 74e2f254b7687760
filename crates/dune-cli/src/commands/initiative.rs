use clap::{ArgGroup, Args};
use colored::Colorize;

use dune_mechanics::Skill;
use dune_mechanics::resolution::initiative::DEFAULT_INITIATIVE_SKILL;
use dune_mechanics::resolution::roll_initiative;
use dune_table::TableConfig;

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["rating", "character"])
))]
pub struct InitiativeArgs {
    /// Skill rating to add to the d20
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=10))]
    rating: Option<u32>,

    /// Roll for a stored character, by name
    #[arg(long)]
    character: Option<String>,

    /// Skill to roll with: battle, discipline, move
    #[arg(short, long)]
    skill: Option<String>,

    /// Acting user
    #[arg(long, default_value = "local")]
    user: String,

    /// Guild the character belongs to
    #[arg(long, default_value = "local")]
    guild: String,
}

pub fn run(config: &TableConfig, args: &InitiativeArgs) -> Result<(), String> {
    let skill = match &args.skill {
        Some(name) => Skill::from_name(name).map_err(|e| e.to_string())?,
        None => DEFAULT_INITIATIVE_SKILL,
    };

    let (label, rating) = match &args.character {
        Some(name) => {
            let roster = super::open_characters(config)?;
            let record = roster
                .find_for_user(&args.user, &args.guild, name)
                .ok_or_else(|| format!("character not found: {name}"))?;
            (record.name.clone(), record.skill(skill))
        }
        None => ("initiative".to_string(), args.rating.unwrap_or(0)),
    };

    let init =
        roll_initiative(skill, rating, &mut super::rng(config)).map_err(|e| e.to_string())?;
    println!(
        "  {} {label}: d20 {} + {skill} {} = {}",
        "Initiative".bold(),
        init.roll,
        init.rating,
        init.total().to_string().green().bold()
    );
    Ok(())
}
