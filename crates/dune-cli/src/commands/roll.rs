use clap::{ArgGroup, Args};
use colored::Colorize;

use dune_mechanics::resolution::{Cover, Range, assistance_dice, difficulty_for};
use dune_mechanics::{BonusSource, DicePool, Drive, RollRequest, Skill, resolve};
use dune_table::TableConfig;

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["target", "character", "npc"])
))]
pub struct RollArgs {
    /// Target number (skill + drive)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=20))]
    target: Option<u32>,

    /// Roll for a stored character, by name
    #[arg(long, requires_all = ["skill", "drive"])]
    character: Option<String>,

    /// Skill for a character roll
    #[arg(long)]
    skill: Option<String>,

    /// Drive for a character roll
    #[arg(long)]
    drive: Option<String>,

    /// Roll for a stored NPC, by name
    #[arg(long)]
    npc: Option<String>,

    /// Extra d20s bought with Momentum or Threat
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=5))]
    bonus: u32,

    /// Extra d20s from assets
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=5))]
    assets: u32,

    /// Spend a point of Determination for an extra d20
    #[arg(long)]
    determination: bool,

    /// Assisting characters with the skill (at most 3 dice)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=5))]
    assist: u32,

    /// Difficulty (successes needed)
    #[arg(
        short,
        long,
        conflicts_with_all = ["range", "cover"],
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    difficulty: Option<u32>,

    /// Range to the target: close, medium, long, extreme
    #[arg(long)]
    range: Option<String>,

    /// Target cover: none, light, heavy, total
    #[arg(long)]
    cover: Option<String>,

    /// Lowest die value that causes a complication
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=20))]
    complication_range: u32,

    /// Add generated Momentum and Threat to this channel's pool
    #[arg(long)]
    channel: Option<String>,

    /// Acting user
    #[arg(long, default_value = "local")]
    user: String,

    /// Guild the character or NPC belongs to
    #[arg(long, default_value = "local")]
    guild: String,
}

pub fn run(config: &TableConfig, args: &RollArgs) -> Result<(), String> {
    let (label, target) = target_for(config, args)?;

    let (difficulty, difficulty_note) = match (args.difficulty, &args.range, &args.cover) {
        (Some(d), _, _) => (d, None),
        (None, None, None) => (1, None),
        (None, range, cover) => {
            let range = parse_or(range.as_deref(), Range::from_name, Range::Close, "range")?;
            let cover = parse_or(cover.as_deref(), Cover::from_name, Cover::None, "cover")?;
            let modifier = difficulty_for(range, cover);
            (modifier.difficulty, Some(modifier.description))
        }
    };

    let assist = assistance_dice(args.assist);
    let pool = DicePool::standard()
        .with_bonus(BonusSource::Momentum, args.bonus)
        .with_bonus(BonusSource::Asset, args.assets)
        .with_bonus(BonusSource::Determination, u32::from(args.determination))
        .with_bonus(BonusSource::Assistance, assist);

    let request = RollRequest::new(target)
        .with_bonus_dice(pool.bonus_dice())
        .with_difficulty(difficulty)
        .with_complication_threshold(args.complication_range);
    let result = resolve(&request, &mut super::rng(config)).map_err(|e| e.to_string())?;

    println!("  {} {label}", "Rolling".bold());
    println!("  Target {target} | Difficulty {difficulty} | {pool}");
    if let Some(note) = difficulty_note {
        println!("  {note}");
    }
    if assist < args.assist {
        println!("  Assistance capped at {assist} dice");
    }
    super::print_result(&result);

    if let Some(channel) = &args.channel {
        let mut tracker = super::open_pools(config)?;
        let channel_pool = tracker.apply_roll(channel, &result);
        println!("  {} {channel_pool}", format!("[{channel}]").cyan());
        super::warn_if_unsaved(&tracker);
    }

    Ok(())
}

/// Work out the target number and a label for the roller.
fn target_for(config: &TableConfig, args: &RollArgs) -> Result<(String, u32), String> {
    if let Some(name) = &args.character {
        let skill = Skill::from_name(args.skill.as_deref().unwrap_or_default())
            .map_err(|e| e.to_string())?;
        let drive = Drive::from_name(args.drive.as_deref().unwrap_or_default())
            .map_err(|e| e.to_string())?;
        let mut roster = super::open_characters(config)?;
        let record = roster
            .find_for_user(&args.user, &args.guild, name)
            .ok_or_else(|| format!("character not found: {name}"))?;
        let target = record.target_number(skill, drive);
        let label = format!("{} ({skill} + {drive})", record.name);

        if args.determination {
            if record.user_id != args.user {
                return Err(format!("{} belongs to another user", record.name));
            }
            if record.determination.is_empty() {
                return Err(format!("{} has no Determination left", record.name));
            }
            let id = record.id.clone();
            let remaining = roster
                .adjust_determination(&id, -1, chrono::Utc::now())
                .map_err(|e| e.to_string())?
                .determination
                .current;
            roster.save().map_err(|e| e.to_string())?;
            println!("  Determination spent ({remaining} left)");
        }
        return Ok((label, target));
    }

    if let Some(name) = &args.npc {
        let npcs = super::open_npcs(config)?;
        let npc = npcs
            .find_by_name(&args.guild, name)
            .ok_or_else(|| format!("NPC not found: {name}"))?;
        let tier = npc.tier.unwrap_or_default();
        return Ok((format!("{} ({tier})", npc.name), npc.target_number()));
    }

    let target = args.target.ok_or("a target number is required")?;
    Ok((format!("target {target}"), target))
}

fn parse_or<T>(
    input: Option<&str>,
    parse: fn(&str) -> Option<T>,
    default: T,
    what: &str,
) -> Result<T, String> {
    match input {
        None => Ok(default),
        Some(s) => parse(s).ok_or_else(|| format!("unknown {what}: {s}")),
    }
}
