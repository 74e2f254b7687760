use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use dune_mechanics::{Drive, Skill, parse_assignment};
use dune_table::{CharacterRecord, CreationKind, CreationSessions, SessionKey, TableConfig};

#[derive(Subcommand)]
pub enum CharacterAction {
    /// Create a character from a complete set of choices
    Create(CreateArgs),

    /// List characters in a guild
    List {
        /// Only this user's characters
        #[arg(long)]
        user: Option<String>,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },

    /// Show a character sheet
    Show {
        /// Character name
        name: String,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },

    /// Delete one of your characters
    Delete {
        /// Character name
        name: String,

        /// Requesting user
        #[arg(long, default_value = "local")]
        user: String,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },

    /// Spend (negative) or regain (positive) Determination
    Determination {
        /// Character name
        name: String,

        /// Change to apply
        #[arg(allow_hyphen_values = true)]
        delta: i32,

        /// Prefer this user's character when names clash
        #[arg(long)]
        user: Option<String>,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Character name
    #[arg(long)]
    name: String,

    /// Concept (repeatable)
    #[arg(long = "concept", required = true)]
    concepts: Vec<String>,

    /// Skill assignment, e.g. "battle=9,communicate=7,discipline=6,move=5,understand=4"
    #[arg(long)]
    skills: String,

    /// Drive assignment, e.g. "duty=8,faith=7,justice=6,power=5,truth=4"
    #[arg(long)]
    drives: String,

    /// Drive statement as DRIVE=TEXT (repeatable)
    #[arg(long = "statement")]
    statements: Vec<String>,

    /// Focus as SKILL=FOCUS (repeatable)
    #[arg(long = "focus")]
    focuses: Vec<String>,

    /// Archetype (repeatable; two or more make a mixed build)
    #[arg(long = "archetype")]
    archetypes: Vec<String>,

    /// House
    #[arg(long)]
    house: Option<String>,

    /// Homeworld
    #[arg(long)]
    homeworld: Option<String>,

    /// Talent (repeatable)
    #[arg(long = "talent")]
    talents: Vec<String>,

    /// Asset (repeatable)
    #[arg(long = "asset")]
    assets: Vec<String>,

    /// Trait (repeatable)
    #[arg(long = "trait")]
    traits: Vec<String>,

    /// Owning user
    #[arg(long, default_value = "local")]
    user: String,

    /// Guild id
    #[arg(long, default_value = "local")]
    guild: String,
}

pub fn run(config: &TableConfig, action: CharacterAction) -> Result<(), String> {
    match action {
        CharacterAction::Create(args) => create(config, args),
        CharacterAction::List { user, guild } => list(config, user.as_deref(), &guild),
        CharacterAction::Show { name, guild } => show(config, &name, &guild),
        CharacterAction::Delete { name, user, guild } => delete(config, &name, &user, &guild),
        CharacterAction::Determination {
            name,
            delta,
            user,
            guild,
        } => determination(config, &name, delta, user.as_deref(), &guild),
    }
}

fn create(config: &TableConfig, args: CreateArgs) -> Result<(), String> {
    let now = Utc::now();
    let key = SessionKey::new(&args.guild, &args.user);
    let kind = if args.archetypes.len() > 1 {
        CreationKind::MixedArchetype
    } else {
        CreationKind::Sheet
    };

    let mut sessions = CreationSessions::new(config.creation_ttl());
    sessions.start(key.clone(), kind, now);

    let skills = parse_assignment(&args.skills).map_err(|e| e.to_string())?;
    let result = sessions
        .commit_skills(&key, skills, now)
        .map_err(|e| e.to_string())?;
    if !result.is_valid() {
        return Err(format!("invalid skills:\n{}", result.message()));
    }

    let drives = parse_assignment(&args.drives).map_err(|e| e.to_string())?;
    let result = sessions
        .commit_drives(&key, drives, now)
        .map_err(|e| e.to_string())?;
    if !result.is_valid() {
        return Err(format!("invalid drives:\n{}", result.message()));
    }

    let mut statements = Vec::new();
    for raw in &args.statements {
        let (drive, text) = split_pair(raw, "statement")?;
        statements.push((Drive::from_name(drive).map_err(|e| e.to_string())?, text));
    }
    let mut focuses = Vec::new();
    for raw in &args.focuses {
        let (skill, focus) = split_pair(raw, "focus")?;
        focuses.push((Skill::from_name(skill).map_err(|e| e.to_string())?, focus));
    }

    sessions
        .update(&key, now, |draft| {
            draft.name = Some(args.name.clone());
            draft.concepts = args.concepts;
            draft.archetypes = args.archetypes;
            draft.house = args.house;
            draft.homeworld = args.homeworld;
            draft.talents = args.talents;
            draft.assets = args.assets;
            draft.traits = args.traits;
            draft.statements.extend(statements);
            for (skill, focus) in focuses {
                draft.focuses.entry(skill).or_default().push(focus);
            }
        })
        .map_err(|e| e.to_string())?;

    let session = sessions.complete(&key, now).map_err(|e| e.to_string())?;
    let mut roster = super::open_characters(config)?;
    let record = roster.create(session, now).map_err(|e| e.to_string())?;
    let (name, id) = (record.name.clone(), record.id.clone());
    roster.save().map_err(|e| e.to_string())?;

    println!("  {} {name} ({id})", "Created".green().bold());
    Ok(())
}

fn split_pair<'a>(raw: &'a str, what: &str) -> Result<(&'a str, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim().to_string()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .ok_or_else(|| format!("{what} must look like KEY=TEXT, got '{raw}'"))
}

fn list(config: &TableConfig, user: Option<&str>, guild: &str) -> Result<(), String> {
    let roster = super::open_characters(config)?;
    let characters = match user {
        Some(user) => roster.for_user(user, guild),
        None => roster.for_guild(guild),
    };

    if characters.is_empty() {
        println!("  No characters found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Concepts", "Owner", "Determination", "Active"]);
    for c in &characters {
        table.add_row(vec![
            c.name.clone(),
            c.concepts.join(", "),
            c.user_id.clone(),
            format!("{}/{}", c.determination.current, c.determination.max),
            if c.active { "yes" } else { "" }.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", characters.len());
    Ok(())
}

fn show(config: &TableConfig, name: &str, guild: &str) -> Result<(), String> {
    let roster = super::open_characters(config)?;
    let record = roster
        .find_by_name(guild, name)
        .ok_or_else(|| format!("character not found: {name}"))?;
    print_sheet(record);
    Ok(())
}

fn print_sheet(record: &CharacterRecord) {
    println!("  {}", record.name.bold());
    if !record.concepts.is_empty() {
        println!("  Concepts: {}", record.concepts.join(", "));
    }
    if let Some(house) = &record.house {
        println!("  House: {house}");
    }
    if let Some(homeworld) = &record.homeworld {
        println!("  Homeworld: {homeworld}");
    }
    println!("  {}", record.determination);

    let mut skills = Table::new();
    skills.set_header(vec!["Skill", "Rating", "Focuses"]);
    for skill in Skill::ALL {
        let focuses = record
            .focuses
            .get(&skill)
            .map(|f| f.join(", "))
            .unwrap_or_default();
        skills.add_row(vec![
            skill.name().to_string(),
            record.skill(skill).to_string(),
            focuses,
        ]);
    }
    println!("{skills}");

    let mut drives = Table::new();
    drives.set_header(vec!["Drive", "Rating", "Statement"]);
    for drive in Drive::ALL {
        let statement = record
            .drives
            .get(&drive)
            .and_then(|d| d.statement.clone())
            .unwrap_or_default();
        drives.add_row(vec![
            drive.name().to_string(),
            record.drive(drive).to_string(),
            statement,
        ]);
    }
    println!("{drives}");

    for (label, items) in [
        ("Talents", &record.talents),
        ("Assets", &record.assets),
        ("Traits", &record.traits),
    ] {
        if !items.is_empty() {
            println!("  {label}: {}", items.join(", "));
        }
    }
}

fn delete(config: &TableConfig, name: &str, user: &str, guild: &str) -> Result<(), String> {
    let mut roster = super::open_characters(config)?;
    let id = roster
        .find_for_user(user, guild, name)
        .map(|c| c.id.clone())
        .ok_or_else(|| format!("character not found: {name}"))?;
    let removed = roster.delete(&id, user).map_err(|e| e.to_string())?;
    roster.save().map_err(|e| e.to_string())?;
    println!("  {} {}", "Deleted".red().bold(), removed.name);
    Ok(())
}

fn determination(
    config: &TableConfig,
    name: &str,
    delta: i32,
    user: Option<&str>,
    guild: &str,
) -> Result<(), String> {
    let mut roster = super::open_characters(config)?;
    let found = match user {
        Some(user) => roster.find_for_user(user, guild, name),
        None => roster.find_by_name(guild, name),
    };
    let id = found
        .map(|c| c.id.clone())
        .ok_or_else(|| format!("character not found: {name}"))?;
    let line = roster
        .adjust_determination(&id, delta, Utc::now())
        .map(|c| format!("{}: {}", c.name, c.determination))
        .map_err(|e| e.to_string())?;
    roster.save().map_err(|e| e.to_string())?;
    println!("  {line}");
    Ok(())
}
