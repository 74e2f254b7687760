use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use dune_table::{NewNpc, NpcTier, TableConfig};

#[derive(Subcommand)]
pub enum NpcAction {
    /// Add an NPC to a guild
    Create {
        /// NPC name
        name: String,

        /// Concept (repeatable)
        #[arg(long = "concept")]
        concepts: Vec<String>,

        /// Description
        #[arg(long, default_value = "")]
        description: String,

        /// Tier: minion, toughened, nemesis
        #[arg(long)]
        tier: Option<String>,

        /// Creating user
        #[arg(long, default_value = "local")]
        user: String,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },

    /// List a guild's NPCs
    List {
        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },

    /// Change one field: name, concept, description, or tier
    Update {
        /// NPC name
        name: String,

        /// Field to change
        field: String,

        /// New value
        value: String,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },

    /// Remove an NPC
    Delete {
        /// NPC name
        name: String,

        /// Guild id
        #[arg(long, default_value = "local")]
        guild: String,
    },
}

pub fn run(config: &TableConfig, action: NpcAction) -> Result<(), String> {
    let mut roster = super::open_npcs(config)?;

    match action {
        NpcAction::Create {
            name,
            concepts,
            description,
            tier,
            user,
            guild,
        } => {
            if roster.find_by_name(&guild, &name).is_some() {
                return Err(format!("an NPC named '{name}' already exists"));
            }
            let tier = tier
                .as_deref()
                .map(NpcTier::from_name)
                .transpose()
                .map_err(|e| e.to_string())?;
            let npc = roster.create(
                NewNpc {
                    guild_id: guild,
                    name,
                    concepts,
                    description,
                    tier,
                    created_by: user,
                },
                Utc::now(),
            );
            println!("  {} {}", "Created".green().bold(), npc.name);
        }
        NpcAction::List { guild } => {
            let npcs = roster.for_guild(&guild);
            if npcs.is_empty() {
                println!("  No NPCs found.");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Name", "Tier", "Target", "Concepts", "Description"]);
            for npc in &npcs {
                table.add_row(vec![
                    npc.name.clone(),
                    npc.tier.map(|t| t.to_string()).unwrap_or_default(),
                    npc.target_number().to_string(),
                    npc.concepts.join(", "),
                    npc.description.clone(),
                ]);
            }
            println!("{table}");
            println!();
            println!("  {} NPCs", npcs.len());
            return Ok(());
        }
        NpcAction::Update {
            name,
            field,
            value,
            guild,
        } => {
            let id = roster
                .find_by_name(&guild, &name)
                .map(|n| n.id.clone())
                .ok_or_else(|| format!("NPC not found: {name}"))?;
            let npc = roster
                .update_field(&id, &field, &value)
                .map_err(|e| e.to_string())?;
            println!("  {} {} ({field})", "Updated".green().bold(), npc.name);
        }
        NpcAction::Delete { name, guild } => {
            let id = roster
                .find_by_name(&guild, &name)
                .map(|n| n.id.clone())
                .ok_or_else(|| format!("NPC not found: {name}"))?;
            let npc = roster.delete(&id).map_err(|e| e.to_string())?;
            println!("  {} {}", "Deleted".red().bold(), npc.name);
        }
    }

    roster.save().map_err(|e| e.to_string())
}
