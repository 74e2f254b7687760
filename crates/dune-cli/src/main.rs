//! CLI table host for Dune: Adventures in the Imperium.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use dune_table::TableConfig;

use commands::character::CharacterAction;
use commands::momentum::MomentumAction;
use commands::npc::NpcAction;
use commands::validate::AssignmentKind;

#[derive(Parser)]
#[command(
    name = "dune",
    about = "Dune 2d20 table tools: dice, momentum, and characters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding table data (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// RNG seed for reproducible rolls (overrides DUNE_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a 2d20 test
    Roll(commands::roll::RollArgs),

    /// Roll repeatedly toward an extended test goal
    Extended(commands::extended::ExtendedArgs),

    /// Roll damage and effects for a hit
    Damage(commands::damage::DamageArgs),

    /// Roll initiative
    Initiative(commands::initiative::InitiativeArgs),

    /// Track the shared Momentum and Threat pools
    Momentum {
        #[command(subcommand)]
        action: MomentumAction,
    },

    /// Check a skill or drive point-buy assignment
    Validate {
        /// Which assignment to check
        kind: AssignmentKind,

        /// Assignment such as "battle=9,communicate=7,discipline=6,move=5,understand=4"
        assignment: String,
    },

    /// Manage player characters
    Character {
        #[command(subcommand)]
        action: CharacterAction,
    },

    /// Manage NPCs
    Npc {
        #[command(subcommand)]
        action: NpcAction,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&TableConfig::log_level_from(|key| std::env::var(key).ok()));
    let mut config = TableConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let result = match cli.command {
        Commands::Roll(args) => commands::roll::run(&config, &args),
        Commands::Extended(args) => commands::extended::run(&config, &args),
        Commands::Damage(args) => commands::damage::run(&config, &args),
        Commands::Initiative(args) => commands::initiative::run(&config, &args),
        Commands::Momentum { action } => commands::momentum::run(&config, action),
        Commands::Validate { kind, assignment } => commands::validate::run(kind, &assignment),
        Commands::Character { action } => commands::character::run(&config, action),
        Commands::Npc { action } => commands::npc::run(&config, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` or else the configured level.
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
