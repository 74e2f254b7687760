use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use dune_table::{MomentumPool, PoolMap, TableConfig};

#[derive(Subcommand)]
pub enum MomentumAction {
    /// Show a channel's pool
    Show {
        /// Channel id
        #[arg(short, long)]
        channel: String,
    },

    /// Add Momentum (negative to remove)
    Add {
        /// Channel id
        #[arg(short, long)]
        channel: String,

        /// Amount to add
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },

    /// Spend Momentum; fails if the pool holds too little
    Spend {
        /// Channel id
        #[arg(short, long)]
        channel: String,

        /// Amount to spend
        amount: u32,
    },

    /// Add Threat (negative to remove)
    Threat {
        /// Channel id
        #[arg(short, long)]
        channel: String,

        /// Amount to add
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },

    /// Zero a channel's Momentum and Threat
    Reset {
        /// Channel id
        #[arg(short, long)]
        channel: String,
    },

    /// List every channel's pool
    List,
}

pub fn run(config: &TableConfig, action: MomentumAction) -> Result<(), String> {
    let mut tracker = super::open_pools(config)?;

    let pool = match action {
        MomentumAction::Show { channel } => tracker.get(&channel),
        MomentumAction::Add { channel, amount } => tracker.update(&channel, amount, 0),
        MomentumAction::Spend { channel, amount } => tracker
            .spend_momentum(&channel, amount)
            .map_err(|e| e.to_string())?,
        MomentumAction::Threat { channel, amount } => tracker.update(&channel, 0, amount),
        MomentumAction::Reset { channel } => tracker.reset(&channel),
        MomentumAction::List => {
            print_all(tracker.all());
            return Ok(());
        }
    };

    print_pool(&pool);
    super::warn_if_unsaved(&tracker);
    Ok(())
}

fn print_pool(pool: &MomentumPool) {
    println!("  {} {pool}", format!("[{}]", pool.channel_id).cyan());
}

fn print_all(pools: &PoolMap) {
    if pools.is_empty() {
        println!("  No momentum pools yet.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Channel", "Momentum", "Threat", "Last updated"]);

    for pool in pools.values() {
        let updated = pool
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            pool.channel_id.clone(),
            pool.momentum.to_string(),
            pool.threat.to_string(),
            updated,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} channels", pools.len());
}
